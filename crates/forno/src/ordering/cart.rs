//! Cart aggregation: priced line items, delivery fee, order total.

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogStore, ProductId};

use super::order::{CustomizationSnapshot, DeliveryMethod, HalfSnapshot, OrderLineItem};
use super::pricing::{resolve, resolve_half_and_half, PricingError, ResolvedHalf};
use super::selection::{HalfChoice, SelectionSet};

/// One cart entry as submitted by a client. A half-and-half line is its own
/// composite type rather than a catalog product with a zero price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CartLine {
    #[serde(rename_all = "camelCase")]
    Regular {
        product_id: ProductId,
        quantity: i64,
        #[serde(default)]
        selection: SelectionSet,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    HalfHalf {
        #[serde(default)]
        left: Option<HalfChoice>,
        #[serde(default)]
        right: Option<HalfChoice>,
        #[serde(default)]
        shared: SelectionSet,
        quantity: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
}

impl CartLine {
    fn quantity(&self) -> i64 {
        match self {
            CartLine::Regular { quantity, .. } | CartLine::HalfHalf { quantity, .. } => *quantity,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("invalid quantity: {0} (must be a positive integer)")]
    InvalidQuantity(i64),
    #[error("cart contains no line items")]
    EmptyCart,
}

/// The aggregator's output: frozen line items plus the computed totals.
/// The engine, not the caller, is the source of truth for `total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCart {
    pub items: Vec<OrderLineItem>,
    pub subtotal: u64,
    pub delivery_fee: u64,
    pub total: u64,
}

/// Resolve and price every cart line, then apply the delivery fee.
///
/// The fee is injected configuration; it is charged only for
/// [`DeliveryMethod::Delivery`] and is zero for pickup.
pub fn aggregate<C>(
    lines: Vec<CartLine>,
    method: DeliveryMethod,
    delivery_fee: u64,
    catalog: &C,
) -> Result<PricedCart, CartError>
where
    C: CatalogStore + ?Sized,
{
    if lines.is_empty() {
        return Err(CartError::EmptyCart);
    }

    let mut items = Vec::with_capacity(lines.len());
    let mut subtotal = 0u64;

    for line in lines {
        let quantity = line.quantity();
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        // Rejects quantities beyond the line counter's range instead of
        // wrapping them.
        let quantity =
            u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity(quantity))?;

        let item = match line {
            CartLine::Regular {
                product_id,
                selection,
                notes,
                ..
            } => {
                let product = catalog
                    .product(&product_id)
                    .map_err(PricingError::from)?
                    .ok_or_else(|| {
                        PricingError::InvalidSelection(format!("unknown product '{product_id}'"))
                    })?;

                let selection = selection.canonicalize();
                let quote = resolve(&product, &selection, catalog)?;

                OrderLineItem {
                    name: product.name.clone(),
                    quantity,
                    unit_price: quote.unit_price(),
                    customization: CustomizationSnapshot::Regular {
                        product_id: product.id.clone(),
                        variants: quote.variants,
                        addons: quote.addons,
                    },
                    notes: notes.or(selection.notes),
                }
            }
            CartLine::HalfHalf {
                left,
                right,
                shared,
                notes,
                ..
            } => {
                let left = left.ok_or_else(|| {
                    PricingError::IncompleteSelection(
                        "half-and-half line is missing its left half".to_string(),
                    )
                })?;
                let right = right.ok_or_else(|| {
                    PricingError::IncompleteSelection(
                        "half-and-half line is missing its right half".to_string(),
                    )
                })?;

                let left = left.canonicalize();
                let right = right.canonicalize();
                let shared = shared.canonicalize();
                let quote = resolve_half_and_half(&left, &right, &shared, catalog)?;

                OrderLineItem {
                    name: format!(
                        "Half {} / Half {}",
                        quote.left.product_name, quote.right.product_name
                    ),
                    quantity,
                    unit_price: quote.unit_price,
                    customization: CustomizationSnapshot::HalfHalf {
                        left: half_snapshot(quote.left),
                        right: half_snapshot(quote.right),
                        shared_variants: quote.shared_variants,
                        shared_addons: quote.shared_addons,
                    },
                    notes: notes.or(shared.notes),
                }
            }
        };

        subtotal += item.line_total();
        items.push(item);
    }

    let delivery_fee = match method {
        DeliveryMethod::Delivery => delivery_fee,
        DeliveryMethod::Pickup => 0,
    };

    Ok(PricedCart {
        items,
        subtotal,
        delivery_fee,
        total: subtotal + delivery_fee,
    })
}

fn half_snapshot(half: ResolvedHalf) -> HalfSnapshot {
    HalfSnapshot {
        product_id: half.product_id,
        product_name: half.product_name,
        variants: half.variants,
        addons: half.addons,
    }
}
