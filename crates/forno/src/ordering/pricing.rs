//! Customization & pricing resolution.
//!
//! `resolve` prices one regular product against a canonical selection;
//! `resolve_half_and_half` merges two independently resolved halves under
//! the half-and-half combination rule. Both are pure functions over the
//! catalog snapshot and never fall back to a default price on error.

use serde::{Deserialize, Serialize};

use crate::catalog::{Addon, CatalogError, CatalogStore, Product, ProductId};

use super::selection::{CanonicalHalf, CanonicalSelection, SIZE_AXIS};

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("invalid selection: {0}")]
    InvalidSelection(String),
    #[error("incomplete selection: {0}")]
    IncompleteSelection(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A variant option priced into a line, frozen for the order snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVariant {
    pub axis: String,
    pub option_id: String,
    pub name: String,
    pub price: u64,
}

/// An add-on priced into a line. `price` is the amount actually charged,
/// already halved for side-local half-and-half add-ons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAddon {
    pub id: crate::catalog::AddonId,
    pub name: String,
    pub price: u64,
}

/// Price breakdown for one regular product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    /// Chosen size price plus non-size variant deltas.
    pub base_price: u64,
    pub addon_total: u64,
    pub variants: Vec<ResolvedVariant>,
    pub addons: Vec<ResolvedAddon>,
}

impl PriceQuote {
    pub fn unit_price(&self) -> u64 {
        self.base_price + self.addon_total
    }
}

/// Price one product against a canonical selection.
///
/// The base price starts at the chosen size (the default size when the
/// selection carries none), every other selected axis adds its option's
/// delta, and each selected add-on adds its default-size price once.
pub fn resolve<C>(
    product: &Product,
    selection: &CanonicalSelection,
    catalog: &C,
) -> Result<PriceQuote, PricingError>
where
    C: CatalogStore + ?Sized,
{
    if !product.available {
        return Err(PricingError::InvalidSelection(format!(
            "product '{}' is not available",
            product.id
        )));
    }

    let mut variants = Vec::new();

    let size = match selection.size() {
        Some(size_id) => product.size(size_id).ok_or_else(|| {
            PricingError::InvalidSelection(format!(
                "unknown size '{size_id}' for product '{}'",
                product.id
            ))
        })?,
        None => product.default_size().ok_or_else(|| {
            PricingError::InvalidSelection(format!(
                "product '{}' has no size options",
                product.id
            ))
        })?,
    };
    let mut base_price = size.price;
    variants.push(ResolvedVariant {
        axis: SIZE_AXIS.to_string(),
        option_id: size.id.clone(),
        name: size.name.clone(),
        price: size.price,
    });

    for (axis, option_id) in &selection.variants {
        if axis == SIZE_AXIS {
            continue;
        }
        let defined = product.axis(axis).ok_or_else(|| {
            PricingError::InvalidSelection(format!(
                "product '{}' has no '{axis}' options",
                product.id
            ))
        })?;
        let option = defined.option(option_id).ok_or_else(|| {
            PricingError::InvalidSelection(format!(
                "unknown {axis} option '{option_id}' for product '{}'",
                product.id
            ))
        })?;
        base_price += option.price;
        variants.push(ResolvedVariant {
            axis: axis.clone(),
            option_id: option.id.clone(),
            name: option.name.clone(),
            price: option.price,
        });
    }

    let mut addons = Vec::new();
    let mut addon_total = 0u64;
    for addon_id in &selection.addons {
        let addon = lookup_addon(catalog, addon_id, &product.category)?;
        let price = addon.default_price();
        addon_total += price;
        addons.push(ResolvedAddon {
            id: addon.id.clone(),
            name: addon.name.clone(),
            price,
        });
    }

    Ok(PriceQuote {
        base_price,
        addon_total,
        variants,
        addons,
    })
}

/// One resolved side of a half-and-half line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHalf {
    pub product_id: ProductId,
    pub product_name: String,
    pub base_price: u64,
    pub variants: Vec<ResolvedVariant>,
    /// Side-local add-ons, already charged at half price.
    pub addons: Vec<ResolvedAddon>,
}

/// Combined price breakdown for a half-and-half line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalfAndHalfQuote {
    pub left: ResolvedHalf,
    pub right: ResolvedHalf,
    pub shared_variants: Vec<ResolvedVariant>,
    pub shared_addons: Vec<ResolvedAddon>,
    pub unit_price: u64,
}

/// Merge two independently customized halves into one unit price.
///
/// The combination rule is a business rule, not a default: the composite
/// base is the *maximum* of the two sides' resolved base prices, shared
/// whole-item variants and add-ons are charged at full price, and a
/// side-local add-on is charged at half its normal price (it covers only
/// half the item; odd minor amounts round down).
pub fn resolve_half_and_half<C>(
    left: &CanonicalHalf,
    right: &CanonicalHalf,
    shared: &CanonicalSelection,
    catalog: &C,
) -> Result<HalfAndHalfQuote, PricingError>
where
    C: CatalogStore + ?Sized,
{
    let (left, left_product) = resolve_half(left, catalog)?;
    let (right, right_product) = resolve_half(right, catalog)?;

    let mut unit_price = left.base_price.max(right.base_price);
    unit_price += half_addon_total(&left);
    unit_price += half_addon_total(&right);

    let mut shared_variants = Vec::new();
    for (axis, option_id) in &shared.variants {
        let option = shared_variant_option(axis, option_id, &left_product, &right_product)?;
        unit_price += option.price;
        shared_variants.push(option);
    }

    let mut shared_addons = Vec::new();
    for addon_id in &shared.addons {
        // A whole-item add-on must be attachable to both halves.
        let addon = lookup_addon(catalog, addon_id, &left_product.category)?;
        if !addon.applies_to(&right_product.category) {
            return Err(PricingError::InvalidSelection(format!(
                "add-on '{addon_id}' does not apply to category '{}'",
                right_product.category
            )));
        }
        let price = addon.default_price();
        unit_price += price;
        shared_addons.push(ResolvedAddon {
            id: addon.id.clone(),
            name: addon.name.clone(),
            price,
        });
    }

    Ok(HalfAndHalfQuote {
        left,
        right,
        shared_variants,
        shared_addons,
        unit_price,
    })
}

fn resolve_half<C>(
    half: &CanonicalHalf,
    catalog: &C,
) -> Result<(ResolvedHalf, Product), PricingError>
where
    C: CatalogStore + ?Sized,
{
    let product = catalog.product(&half.product_id)?.ok_or_else(|| {
        PricingError::InvalidSelection(format!("unknown product '{}'", half.product_id))
    })?;

    let quote = resolve(&product, &half.selection, catalog)?;

    let addons = quote
        .addons
        .into_iter()
        .map(|addon| ResolvedAddon {
            price: addon.price / 2,
            ..addon
        })
        .collect();

    Ok((
        ResolvedHalf {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            base_price: quote.base_price,
            variants: quote.variants,
            addons,
        },
        product,
    ))
}

fn half_addon_total(half: &ResolvedHalf) -> u64 {
    half.addons.iter().map(|addon| addon.price).sum()
}

/// Look a shared variant option up on both halves. The option must exist on
/// each side's product; when the two sides price it differently the dearer
/// delta wins, consistent with the max-price base rule.
fn shared_variant_option(
    axis: &str,
    option_id: &str,
    left: &Product,
    right: &Product,
) -> Result<ResolvedVariant, PricingError> {
    let on_product = |product: &Product| {
        if axis == SIZE_AXIS {
            product.size(option_id).cloned()
        } else {
            product
                .axis(axis)
                .and_then(|defined| defined.option(option_id))
                .cloned()
        }
    };

    let left_option = on_product(left).ok_or_else(|| {
        PricingError::InvalidSelection(format!(
            "unknown shared {axis} option '{option_id}' for product '{}'",
            left.id
        ))
    })?;
    let right_option = on_product(right).ok_or_else(|| {
        PricingError::InvalidSelection(format!(
            "unknown shared {axis} option '{option_id}' for product '{}'",
            right.id
        ))
    })?;

    Ok(ResolvedVariant {
        axis: axis.to_string(),
        option_id: left_option.id,
        name: left_option.name,
        price: left_option.price.max(right_option.price),
    })
}

fn lookup_addon<C>(
    catalog: &C,
    addon_id: &crate::catalog::AddonId,
    category: &str,
) -> Result<Addon, PricingError>
where
    C: CatalogStore + ?Sized,
{
    let addon = catalog
        .addon(addon_id)?
        .ok_or_else(|| PricingError::InvalidSelection(format!("unknown add-on '{addon_id}'")))?;

    if !addon.available {
        return Err(PricingError::InvalidSelection(format!(
            "add-on '{addon_id}' is not available"
        )));
    }
    if !addon.applies_to(category) {
        return Err(PricingError::InvalidSelection(format!(
            "add-on '{addon_id}' does not apply to category '{category}'"
        )));
    }

    Ok(addon)
}
