use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::catalog::{CatalogError, CatalogSnapshot, CatalogStore};
use crate::config::OrderingConfig;

use super::cart::{aggregate, CartError, CartLine};
use super::order::{CustomerInfo, DeliveryMethod, Destination, Order, OrderId, OrderStatus};
use super::repository::{OrderDraft, OrderRepository, RepositoryError};

/// Order creation payload as received from storefront callers. Totals are
/// deliberately absent: the engine always recomputes them server-side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_name: String,
    pub phone: String,
    pub delivery_method: DeliveryMethod,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub selected_branch: Option<String>,
    #[serde(default)]
    pub cart_lines: Vec<CartLine>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Error raised by the order service.
#[derive(Debug, thiserror::Error)]
pub enum OrderServiceError {
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),
    #[error("unknown order '{0}'")]
    UnknownOrder(String),
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
}

impl OrderServiceError {
    /// Stable machine-readable discriminant surfaced next to the message.
    pub fn kind(&self) -> &'static str {
        use super::pricing::PricingError;

        match self {
            OrderServiceError::Cart(CartError::Pricing(PricingError::InvalidSelection(_))) => {
                "invalid_selection"
            }
            OrderServiceError::Cart(CartError::Pricing(PricingError::IncompleteSelection(_))) => {
                "incomplete_selection"
            }
            OrderServiceError::Cart(CartError::Pricing(PricingError::Catalog(_)))
            | OrderServiceError::Catalog(_) => "catalog_unavailable",
            OrderServiceError::Cart(CartError::InvalidQuantity(_)) => "invalid_quantity",
            OrderServiceError::Cart(CartError::EmptyCart) => "empty_cart",
            OrderServiceError::Repository(RepositoryError::NotFound)
            | OrderServiceError::UnknownOrder(_) => "unknown_order",
            OrderServiceError::Repository(RepositoryError::TransitionNotAllowed { .. })
            | OrderServiceError::InvalidTransition(_) => "invalid_transition",
            OrderServiceError::Repository(RepositoryError::Unavailable(_)) => "store_unavailable",
            OrderServiceError::MissingRequiredField(_) => "missing_required_field",
        }
    }
}

/// Service composing the catalog, pricing engine, and order store.
pub struct OrderService<R, C> {
    repository: Arc<R>,
    catalog: Arc<C>,
    config: OrderingConfig,
}

impl<R, C> OrderService<R, C>
where
    R: OrderRepository + 'static,
    C: CatalogStore + 'static,
{
    pub fn new(repository: Arc<R>, catalog: Arc<C>, config: OrderingConfig) -> Self {
        Self {
            repository,
            catalog,
            config,
        }
    }

    /// Validate, price, and persist a new order. All validation happens
    /// before the store is touched; partial orders are never created.
    pub fn place_order(&self, request: OrderRequest) -> Result<Order, OrderServiceError> {
        let customer = Self::customer_from_request(&request)?;
        let destination = Self::destination_from_request(&request)?;

        let priced = aggregate(
            request.cart_lines,
            request.delivery_method,
            self.config.delivery_fee,
            self.catalog.as_ref(),
        )?;

        let order = self.repository.create(OrderDraft {
            customer,
            destination,
            items: priced.items,
            subtotal: priced.subtotal,
            delivery_fee: priced.delivery_fee,
            total_amount: priced.total,
            notes: request.notes,
        })?;

        info!(
            order_id = %order.id,
            total = order.total_amount,
            items = order.items.len(),
            "order placed"
        );
        Ok(order)
    }

    /// Apply a status transition. `requested` is the raw caller-supplied
    /// status name; anything outside the recognized set is an invalid
    /// transition, never a silent default.
    pub fn transition(&self, id: &OrderId, requested: &str) -> Result<Order, OrderServiceError> {
        let status = OrderStatus::parse(requested).ok_or_else(|| {
            OrderServiceError::InvalidTransition(format!("unrecognized status '{requested}'"))
        })?;

        match self
            .repository
            .set_status(id, status, self.config.strict_status_flow)
        {
            Ok(order) => {
                info!(order_id = %order.id, status = %order.status, "order status updated");
                Ok(order)
            }
            Err(RepositoryError::NotFound) => Err(OrderServiceError::UnknownOrder(id.0.clone())),
            Err(RepositoryError::TransitionNotAllowed { from, to }) => Err(
                OrderServiceError::InvalidTransition(format!("cannot move from {from} to {to}")),
            ),
            Err(other) => Err(other.into()),
        }
    }

    pub fn get(&self, id: &OrderId) -> Result<Order, OrderServiceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| OrderServiceError::UnknownOrder(id.0.clone()))
    }

    /// Pass-through read into the catalog for storefront callers.
    pub fn catalog_snapshot(
        &self,
        category: Option<&str>,
    ) -> Result<CatalogSnapshot, OrderServiceError> {
        Ok(self.catalog.snapshot(category)?)
    }

    fn customer_from_request(request: &OrderRequest) -> Result<CustomerInfo, OrderServiceError> {
        if request.customer_name.trim().is_empty() {
            return Err(OrderServiceError::MissingRequiredField("customerName"));
        }
        if request.phone.trim().is_empty() {
            return Err(OrderServiceError::MissingRequiredField("phone"));
        }
        Ok(CustomerInfo {
            name: request.customer_name.trim().to_string(),
            phone: request.phone.trim().to_string(),
        })
    }

    fn destination_from_request(request: &OrderRequest) -> Result<Destination, OrderServiceError> {
        match request.delivery_method {
            DeliveryMethod::Delivery => request
                .address
                .as_deref()
                .map(str::trim)
                .filter(|address| !address.is_empty())
                .map(|address| Destination::Delivery {
                    address: address.to_string(),
                })
                .ok_or(OrderServiceError::MissingRequiredField("address")),
            DeliveryMethod::Pickup => request
                .selected_branch
                .as_deref()
                .map(str::trim)
                .filter(|branch| !branch.is_empty())
                .map(|branch| Destination::Pickup {
                    branch: branch.to_string(),
                })
                .ok_or(OrderServiceError::MissingRequiredField("selectedBranch")),
        }
    }
}
