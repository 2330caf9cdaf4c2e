//! Customization pricing and the order lifecycle.
//!
//! Selections arrive in the wire shape ([`SelectionSet`], [`CartLine`]),
//! are canonicalized once at the boundary, priced against the catalog, and
//! frozen into [`OrderLineItem`]s the moment an order is created. After
//! that, the only mutation an order ever sees is a status transition.

pub mod cart;
pub mod order;
pub mod pricing;
pub mod repository;
pub mod router;
pub mod selection;
pub mod service;

#[cfg(test)]
mod tests;

pub use cart::{aggregate, CartError, CartLine, PricedCart};
pub use order::{
    CustomerInfo, CustomizationSnapshot, DeliveryMethod, Destination, HalfSnapshot, Order,
    OrderId, OrderLineItem, OrderStatus,
};
pub use pricing::{
    resolve, resolve_half_and_half, HalfAndHalfQuote, PriceQuote, PricingError, ResolvedAddon,
    ResolvedHalf, ResolvedVariant,
};
pub use repository::{InMemoryOrderRepository, OrderDraft, OrderRepository, RepositoryError};
pub use router::order_router;
pub use selection::{CanonicalHalf, CanonicalSelection, HalfChoice, SelectionSet, VariantChoice};
pub use service::{OrderRequest, OrderService, OrderServiceError};
