use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Datelike, Utc};

use super::order::{CustomerInfo, Destination, Order, OrderId, OrderLineItem, OrderStatus};

/// Everything needed to persist a new order. The repository assigns the
/// identifier and timestamps so that numbering stays atomic with the write.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer: CustomerInfo,
    pub destination: Destination,
    pub items: Vec<OrderLineItem>,
    pub subtotal: u64,
    pub delivery_fee: u64,
    pub total_amount: u64,
    pub notes: Option<String>,
}

/// Error enumeration for order store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("order not found")]
    NotFound,
    #[error("transition from {from} to {to} not allowed")]
    TransitionNotAllowed { from: OrderStatus, to: OrderStatus },
    #[error("order store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for orders.
///
/// `create` must assign the order number atomically with the insert, and
/// `set_status` must apply with at-most-one-writer-at-a-time semantics per
/// order so `updated_at` can never drift from the stored status.
pub trait OrderRepository: Send + Sync {
    fn create(&self, draft: OrderDraft) -> Result<Order, RepositoryError>;
    fn fetch(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError>;
    fn set_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        enforce_flow: bool,
    ) -> Result<Order, RepositoryError>;
}

#[derive(Default)]
struct StoreInner {
    orders: HashMap<OrderId, Order>,
    /// Running order count per creation year.
    sequences: HashMap<i32, u32>,
}

/// Order store held in process memory. A single mutex guards both the
/// records and the year-scoped sequence, so concurrent creations can never
/// observe the same running count.
#[derive(Default, Clone)]
pub struct InMemoryOrderRepository {
    inner: Arc<Mutex<StoreInner>>,
}

impl OrderRepository for InMemoryOrderRepository {
    fn create(&self, draft: OrderDraft) -> Result<Order, RepositoryError> {
        let now = Utc::now();
        let year = now.year();

        let mut guard = self.inner.lock().expect("order store mutex poisoned");
        let sequence = guard.sequences.entry(year).or_insert(0);
        *sequence += 1;
        let id = OrderId(format!("{year}-{sequence:04}"));

        let order = Order {
            id: id.clone(),
            customer: draft.customer,
            destination: draft.destination,
            items: draft.items,
            subtotal: draft.subtotal,
            delivery_fee: draft.delivery_fee,
            total_amount: draft.total_amount,
            status: OrderStatus::Pending,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };
        guard.orders.insert(id, order.clone());

        Ok(order)
    }

    fn fetch(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let guard = self.inner.lock().expect("order store mutex poisoned");
        Ok(guard.orders.get(id).cloned())
    }

    fn set_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        enforce_flow: bool,
    ) -> Result<Order, RepositoryError> {
        let mut guard = self.inner.lock().expect("order store mutex poisoned");
        let order = guard.orders.get_mut(id).ok_or(RepositoryError::NotFound)?;

        if enforce_flow && !order.status.allows(status) {
            return Err(RepositoryError::TransitionNotAllowed {
                from: order.status,
                to: status,
            });
        }

        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }
}
