use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::ProductId;

use super::pricing::{ResolvedAddon, ResolvedVariant};

/// Human-readable order number, sequential within its creation year
/// (e.g. `2026-0041`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order status lifecycle. The happy path runs left to right; `cancelled`
/// is reachable from any non-terminal state under the strict machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a caller-supplied status name; `None` for anything outside the
    /// six recognized values.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "preparing" => Some(OrderStatus::Preparing),
            "ready" => Some(OrderStatus::Ready),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    fn next_in_flow(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Whether the strict machine permits moving to `next` from here:
    /// one step forward along the happy path, or cancellation from any
    /// non-terminal state.
    pub fn allows(self, next: OrderStatus) -> bool {
        if next == OrderStatus::Cancelled {
            return !self.is_terminal();
        }
        self.next_in_flow() == Some(next)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Delivery,
    Pickup,
}

/// Where the order goes: an address for delivery, a branch for pickup.
/// The variant also fixes the delivery method, so an order can never carry
/// a branch with a delivery address or vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "deliveryMethod", rename_all = "lowercase")]
pub enum Destination {
    Delivery {
        address: String,
    },
    Pickup {
        #[serde(rename = "selectedBranch")]
        branch: String,
    },
}

impl Destination {
    pub fn method(&self) -> DeliveryMethod {
        match self {
            Destination::Delivery { .. } => DeliveryMethod::Delivery,
            Destination::Pickup { .. } => DeliveryMethod::Pickup,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
}

/// One resolved half frozen into an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HalfSnapshot {
    pub product_id: ProductId,
    pub product_name: String,
    pub variants: Vec<ResolvedVariant>,
    pub addons: Vec<ResolvedAddon>,
}

/// The resolved variant/add-on names and prices frozen at order time, so
/// later catalog edits never retroactively alter a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CustomizationSnapshot {
    #[serde(rename_all = "camelCase")]
    Regular {
        product_id: ProductId,
        variants: Vec<ResolvedVariant>,
        addons: Vec<ResolvedAddon>,
    },
    #[serde(rename_all = "camelCase")]
    HalfHalf {
        left: HalfSnapshot,
        right: HalfSnapshot,
        shared_variants: Vec<ResolvedVariant>,
        shared_addons: Vec<ResolvedAddon>,
    },
}

/// One priced, quantified entry in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub name: String,
    pub quantity: u32,
    /// Post-customization price in the smallest currency unit.
    pub unit_price: u64,
    pub customization: CustomizationSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OrderLineItem {
    pub fn line_total(&self) -> u64 {
        self.unit_price * u64::from(self.quantity)
    }
}

/// Aggregate root. Created once from a non-empty set of priced line items;
/// mutated only by status transitions afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer: CustomerInfo,
    #[serde(flatten)]
    pub destination: Destination,
    pub items: Vec<OrderLineItem>,
    pub subtotal: u64,
    pub delivery_fee: u64,
    pub total_amount: u64,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn delivery_method(&self) -> DeliveryMethod {
        self.destination.method()
    }
}
