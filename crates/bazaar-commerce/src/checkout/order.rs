//! Order types.
//!
//! Orders are immutable snapshots of a cart at checkout time. Only the
//! status field changes afterwards, through validated transitions.

use crate::checkout::Address;
use crate::ids::{OrderId, OrderItemId, ProductId, UserId, VariationId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
    /// Order refunded.
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            "refunded" => Some(OrderStatus::Refunded),
            _ => None,
        }
    }

    /// Whether the order may move to the given status.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Pending, Cancelled)
                | (Processing, Shipped)
                | (Processing, Cancelled)
                | (Shipped, Delivered)
                | (Shipped, Refunded)
                | (Delivered, Refunded)
        )
    }

    /// Check if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Refunded)
    }

    /// Check if the order can still be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A completed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Human-readable order reference.
    pub reference: String,
    /// Customer who placed the order.
    pub user_id: UserId,
    /// Order status.
    pub status: OrderStatus,
    /// Items, with prices frozen at order time.
    pub items: Vec<OrderItem>,
    /// Shipping address.
    pub shipping_address: Address,
    /// Billing address.
    pub billing_address: Address,
    /// Customer email.
    pub email: String,
    /// Grand total charged.
    pub total_amount: Money,
    /// Unix timestamp of placement.
    pub placed_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Order {
    /// Generate a new order reference.
    pub fn generate_reference() -> String {
        use std::sync::atomic::{AtomicU64, Ordering};
        use std::time::{SystemTime, UNIX_EPOCH};

        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        format!("BZR-{ts}-{n}")
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Move the order to a new status, validating the transition.
    pub fn set_status(&mut self, next: OrderStatus) -> Result<(), crate::error::CommerceError> {
        if !self.status.can_transition_to(next) {
            return Err(crate::error::CommerceError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        self.updated_at = current_timestamp();
        Ok(())
    }
}

/// A line item in an order.
///
/// Prices are frozen here at order time and must never be recomputed
/// from live pricing afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Unique item identifier.
    pub id: OrderItemId,
    /// Variation that was ordered.
    pub variation_id: VariationId,
    /// Product the variation belongs to.
    pub product_id: ProductId,
    /// Product name at time of order.
    pub name: String,
    /// SKU at time of order.
    pub sku: String,
    /// Quantity ordered.
    pub quantity: i64,
    /// Per-unit price at time of order.
    pub unit_price: Money,
    /// Line total at time of order. Authoritative for audit.
    pub total_price: Money,
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
