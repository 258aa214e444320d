//! Cart and cart item types.
//!
//! Carts never store prices: line totals and the subtotal are recomputed
//! through the price engine on every read, so catalog price changes are
//! reflected live until checkout freezes them onto an order.

use crate::ids::{CartId, CartItemId, UserId, VariationId};
use serde::{Deserialize, Serialize};

/// A user's pre-checkout cart. One per user, created lazily on first add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Owning user.
    pub user_id: UserId,
    /// Items in the cart. At most one per variation.
    pub items: Vec<CartItem>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create an empty cart for a user.
    pub fn new(user_id: UserId) -> Self {
        let now = current_timestamp();
        Self {
            id: CartId::generate(),
            user_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Find the item for a variation, if present.
    pub fn item_for_variation(&self, variation_id: &VariationId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.variation_id == variation_id)
    }

    /// Find an item by its id.
    pub fn get_item(&self, item_id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.id == item_id)
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Whether the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Mark the cart updated.
    pub fn touch(&mut self) {
        self.updated_at = current_timestamp();
    }
}

/// A line in a cart: a variation reference and a positive quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Unique item identifier.
    pub id: CartItemId,
    /// The variation being purchased.
    pub variation_id: VariationId,
    /// Quantity. Always positive.
    pub quantity: i64,
}

impl CartItem {
    /// Create a new cart item.
    pub fn new(variation_id: VariationId, quantity: i64) -> Self {
        Self {
            id: CartItemId::generate(),
            variation_id,
            quantity,
        }
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new(UserId::new("u1"));
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_item_lookup() {
        let mut cart = Cart::new(UserId::new("u1"));
        let item = CartItem::new(VariationId::new("var-1"), 2);
        let item_id = item.id.clone();
        cart.items.push(item);

        assert!(cart.item_for_variation(&VariationId::new("var-1")).is_some());
        assert!(cart.item_for_variation(&VariationId::new("var-2")).is_none());
        assert_eq!(cart.get_item(&item_id).unwrap().quantity, 2);
        assert_eq!(cart.item_count(), 2);
    }
}
