//! Schema-validated operation requests.
//!
//! One tagged variant per public operation, so the core never receives
//! partially-shaped payloads. Deserialization enforces the shape;
//! [`CommerceRequest::validate`] enforces the cheap field-level rules
//! before a request reaches a service.

use crate::checkout::CheckoutForm;
use crate::error::CommerceError;
use crate::orders::OrderQuery;
use serde::{Deserialize, Serialize};

/// A pricing rule as submitted over the boundary, before parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Lower quantity bound, inclusive.
    pub from_qty: String,
    /// Upper quantity bound, inclusive.
    pub to_qty: String,
    /// Rule kind: "fixed_price" or "percentage".
    pub kind: String,
    /// Per-unit price in cents, or percent off, depending on kind.
    pub amount: String,
}

/// A dispatchable commerce operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CommerceRequest {
    /// Add a variation to the caller's cart.
    AddCartItem { variation_id: String, quantity: i64 },
    /// Set a cart item's quantity; zero or less removes it.
    UpdateCartQuantity { item_id: String, quantity: i64 },
    /// Remove a cart item.
    RemoveCartItem { item_id: String },
    /// Read the caller's cart with live pricing.
    GetCart,
    /// Convert the caller's cart into an order.
    PlaceOrder { form: CheckoutForm },
    /// List orders visible to the caller.
    ListOrders { query: OrderQuery },
    /// Fetch one order.
    GetOrder { order_id: String },
    /// Move an order to a new status.
    UpdateOrderStatus { order_id: String, status: String },
    /// Replace a product's pricing rules.
    UpsertPricingRules {
        product_id: String,
        rules: Vec<RuleSpec>,
    },
    /// Published products for a storefront (no vendor = shared).
    ListProducts { vendor_id: Option<String> },
}

impl CommerceRequest {
    /// Reject requests that are well-formed JSON but semantically empty.
    ///
    /// Deeper checks (stock, pricing-rule parsing, authorization) belong
    /// to the services; this only stops obviously broken payloads at the
    /// door.
    pub fn validate(&self) -> Result<(), CommerceError> {
        match self {
            CommerceRequest::AddCartItem { variation_id, .. } => {
                require_id("variation_id", variation_id)
            }
            CommerceRequest::UpdateCartQuantity { item_id, .. }
            | CommerceRequest::RemoveCartItem { item_id } => require_id("item_id", item_id),
            CommerceRequest::GetCart | CommerceRequest::ListOrders { .. } => Ok(()),
            CommerceRequest::PlaceOrder { form } => form.validate(),
            CommerceRequest::GetOrder { order_id } => require_id("order_id", order_id),
            CommerceRequest::UpdateOrderStatus { order_id, status } => {
                require_id("order_id", order_id)?;
                require_id("status", status)
            }
            CommerceRequest::UpsertPricingRules { product_id, .. } => {
                require_id("product_id", product_id)
            }
            CommerceRequest::ListProducts { .. } => Ok(()),
        }
    }
}

fn require_id(field: &str, value: &str) -> Result<(), CommerceError> {
    if value.trim().is_empty() {
        return Err(CommerceError::Validation(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_deserialization() {
        let json = r#"{"op":"add_cart_item","variation_id":"var-1","quantity":2}"#;
        let request: CommerceRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request,
            CommerceRequest::AddCartItem {
                variation_id: "var-1".into(),
                quantity: 2,
            }
        );
    }

    #[test]
    fn test_unknown_op_rejected() {
        let json = r#"{"op":"drop_tables"}"#;
        assert!(serde_json::from_str::<CommerceRequest>(json).is_err());
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = r#"{"op":"add_cart_item","quantity":2}"#;
        assert!(serde_json::from_str::<CommerceRequest>(json).is_err());
    }

    #[test]
    fn test_empty_id_rejected() {
        let request = CommerceRequest::GetOrder {
            order_id: "  ".into(),
        };
        assert!(matches!(
            request.validate(),
            Err(CommerceError::Validation(_))
        ));
    }
}
