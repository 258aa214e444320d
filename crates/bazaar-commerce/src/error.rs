//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in commerce operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Malformed input rejected at ingestion time.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Product not found.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// Variation not found.
    #[error("variation not found: {0}")]
    VariationNotFound(String),

    /// Cart item not found.
    #[error("cart item not found: {0}")]
    CartItemNotFound(String),

    /// Order not found.
    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// Operation requires an authenticated user.
    #[error("authentication required")]
    AuthenticationRequired,

    /// Actor lacks the role or ownership the operation needs.
    #[error("not authorized: {0}")]
    Authorization(String),

    /// Requested quantity exceeds available stock.
    #[error(
        "insufficient stock for {variation_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        variation_id: String,
        requested: i64,
        available: i64,
    },

    /// Checkout attempted with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Quantity must be positive.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Order status transition not allowed.
    #[error("invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Arithmetic overflow in a money calculation.
    #[error("arithmetic overflow in money calculation")]
    Overflow,

    /// Transaction timed out or could not be serialized. Retryable.
    #[error("transaction failed: {0}")]
    Transaction(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Blob storage error.
    #[error("blob storage error: {0}")]
    Blob(String),

    /// Cache error.
    #[error("cache error: {0}")]
    Cache(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CommerceError {
    /// Whether the caller may retry the operation (once, with backoff).
    pub fn is_retryable(&self) -> bool {
        matches!(self, CommerceError::Transaction(_))
    }
}

impl From<bazaar_store::StoreError> for CommerceError {
    fn from(e: bazaar_store::StoreError) -> Self {
        match e {
            bazaar_store::StoreError::Timeout(_) => CommerceError::Transaction(e.to_string()),
            other => CommerceError::Storage(other.to_string()),
        }
    }
}

impl From<bazaar_cache::CacheError> for CommerceError {
    fn from(e: bazaar_cache::CacheError) -> Self {
        CommerceError::Cache(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transaction_errors_are_retryable() {
        assert!(CommerceError::Transaction("timeout".into()).is_retryable());
        assert!(!CommerceError::EmptyCart.is_retryable());
        assert!(!CommerceError::InsufficientStock {
            variation_id: "v1".into(),
            requested: 3,
            available: 2,
        }
        .is_retryable());
    }

    #[test]
    fn test_store_timeout_maps_to_transaction() {
        let err: CommerceError = bazaar_store::StoreError::Timeout(10_000).into();
        assert!(matches!(err, CommerceError::Transaction(_)));
    }

    #[test]
    fn test_insufficient_stock_names_the_variation() {
        let err = CommerceError::InsufficientStock {
            variation_id: "var-9".into(),
            requested: 3,
            available: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("var-9"));
        assert!(msg.contains("requested 3"));
        assert!(msg.contains("available 2"));
    }
}
