//! Declared cache keys.
//!
//! Each variant is a cache namespace with a declared TTL. Keys render to
//! slash-separated paths so a whole namespace can be invalidated by
//! prefix (e.g. every filtered page of a user's order list).

use std::time::Duration;

/// A declared cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// A customer's order listing.
    OrderList { user_id: String },
    /// A vendor actor's order listing (own orders plus sub-customer
    /// orders). Keyed per acting user: two users of the same vendor see
    /// different sets, so they must never share an entry.
    VendorOrderList { vendor_id: String, user_id: String },
    /// Published products for a storefront (None = shared storefront).
    ProductList { vendor_id: Option<String> },
}

impl CacheKey {
    /// Render the key as a path.
    pub fn path(&self) -> String {
        match self {
            CacheKey::OrderList { user_id } => format!("orders/user/{user_id}"),
            CacheKey::VendorOrderList { vendor_id, user_id } => {
                format!("orders/vendor/{vendor_id}/{user_id}")
            }
            CacheKey::ProductList { vendor_id } => match vendor_id {
                Some(id) => format!("products/vendor/{id}"),
                None => "products/shared".to_string(),
            },
        }
    }

    /// Prefix covering every acting user's listing for a vendor.
    ///
    /// Used to invalidate the whole vendor namespace when an affiliated
    /// order changes.
    pub fn vendor_order_prefix(vendor_id: &str) -> String {
        format!("orders/vendor/{vendor_id}")
    }

    /// Default time-to-live for entries under this key.
    pub fn ttl(&self) -> Duration {
        match self {
            CacheKey::OrderList { .. } => Duration::from_secs(60),
            CacheKey::VendorOrderList { .. } => Duration::from_secs(60),
            CacheKey::ProductList { .. } => Duration::from_secs(300),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_paths() {
        let key = CacheKey::OrderList {
            user_id: "u1".into(),
        };
        assert_eq!(key.path(), "orders/user/u1");

        let key = CacheKey::ProductList { vendor_id: None };
        assert_eq!(key.path(), "products/shared");
    }

    #[test]
    fn test_order_lists_share_prefix() {
        let a = CacheKey::OrderList {
            user_id: "u1".into(),
        };
        let b = CacheKey::VendorOrderList {
            vendor_id: "v1".into(),
            user_id: "u2".into(),
        };
        assert!(a.path().starts_with("orders/"));
        assert!(b.path().starts_with("orders/"));
    }

    #[test]
    fn test_vendor_paths_are_per_user_under_one_prefix() {
        let a = CacheKey::VendorOrderList {
            vendor_id: "v1".into(),
            user_id: "u1".into(),
        };
        let b = CacheKey::VendorOrderList {
            vendor_id: "v1".into(),
            user_id: "u2".into(),
        };
        assert_ne!(a.path(), b.path());
        let prefix = CacheKey::vendor_order_prefix("v1");
        assert!(a.path().starts_with(&prefix));
        assert!(b.path().starts_with(&prefix));
    }
}
