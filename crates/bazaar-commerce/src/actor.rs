//! Actors, roles, and customer records.

use crate::ids::{UserId, VendorId};
use serde::{Deserialize, Serialize};

/// Role attached to an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Shops on the shared storefront or a vendor storefront.
    #[default]
    Customer,
    /// Runs a white-labeled storefront; manages its own catalog.
    Vendor,
    /// Platform administrator.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Vendor => "vendor",
            Role::Admin => "admin",
        }
    }
}

/// An authenticated caller of a commerce operation.
///
/// Produced by the session provider; the commerce core trusts it and
/// never verifies credentials itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The acting user.
    pub user_id: UserId,
    /// The user's role.
    pub role: Role,
    /// For vendor actors, the vendor they act for.
    pub vendor_id: Option<VendorId>,
}

impl Actor {
    /// Create a customer actor.
    pub fn customer(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Customer,
            vendor_id: None,
        }
    }

    /// Create a vendor actor.
    pub fn vendor(user_id: UserId, vendor_id: VendorId) -> Self {
        Self {
            user_id,
            role: Role::Vendor,
            vendor_id: Some(vendor_id),
        }
    }

    /// Create an admin actor.
    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Admin,
            vendor_id: None,
        }
    }

    /// Whether this actor holds an elevated role.
    pub fn is_elevated(&self) -> bool {
        matches!(self.role, Role::Vendor | Role::Admin)
    }
}

/// Persisted record for a registered user.
///
/// Carries the vendor affiliation that drives order-listing visibility:
/// a vendor sees orders placed by its affiliated sub-customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// User identifier.
    pub user_id: UserId,
    /// Display name.
    pub display_name: String,
    /// Company name, if any.
    pub company: Option<String>,
    /// Role.
    pub role: Role,
    /// Vendor this customer is affiliated with, if any.
    pub vendor_id: Option<VendorId>,
}

impl CustomerRecord {
    /// Create a plain customer record.
    pub fn customer(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            company: None,
            role: Role::Customer,
            vendor_id: None,
        }
    }

    /// Affiliate this customer with a vendor's storefront.
    pub fn with_vendor(mut self, vendor_id: VendorId) -> Self {
        self.vendor_id = Some(vendor_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_roles() {
        let customer = Actor::customer(UserId::new("u1"));
        assert!(!customer.is_elevated());

        let vendor = Actor::vendor(UserId::new("u2"), VendorId::new("v1"));
        assert!(vendor.is_elevated());
        assert_eq!(vendor.vendor_id, Some(VendorId::new("v1")));
    }

    #[test]
    fn test_customer_record_affiliation() {
        let record = CustomerRecord::customer(UserId::new("u1"), "Thandi M.")
            .with_vendor(VendorId::new("v1"));
        assert_eq!(record.vendor_id, Some(VendorId::new("v1")));
        assert_eq!(record.role, Role::Customer);
    }
}
