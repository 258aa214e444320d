//! Database snapshot: the relations the commerce services operate on.

use crate::actor::CustomerRecord;
use crate::cart::Cart;
use crate::catalog::{Product, Variation};
use crate::checkout::Order;
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId, UserId, VariationId};
use bazaar_store::{Store, Table};

/// The full relational state of the storefront.
///
/// Used as the snapshot type of [`bazaar_store::Store`]; transactions
/// mutate a working copy that is committed atomically.
#[derive(Debug, Clone, Default)]
pub struct Database {
    /// Products, including their pricing rules.
    pub products: Table<ProductId, Product>,
    /// Variations (the purchasable SKUs carrying stock).
    pub variations: Table<VariationId, Variation>,
    /// Carts, one per user.
    pub carts: Table<UserId, Cart>,
    /// Orders.
    pub orders: Table<OrderId, Order>,
    /// Registered users with roles and vendor affiliations.
    pub customers: Table<UserId, CustomerRecord>,
}

impl Database {
    /// Look up a product or fail with `ProductNotFound`.
    pub fn product(&self, id: &ProductId) -> Result<&Product, CommerceError> {
        self.products
            .get(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    /// Look up a variation or fail with `VariationNotFound`.
    pub fn variation(&self, id: &VariationId) -> Result<&Variation, CommerceError> {
        self.variations
            .get(id)
            .ok_or_else(|| CommerceError::VariationNotFound(id.to_string()))
    }
}

/// The store the commerce services share.
pub type CommerceStore = Store<Database>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};

    #[test]
    fn test_lookup_errors() {
        let db = Database::default();
        assert!(matches!(
            db.product(&ProductId::new("missing")),
            Err(CommerceError::ProductNotFound(_))
        ));
        assert!(matches!(
            db.variation(&VariationId::new("missing")),
            Err(CommerceError::VariationNotFound(_))
        ));
    }

    #[test]
    fn test_lookup_hit() {
        let mut db = Database::default();
        let product = Product::new("Tote", "tote", Money::new(100, Currency::ZAR), None);
        let id = product.id.clone();
        db.products.insert(id.clone(), product);
        assert_eq!(db.product(&id).unwrap().name, "Tote");
    }
}
