//! The storefront facade: one entry point bundling every service.

use crate::actor::Actor;
use crate::api::request::CommerceRequest;
use crate::api::response::ApiResponse;
use crate::cart::CartService;
use crate::catalog::media::{BlobStore, InMemoryBlobStore};
use crate::catalog::pricing::PricingRule;
use crate::catalog::CatalogService;
use crate::checkout::CheckoutService;
use crate::config::CommerceConfig;
use crate::db::{CommerceStore, Database};
use crate::error::CommerceError;
use crate::ids::{CartItemId, OrderId, ProductId, VariationId, VendorId};
use crate::orders::OrderService;
use bazaar_cache::{QueryCache, Revalidator};
use bazaar_store::Store;
use std::sync::Arc;

/// The assembled storefront.
///
/// Owns one shared store, one query cache, and the services on top of
/// them. Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct Commerce {
    store: CommerceStore,
    carts: CartService,
    catalog: CatalogService,
    checkout: CheckoutService,
    orders: OrderService,
}

impl Commerce {
    /// Assemble a storefront with in-memory blob storage.
    pub fn new(config: CommerceConfig) -> Self {
        Self::with_blob_store(config, Arc::new(InMemoryBlobStore::new()))
    }

    /// Assemble a storefront with the given blob store.
    pub fn with_blob_store(config: CommerceConfig, blobs: Arc<dyn BlobStore>) -> Self {
        let store = Store::new(Database::default(), config.store.clone());
        let cache = QueryCache::new();
        let revalidator = Revalidator::new(cache.clone());
        Self {
            carts: CartService::new(store.clone()),
            catalog: CatalogService::new(store.clone(), blobs),
            checkout: CheckoutService::new(store.clone(), revalidator, config.clone()),
            orders: OrderService::new(store.clone(), cache, config),
            store,
        }
    }

    /// Cart operations.
    pub fn carts(&self) -> &CartService {
        &self.carts
    }

    /// Catalog administration.
    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    /// Order placement.
    pub fn checkout(&self) -> &CheckoutService {
        &self.checkout
    }

    /// Order listing and status management.
    pub fn orders(&self) -> &OrderService {
        &self.orders
    }

    /// The shared store, for seeding and direct inspection.
    pub fn store(&self) -> &CommerceStore {
        &self.store
    }

    /// Run one operation and fold the outcome into the uniform envelope.
    ///
    /// Every domain error is converted here; nothing raises past this
    /// boundary.
    pub fn dispatch(
        &self,
        actor: Option<&Actor>,
        request: &CommerceRequest,
    ) -> ApiResponse<serde_json::Value> {
        self.dispatch_inner(actor, request).into()
    }

    fn dispatch_inner(
        &self,
        actor: Option<&Actor>,
        request: &CommerceRequest,
    ) -> Result<serde_json::Value, CommerceError> {
        request.validate()?;
        match request {
            CommerceRequest::AddCartItem {
                variation_id,
                quantity,
            } => {
                let actor = require_actor(actor)?;
                let item_id =
                    self.carts
                        .add_item(actor, &VariationId::new(variation_id.clone()), *quantity)?;
                to_json(&item_id)
            }
            CommerceRequest::UpdateCartQuantity { item_id, quantity } => {
                let actor = require_actor(actor)?;
                self.carts
                    .update_quantity(actor, &CartItemId::new(item_id.clone()), *quantity)?;
                to_json(&())
            }
            CommerceRequest::RemoveCartItem { item_id } => {
                let actor = require_actor(actor)?;
                self.carts
                    .remove_item(actor, &CartItemId::new(item_id.clone()))?;
                to_json(&())
            }
            CommerceRequest::GetCart => {
                let actor = require_actor(actor)?;
                to_json(&self.carts.get_cart(actor)?)
            }
            CommerceRequest::PlaceOrder { form } => {
                to_json(&self.checkout.place_order(actor, form)?)
            }
            CommerceRequest::ListOrders { query } => {
                let actor = require_actor(actor)?;
                to_json(&self.orders.list_orders(actor, query)?)
            }
            CommerceRequest::GetOrder { order_id } => {
                let actor = require_actor(actor)?;
                to_json(&self.orders.get_order(actor, &OrderId::new(order_id.clone()))?)
            }
            CommerceRequest::UpdateOrderStatus { order_id, status } => {
                let actor = require_actor(actor)?;
                let status = crate::checkout::OrderStatus::from_str(status)
                    .ok_or_else(|| CommerceError::Validation(format!("unknown status: {status:?}")))?;
                to_json(&self.orders.update_status(
                    actor,
                    &OrderId::new(order_id.clone()),
                    status,
                )?)
            }
            CommerceRequest::UpsertPricingRules { product_id, rules } => {
                let actor = require_actor(actor)?;
                let product_id = ProductId::new(product_id.clone());
                // Rules are priced in the product's currency.
                let currency = self
                    .store
                    .read(|db| db.product(&product_id).map(|p| p.selling_price.currency))?;
                let rules = rules
                    .iter()
                    .map(|spec| {
                        PricingRule::parse(
                            &spec.from_qty,
                            &spec.to_qty,
                            &spec.kind,
                            &spec.amount,
                            currency,
                        )
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                self.catalog.upsert_pricing_rules(actor, &product_id, rules)?;
                to_json(&())
            }
            CommerceRequest::ListProducts { vendor_id } => {
                let vendor_id = vendor_id.as_ref().map(|v| VendorId::new(v.clone()));
                to_json(&self.catalog.list_published(vendor_id.as_ref()))
            }
        }
    }
}

fn require_actor<'a>(actor: Option<&'a Actor>) -> Result<&'a Actor, CommerceError> {
    actor.ok_or(CommerceError::AuthenticationRequired)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, CommerceError> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::service::{NewProduct, NewVariation};
    use crate::ids::UserId;
    use crate::money::{Currency, Money};

    fn seeded() -> (Commerce, String) {
        let commerce = Commerce::new(CommerceConfig::default());
        let admin = Actor::admin(UserId::new("admin"));
        let product = commerce
            .catalog()
            .create_product(
                &admin,
                NewProduct {
                    name: "Canvas Tote".into(),
                    slug: "canvas-tote".into(),
                    tags: vec![],
                    selling_price: Money::new(10000, Currency::ZAR),
                    vendor_id: None,
                },
            )
            .unwrap();
        commerce
            .catalog()
            .set_published(&admin, &product.id, true)
            .unwrap();
        let variation = commerce
            .catalog()
            .add_variation(
                &admin,
                &product.id,
                NewVariation {
                    sku: "SKU-1".into(),
                    color: None,
                    size: None,
                    image_url: None,
                    quantity: 5,
                },
            )
            .unwrap();
        (commerce, variation.id.into_inner())
    }

    #[test]
    fn test_dispatch_success_envelope() {
        let (commerce, variation_id) = seeded();
        let actor = Actor::customer(UserId::new("u1"));
        let response = commerce.dispatch(
            Some(&actor),
            &CommerceRequest::AddCartItem {
                variation_id,
                quantity: 2,
            },
        );
        assert!(response.success);
        assert!(response.data.is_some());
    }

    #[test]
    fn test_dispatch_error_envelope_names_shortage() {
        let (commerce, variation_id) = seeded();
        let actor = Actor::customer(UserId::new("u1"));
        let response = commerce.dispatch(
            Some(&actor),
            &CommerceRequest::AddCartItem {
                variation_id: variation_id.clone(),
                quantity: 9,
            },
        );
        assert!(!response.success);
        let message = response.error.unwrap();
        assert!(message.contains(&variation_id));
        assert!(message.contains('9'));
    }

    #[test]
    fn test_dispatch_requires_actor_for_cart_ops() {
        let (commerce, _) = seeded();
        let response = commerce.dispatch(None, &CommerceRequest::GetCart);
        assert!(!response.success);
    }

    #[test]
    fn test_dispatch_lists_products_anonymously() {
        let (commerce, _) = seeded();
        let response =
            commerce.dispatch(None, &CommerceRequest::ListProducts { vendor_id: None });
        assert!(response.success);
    }

    #[test]
    fn test_dispatch_parses_pricing_rules() {
        let (commerce, _) = seeded();
        let admin = Actor::admin(UserId::new("admin"));
        let product_id = commerce
            .store()
            .read(|db| db.products.values().next().map(|p| p.id.clone()))
            .unwrap();

        let response = commerce.dispatch(
            Some(&admin),
            &CommerceRequest::UpsertPricingRules {
                product_id: product_id.to_string(),
                rules: vec![crate::api::request::RuleSpec {
                    from_qty: "5".into(),
                    to_qty: "10".into(),
                    kind: "percentage".into(),
                    amount: "10".into(),
                }],
            },
        );
        assert!(response.success, "{:?}", response.error);

        let bad = commerce.dispatch(
            Some(&admin),
            &CommerceRequest::UpsertPricingRules {
                product_id: product_id.to_string(),
                rules: vec![crate::api::request::RuleSpec {
                    from_qty: "5".into(),
                    to_qty: "10".into(),
                    kind: "percentage".into(),
                    amount: "NaN".into(),
                }],
            },
        );
        assert!(!bad.success);
    }
}
