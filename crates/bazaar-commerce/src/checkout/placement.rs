//! Order placement: the one truly transactional operation.
//!
//! Checkout converts a cart into an immutable order inside a single
//! serializable transaction: stock is re-checked against every line,
//! prices are frozen onto order items, stock is decremented, and the
//! cart is cleared. All of it commits or none of it does.

use crate::actor::Actor;
use crate::catalog::pricing::{effective_price, effective_unit_price};
use crate::checkout::order::{Order, OrderItem, OrderStatus};
use crate::checkout::Address;
use crate::config::CommerceConfig;
use crate::db::CommerceStore;
use crate::error::CommerceError;
use crate::ids::OrderItemId;
use crate::money::Money;
use bazaar_cache::{CacheKey, Revalidator};
use serde::{Deserialize, Serialize};

/// Checkout form submitted by the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutForm {
    /// Customer email.
    pub email: String,
    /// Shipping address.
    pub shipping_address: Address,
    /// Billing address; defaults to the shipping address.
    pub billing_address: Option<Address>,
}

impl CheckoutForm {
    /// Validate the form before it reaches the transaction.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(CommerceError::Validation(format!(
                "invalid email address: {:?}",
                self.email
            )));
        }
        if !self.shipping_address.is_complete() {
            return Err(CommerceError::Validation(
                "shipping address is incomplete".into(),
            ));
        }
        if let Some(billing) = &self.billing_address {
            if !billing.is_complete() {
                return Err(CommerceError::Validation(
                    "billing address is incomplete".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Store-backed checkout service.
#[derive(Clone)]
pub struct CheckoutService {
    store: CommerceStore,
    revalidator: Revalidator,
    config: CommerceConfig,
}

impl CheckoutService {
    pub fn new(store: CommerceStore, revalidator: Revalidator, config: CommerceConfig) -> Self {
        Self {
            store,
            revalidator,
            config,
        }
    }

    /// Place an order from the actor's cart.
    ///
    /// Fails with `AuthenticationRequired` for anonymous callers,
    /// `EmptyCart` when there is nothing to order, and
    /// `InsufficientStock` (naming the offending variation) when any
    /// line can no longer be fulfilled. A timed-out transaction is
    /// retried once with backoff before `Transaction` is surfaced;
    /// retries stop once the overall `txn_timeout_ms` deadline passes.
    ///
    /// On success the cached order listings of the customer (and their
    /// affiliated vendor, if any) are revalidated, best-effort.
    pub fn place_order(
        &self,
        actor: Option<&Actor>,
        form: &CheckoutForm,
    ) -> Result<Order, CommerceError> {
        let actor = actor.ok_or(CommerceError::AuthenticationRequired)?;
        form.validate()?;

        let deadline = std::time::Instant::now()
            + std::time::Duration::from_millis(self.config.txn_timeout_ms);
        let mut attempts = 0;
        let order = loop {
            match self.place_order_txn(actor, form) {
                Ok(order) => break order,
                Err(e)
                    if e.is_retryable()
                        && attempts < self.config.txn_retries
                        && std::time::Instant::now() < deadline =>
                {
                    attempts += 1;
                    tracing::warn!(
                        user = %actor.user_id,
                        attempt = attempts,
                        error = %e,
                        "checkout transaction timed out, retrying"
                    );
                    std::thread::sleep(std::time::Duration::from_millis(
                        self.config.retry_backoff_ms,
                    ));
                }
                Err(e) => return Err(e),
            }
        };

        self.revalidate_order_lists(actor);
        tracing::info!(
            order = %order.reference,
            user = %actor.user_id,
            items = order.items.len(),
            total_cents = order.total_amount.amount_cents,
            "order placed"
        );
        Ok(order)
    }

    fn place_order_txn(&self, actor: &Actor, form: &CheckoutForm) -> Result<Order, CommerceError> {
        self.store.transaction(|db| {
            // 1. Load the cart; an empty cart never reaches the decrement.
            let cart = db
                .carts
                .get(&actor.user_id)
                .filter(|c| !c.is_empty())
                .ok_or(CommerceError::EmptyCart)?
                .clone();

            // 2-4. Re-check stock against every line and freeze prices.
            // The re-check runs here, inside the same transaction as the
            // decrement, to close the add-to-cart/checkout gap.
            let mut items = Vec::with_capacity(cart.items.len());
            for line in &cart.items {
                let variation = db.variation(&line.variation_id)?;
                if variation.quantity < line.quantity {
                    return Err(CommerceError::InsufficientStock {
                        variation_id: line.variation_id.to_string(),
                        requested: line.quantity,
                        available: variation.quantity,
                    });
                }
                let product = db.product(&variation.product_id)?;
                let unit_price = effective_unit_price(
                    product.selling_price,
                    &product.pricing_rules,
                    line.quantity,
                )?;
                let total_price = effective_price(
                    product.selling_price,
                    &product.pricing_rules,
                    line.quantity,
                )?;
                items.push(OrderItem {
                    id: OrderItemId::generate(),
                    variation_id: line.variation_id.clone(),
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    sku: variation.sku.clone(),
                    quantity: line.quantity,
                    unit_price,
                    total_price,
                });
            }

            let currency = items[0].total_price.currency;
            let total_amount = Money::try_sum(items.iter().map(|i| &i.total_price), currency)
                .ok_or(CommerceError::Overflow)?;

            let now = current_timestamp();
            let order = Order {
                id: crate::ids::OrderId::generate(),
                reference: Order::generate_reference(),
                user_id: actor.user_id.clone(),
                status: OrderStatus::Pending,
                items,
                shipping_address: form.shipping_address.clone(),
                billing_address: form
                    .billing_address
                    .clone()
                    .unwrap_or_else(|| form.shipping_address.clone()),
                email: form.email.clone(),
                total_amount,
                placed_at: now,
                updated_at: now,
            };

            // 5. Decrement stock. The check above guarantees this never
            // drives a quantity below zero.
            for item in &order.items {
                let variation = db
                    .variations
                    .get_mut(&item.variation_id)
                    .ok_or_else(|| CommerceError::VariationNotFound(item.variation_id.to_string()))?;
                variation.quantity -= item.quantity;
            }

            // 6. Clear the cart. Runs in the same transaction, so the
            // cart survives intact if anything above failed.
            if let Some(cart) = db.carts.get_mut(&actor.user_id) {
                cart.items.clear();
                cart.touch();
            }

            db.orders.insert(order.id.clone(), order.clone());
            Ok(order)
        })
    }

    fn revalidate_order_lists(&self, actor: &Actor) {
        let mut paths = vec![CacheKey::OrderList {
            user_id: actor.user_id.to_string(),
        }
        .path()];
        let vendor_id = self
            .store
            .read(|db| db.customers.get(&actor.user_id).and_then(|c| c.vendor_id.clone()));
        if let Some(vendor_id) = vendor_id {
            // Drop every acting user's cached pages for that vendor.
            paths.push(CacheKey::vendor_order_prefix(vendor_id.as_str()));
        }
        self.revalidator.revalidate(&paths);
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
    use crate::cart::CartService;
    use crate::catalog::pricing::PricingRule;
    use crate::catalog::product::{Product, Variation};
    use crate::db::Database;
    use crate::ids::{UserId, VariationId};
    use crate::money::Currency;
    use bazaar_cache::QueryCache;
    use bazaar_store::{Store, StoreConfig};

    fn zar(cents: i64) -> Money {
        Money::new(cents, Currency::ZAR)
    }

    fn form() -> CheckoutForm {
        CheckoutForm {
            email: "thandi@example.com".into(),
            shipping_address: Address::new(
                "Thandi",
                "Mokoena",
                "12 Long St",
                "Cape Town",
                "ZA",
                "8001",
            ),
            billing_address: None,
        }
    }

    struct Fixture {
        checkout: CheckoutService,
        carts: CartService,
        store: CommerceStore,
        variation_id: VariationId,
    }

    fn fixture(stock: i64, rules: Vec<PricingRule>) -> Fixture {
        fixture_with(stock, rules, CommerceConfig::default())
    }

    fn fixture_with(stock: i64, rules: Vec<PricingRule>, config: CommerceConfig) -> Fixture {
        let store = Store::new(Database::default(), config.store.clone());
        let variation_id = store
            .transaction(|db| {
                let mut product = Product::new("Tote", "tote", zar(10000), None);
                product.published = true;
                product.pricing_rules = rules;
                let variation = Variation::new(product.id.clone(), "SKU-1", stock);
                let id = variation.id.clone();
                db.variations.insert(id.clone(), variation);
                db.products.insert(product.id.clone(), product);
                Ok::<_, CommerceError>(id)
            })
            .unwrap();
        let revalidator = Revalidator::new(QueryCache::new());
        Fixture {
            checkout: CheckoutService::new(store.clone(), revalidator, config),
            carts: CartService::new(store.clone()),
            store,
            variation_id,
        }
    }

    #[test]
    fn test_anonymous_checkout_rejected() {
        let fx = fixture(2, vec![]);
        let result = fx.checkout.place_order(None, &form());
        assert!(matches!(result, Err(CommerceError::AuthenticationRequired)));
    }

    #[test]
    fn test_empty_cart_rejected() {
        let fx = fixture(2, vec![]);
        let actor = Actor::customer(UserId::new("u1"));
        let result = fx.checkout.place_order(Some(&actor), &form());
        assert!(matches!(result, Err(CommerceError::EmptyCart)));
    }

    #[test]
    fn test_invalid_form_rejected() {
        let fx = fixture(2, vec![]);
        let actor = Actor::customer(UserId::new("u1"));
        let mut bad = form();
        bad.email = "not-an-email".into();
        let result = fx.checkout.place_order(Some(&actor), &bad);
        assert!(matches!(result, Err(CommerceError::Validation(_))));
    }

    #[test]
    fn test_successful_checkout() {
        // Stock 2, order qty 2 -> stock 0, cart empty.
        let fx = fixture(2, vec![]);
        let actor = Actor::customer(UserId::new("u1"));
        fx.carts.add_item(&actor, &fx.variation_id, 2).unwrap();

        let order = fx.checkout.place_order(Some(&actor), &form()).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total_amount, zar(20000));
        assert_eq!(order.items[0].unit_price, zar(10000));

        let stock = fx
            .store
            .read(|db| db.variations.get(&fx.variation_id).unwrap().quantity);
        assert_eq!(stock, 0);
        assert!(fx.carts.get_cart(&actor).unwrap().lines.is_empty());
    }

    #[test]
    fn test_tiered_price_frozen_on_order() {
        let fx = fixture(10, vec![PricingRule::percentage(5, 10, 10.0).unwrap()]);
        let actor = Actor::customer(UserId::new("u1"));
        fx.carts.add_item(&actor, &fx.variation_id, 7).unwrap();

        let order = fx.checkout.place_order(Some(&actor), &form()).unwrap();
        assert_eq!(order.total_amount, zar(63000));
        assert_eq!(order.items[0].unit_price, zar(9000));
        assert_eq!(order.items[0].total_price, zar(63000));
    }

    #[test]
    fn test_failed_checkout_leaves_cart_intact() {
        // Stock shrinks between add and checkout; nothing changes.
        let fx = fixture(3, vec![]);
        let actor = Actor::customer(UserId::new("u1"));
        fx.carts.add_item(&actor, &fx.variation_id, 3).unwrap();

        // Another checkout takes 2 units first.
        let rival = Actor::customer(UserId::new("u2"));
        fx.carts.add_item(&rival, &fx.variation_id, 2).unwrap();
        fx.checkout.place_order(Some(&rival), &form()).unwrap();

        let result = fx.checkout.place_order(Some(&actor), &form());
        assert!(matches!(
            result,
            Err(CommerceError::InsufficientStock { requested: 3, available: 1, .. })
        ));

        // Cart unchanged, no order persisted for the loser, stock untouched
        // by the failed attempt.
        assert_eq!(fx.carts.get_cart(&actor).unwrap().lines[0].quantity, 3);
        let (orders, stock) = fx.store.read(|db| {
            (
                db.orders.len(),
                db.variations.get(&fx.variation_id).unwrap().quantity,
            )
        });
        assert_eq!(orders, 1);
        assert_eq!(stock, 1);
    }

    #[test]
    fn test_timed_out_checkout_retries_and_succeeds() {
        // First attempt hits the writer-gate timeout while a slow
        // transaction holds the gate; the single retry lands after the
        // gate is released.
        let config = CommerceConfig {
            store: StoreConfig {
                max_wait_ms: 40,
                poll_interval_ms: 1,
            },
            retry_backoff_ms: 150,
            ..CommerceConfig::default()
        };
        let fx = fixture_with(2, vec![], config);
        let actor = Actor::customer(UserId::new("u1"));
        fx.carts.add_item(&actor, &fx.variation_id, 2).unwrap();

        let blocker = fx.store.clone();
        let handle = std::thread::spawn(move || {
            blocker
                .transaction(|_db| {
                    std::thread::sleep(std::time::Duration::from_millis(120));
                    Ok::<_, CommerceError>(())
                })
                .unwrap();
        });
        std::thread::sleep(std::time::Duration::from_millis(30));

        let order = fx.checkout.place_order(Some(&actor), &form()).unwrap();
        assert_eq!(order.total_amount, zar(20000));
        handle.join().unwrap();

        let stock = fx
            .store
            .read(|db| db.variations.get(&fx.variation_id).unwrap().quantity);
        assert_eq!(stock, 0);
    }

    #[test]
    fn test_checkout_deadline_suppresses_retry() {
        // With the overall deadline already spent, a timed-out attempt
        // surfaces immediately instead of backing off and retrying.
        let config = CommerceConfig {
            store: StoreConfig {
                max_wait_ms: 20,
                poll_interval_ms: 1,
            },
            txn_timeout_ms: 0,
            retry_backoff_ms: 500,
            ..CommerceConfig::default()
        };
        let fx = fixture_with(2, vec![], config);
        let actor = Actor::customer(UserId::new("u1"));
        fx.carts.add_item(&actor, &fx.variation_id, 1).unwrap();

        let blocker = fx.store.clone();
        let handle = std::thread::spawn(move || {
            blocker
                .transaction(|_db| {
                    std::thread::sleep(std::time::Duration::from_millis(200));
                    Ok::<_, CommerceError>(())
                })
                .unwrap();
        });
        std::thread::sleep(std::time::Duration::from_millis(30));

        let started = std::time::Instant::now();
        let result = fx.checkout.place_order(Some(&actor), &form());
        assert!(matches!(result, Err(CommerceError::Transaction(_))));
        // Failing fast means no 500ms backoff was taken.
        assert!(started.elapsed() < std::time::Duration::from_millis(400));
        handle.join().unwrap();

        assert_eq!(fx.store.read(|db| db.orders.len()), 0);
    }
}
