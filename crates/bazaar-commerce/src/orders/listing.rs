//! Order listing and status management.

use crate::actor::{Actor, Role};
use crate::checkout::{Order, OrderStatus};
use crate::config::CommerceConfig;
use crate::db::{CommerceStore, Database};
use crate::error::CommerceError;
use crate::ids::{OrderId, UserId};
use crate::money::Money;
use crate::orders::filter::{OrderQuery, Page, Pagination};
use bazaar_cache::{CacheKey, QueryCache};
use serde::{Deserialize, Serialize};

/// A row in an order listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Order identifier.
    pub id: OrderId,
    /// Human-readable reference.
    pub reference: String,
    /// Customer who placed the order.
    pub user_id: UserId,
    /// Recipient full name.
    pub recipient: String,
    /// Order status.
    pub status: OrderStatus,
    /// Number of items.
    pub item_count: i64,
    /// Grand total.
    pub total_amount: Money,
    /// Unix timestamp of placement.
    pub placed_at: i64,
}

impl OrderSummary {
    fn from_order(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            reference: order.reference.clone(),
            user_id: order.user_id.clone(),
            recipient: order.shipping_address.full_name(),
            status: order.status,
            item_count: order.item_count(),
            total_amount: order.total_amount,
            placed_at: order.placed_at,
        }
    }
}

/// Read side of orders: filtered listings and status updates.
#[derive(Clone)]
pub struct OrderService {
    store: CommerceStore,
    cache: QueryCache,
    config: CommerceConfig,
}

impl OrderService {
    pub fn new(store: CommerceStore, cache: QueryCache, config: CommerceConfig) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// List the orders the actor may see, filtered and paginated.
    ///
    /// Visibility: a customer sees only their own orders; a vendor sees
    /// their own orders plus orders placed by affiliated sub-customers;
    /// an admin sees everything. Requesting another party's orders
    /// without the role for it fails with `Authorization`.
    ///
    /// Results are cached per actor scope and query; the cache is
    /// revalidated whenever an order is placed or its status changes.
    pub fn list_orders(
        &self,
        actor: &Actor,
        query: &OrderQuery,
    ) -> Result<Page<OrderSummary>, CommerceError> {
        self.check_scope(actor, query)?;

        let cache_path = format!("{}?{}", self.scope_key(actor).path(), query.fingerprint());
        if let Some(page) = self.cache.get_path::<Page<OrderSummary>>(&cache_path)? {
            return Ok(page);
        }

        let page = self.store.read(|db| {
            let mut orders: Vec<Order> = db
                .orders
                .values()
                .filter(|order| self.visible_to(actor, order, db))
                .filter(|order| query.matches(order))
                .cloned()
                .collect();
            query.sort_orders(&mut orders);

            let per_page = if query.per_page <= 0 {
                self.config.default_page_size
            } else {
                query.per_page.min(self.config.max_page_size)
            };
            let page_no = query.page.max(1);
            let pagination = Pagination::new(page_no, per_page, orders.len() as i64);

            let start = pagination.offset().min(orders.len() as i64) as usize;
            let end = (pagination.offset() + per_page).min(orders.len() as i64) as usize;
            let items = orders[start..end].iter().map(OrderSummary::from_order).collect();

            Page { items, pagination }
        });

        self.cache
            .set_path(&cache_path, self.scope_key(actor).ttl(), &page)?;
        Ok(page)
    }

    /// Fetch a single order, subject to the same visibility rules.
    pub fn get_order(&self, actor: &Actor, order_id: &OrderId) -> Result<Order, CommerceError> {
        self.store.read(|db| {
            let order = db
                .orders
                .get(order_id)
                .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()))?;
            if !self.visible_to(actor, order, db) {
                return Err(CommerceError::Authorization(
                    "order belongs to another party".into(),
                ));
            }
            Ok(order.clone())
        })
    }

    /// Move an order to a new status. Vendor/admin only; transitions are
    /// validated against the status machine.
    pub fn update_status(
        &self,
        actor: &Actor,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, CommerceError> {
        if !actor.is_elevated() {
            return Err(CommerceError::Authorization(
                "only vendors and admins may update order status".into(),
            ));
        }
        let order = self.store.transaction(|db| {
            let current = db
                .orders
                .get(order_id)
                .cloned()
                .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()))?;
            if !self.visible_to(actor, &current, db) {
                return Err(CommerceError::Authorization(
                    "order belongs to another party".into(),
                ));
            }
            let order = db
                .orders
                .get_mut(order_id)
                .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_string()))?;
            order.set_status(status)?;
            Ok(order.clone())
        })?;

        // Status shows up in listings; drop the affected cache scopes.
        self.cache.invalidate_prefix("orders/");
        tracing::info!(order = %order.reference, status = %order.status, "order status updated");
        Ok(order)
    }

    fn check_scope(&self, actor: &Actor, query: &OrderQuery) -> Result<(), CommerceError> {
        let Some(requested) = &query.customer_id else {
            return Ok(());
        };
        match actor.role {
            Role::Admin => Ok(()),
            Role::Customer if requested == &actor.user_id => Ok(()),
            Role::Customer => Err(CommerceError::Authorization(
                "customers may only list their own orders".into(),
            )),
            Role::Vendor => {
                if requested == &actor.user_id || self.affiliated(actor, requested) {
                    Ok(())
                } else {
                    Err(CommerceError::Authorization(
                        "customer is not affiliated with this storefront".into(),
                    ))
                }
            }
        }
    }

    fn affiliated(&self, actor: &Actor, customer_id: &UserId) -> bool {
        self.store.read(|db| {
            db.customers
                .get(customer_id)
                .and_then(|c| c.vendor_id.as_ref())
                .map(|v| Some(v) == actor.vendor_id.as_ref())
                .unwrap_or(false)
        })
    }

    fn visible_to(&self, actor: &Actor, order: &Order, db: &Database) -> bool {
        match actor.role {
            Role::Admin => true,
            Role::Customer => order.user_id == actor.user_id,
            Role::Vendor => {
                if order.user_id == actor.user_id {
                    return true;
                }
                db.customers
                    .get(&order.user_id)
                    .and_then(|c| c.vendor_id.as_ref())
                    .map(|v| Some(v) == actor.vendor_id.as_ref())
                    .unwrap_or(false)
            }
        }
    }

    fn scope_key(&self, actor: &Actor) -> CacheKey {
        match (&actor.role, &actor.vendor_id) {
            // Keyed per acting user as well: vendor colleagues have
            // different visible sets and must not share cached pages.
            (Role::Vendor, Some(vendor_id)) => CacheKey::VendorOrderList {
                vendor_id: vendor_id.to_string(),
                user_id: actor.user_id.to_string(),
            },
            _ => CacheKey::OrderList {
                user_id: actor.user_id.to_string(),
            },
        }
    }
}
