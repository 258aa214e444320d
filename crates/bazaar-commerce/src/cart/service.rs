//! Cart operations: add, update, remove, read with live pricing.

use crate::actor::Actor;
use crate::cart::cart::{Cart, CartItem};
use crate::catalog::pricing::{effective_price, effective_unit_price};
use crate::db::CommerceStore;
use crate::error::CommerceError;
use crate::ids::{CartId, CartItemId, ProductId, VariationId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A cart rendered for display, with prices computed at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartView {
    /// Cart identifier.
    pub cart_id: CartId,
    /// Priced lines.
    pub lines: Vec<CartLine>,
    /// Sum of line totals.
    pub subtotal: Money,
}

/// One priced line of a cart view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Cart item identifier.
    pub item_id: CartItemId,
    /// Variation being purchased.
    pub variation_id: VariationId,
    /// Owning product.
    pub product_id: ProductId,
    /// Product name.
    pub product_name: String,
    /// Variation display name (e.g. "Blue / L").
    pub variation_name: String,
    /// Quantity.
    pub quantity: i64,
    /// Effective per-unit price under the product's pricing rules.
    pub unit_price: Money,
    /// Effective line total.
    pub line_total: Money,
}

/// Store-backed cart aggregate.
#[derive(Clone)]
pub struct CartService {
    store: CommerceStore,
}

impl CartService {
    pub fn new(store: CommerceStore) -> Self {
        Self { store }
    }

    /// Add a quantity of a variation to the actor's cart.
    ///
    /// Merge semantics: if the cart already holds the variation, the
    /// quantities are combined. The stock check runs against the merged
    /// total, so a cart can never ask for more than is in stock at add
    /// time.
    pub fn add_item(
        &self,
        actor: &Actor,
        variation_id: &VariationId,
        quantity: i64,
    ) -> Result<CartItemId, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        self.store.transaction(|db| {
            let variation = db.variation(variation_id)?.clone();

            let existing_qty = db
                .carts
                .get(&actor.user_id)
                .and_then(|cart| cart.item_for_variation(variation_id))
                .map(|item| item.quantity)
                .unwrap_or(0);
            let merged = existing_qty
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            if merged > variation.quantity {
                return Err(CommerceError::InsufficientStock {
                    variation_id: variation_id.to_string(),
                    requested: merged,
                    available: variation.quantity,
                });
            }

            // Lazily create the cart on first add.
            if !db.carts.contains_key(&actor.user_id) {
                db.carts
                    .insert(actor.user_id.clone(), Cart::new(actor.user_id.clone()));
            }
            let cart = db
                .carts
                .get_mut(&actor.user_id)
                .ok_or_else(|| CommerceError::Storage("cart vanished mid-transaction".into()))?;

            let item_id = if let Some(item) = cart
                .items
                .iter_mut()
                .find(|i| &i.variation_id == variation_id)
            {
                item.quantity = merged;
                item.id.clone()
            } else {
                let item = CartItem::new(variation_id.clone(), quantity);
                let id = item.id.clone();
                cart.items.push(item);
                id
            };
            cart.touch();
            tracing::debug!(user = %actor.user_id, variation = %variation_id, quantity, "added to cart");
            Ok(item_id)
        })
    }

    /// Set the quantity of a cart item.
    ///
    /// A quantity of zero or less removes the item, same as
    /// [`remove_item`](Self::remove_item).
    pub fn update_quantity(
        &self,
        actor: &Actor,
        item_id: &CartItemId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return self.remove_item(actor, item_id);
        }
        self.store.transaction(|db| {
            let cart = db
                .carts
                .get(&actor.user_id)
                .ok_or_else(|| CommerceError::CartItemNotFound(item_id.to_string()))?;
            let variation_id = cart
                .get_item(item_id)
                .ok_or_else(|| CommerceError::CartItemNotFound(item_id.to_string()))?
                .variation_id
                .clone();

            let available = db.variation(&variation_id)?.quantity;
            if quantity > available {
                return Err(CommerceError::InsufficientStock {
                    variation_id: variation_id.to_string(),
                    requested: quantity,
                    available,
                });
            }

            let cart = db
                .carts
                .get_mut(&actor.user_id)
                .ok_or_else(|| CommerceError::CartItemNotFound(item_id.to_string()))?;
            if let Some(item) = cart.items.iter_mut().find(|i| &i.id == item_id) {
                item.quantity = quantity;
            }
            cart.touch();
            tracing::debug!(user = %actor.user_id, item = %item_id, quantity, "updated cart quantity");
            Ok(())
        })
    }

    /// Remove an item from the actor's cart.
    pub fn remove_item(&self, actor: &Actor, item_id: &CartItemId) -> Result<(), CommerceError> {
        self.store.transaction(|db| {
            let cart = db
                .carts
                .get_mut(&actor.user_id)
                .ok_or_else(|| CommerceError::CartItemNotFound(item_id.to_string()))?;
            let before = cart.items.len();
            cart.items.retain(|i| &i.id != item_id);
            if cart.items.len() == before {
                return Err(CommerceError::CartItemNotFound(item_id.to_string()));
            }
            cart.touch();
            tracing::debug!(user = %actor.user_id, item = %item_id, "removed cart item");
            Ok(())
        })
    }

    /// Read the actor's cart with prices computed live.
    ///
    /// Returns an empty view if the user has no cart yet. Totals are
    /// never cached; a price change on a product is reflected in the
    /// next read of any unconverted cart holding it.
    pub fn get_cart(&self, actor: &Actor) -> Result<CartView, CommerceError> {
        self.store.read(|db| {
            let cart = match db.carts.get(&actor.user_id) {
                Some(cart) => cart,
                None => {
                    return Ok(CartView {
                        cart_id: CartId::generate(),
                        lines: Vec::new(),
                        subtotal: Money::zero(Currency::default()),
                    })
                }
            };

            let mut lines = Vec::with_capacity(cart.items.len());
            for item in &cart.items {
                let variation = db.variation(&item.variation_id)?;
                let product = db.product(&variation.product_id)?;
                let unit_price = effective_unit_price(
                    product.selling_price,
                    &product.pricing_rules,
                    item.quantity,
                )?;
                let line_total = effective_price(
                    product.selling_price,
                    &product.pricing_rules,
                    item.quantity,
                )?;
                lines.push(CartLine {
                    item_id: item.id.clone(),
                    variation_id: item.variation_id.clone(),
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    variation_name: variation.display_name(),
                    quantity: item.quantity,
                    unit_price,
                    line_total,
                });
            }

            let currency = lines
                .first()
                .map(|l| l.line_total.currency)
                .unwrap_or_default();
            let subtotal = Money::try_sum(lines.iter().map(|l| &l.line_total), currency)
                .ok_or(CommerceError::Overflow)?;

            Ok(CartView {
                cart_id: cart.id.clone(),
                lines,
                subtotal,
            })
        })
    }
}
