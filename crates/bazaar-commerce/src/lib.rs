//! Multi-tenant storefront domain types and logic for Bazaar.
//!
//! This crate provides the commerce core for a white-labeled storefront
//! platform:
//!
//! - **Catalog**: products, variations, tiered pricing rules, media
//! - **Cart**: one cart per user, totals recomputed live through the
//!   price engine
//! - **Checkout**: the atomic order-placement transaction
//! - **Orders**: filtered, cached, visibility-scoped order listings
//! - **Api**: validated request objects and uniform responses
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_commerce::prelude::*;
//!
//! let commerce = Commerce::new(CommerceConfig::default());
//! let shopper = Actor::customer(UserId::new("u1"));
//!
//! commerce.carts().add_item(&shopper, &variation_id, 2)?;
//! let order = commerce.checkout().place_order(Some(&shopper), &form)?;
//! println!("placed {} for {}", order.reference, order.total_amount.display());
//! ```

pub mod actor;
pub mod config;
pub mod error;
pub mod ids;
pub mod money;

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod db;
pub mod orders;

pub use actor::{Actor, CustomerRecord, Role};
pub use config::CommerceConfig;
pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::actor::{Actor, CustomerRecord, Role};
    pub use crate::config::CommerceConfig;
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        BlobStore, CatalogService, InMemoryBlobStore, MediaAsset, NewProduct, NewVariation,
        PricingRule, Product, RuleAction, Variation,
    };

    // Cart
    pub use crate::cart::{Cart, CartItem, CartLine, CartService, CartView};

    // Checkout
    pub use crate::checkout::{
        Address, CheckoutForm, CheckoutService, Order, OrderItem, OrderStatus,
    };

    // Orders
    pub use crate::orders::{
        OrderQuery, OrderService, OrderSort, OrderSummary, Page, Pagination, TotalBucket,
    };

    // Api
    pub use crate::api::{ApiResponse, Commerce, CommerceRequest, RuleSpec};

    // Storage
    pub use crate::db::{CommerceStore, Database};
}
