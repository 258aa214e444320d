//! Catalog: products, variations, pricing rules, media.

pub mod media;
pub mod pricing;
pub mod product;
pub mod service;

pub use media::{BlobStore, InMemoryBlobStore, MediaAsset};
pub use pricing::{effective_price, effective_unit_price, validate_rule_set, PricingRule, RuleAction};
pub use product::{Product, Variation};
pub use service::{CatalogService, NewProduct, NewVariation};
