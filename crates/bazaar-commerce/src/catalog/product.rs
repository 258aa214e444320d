//! Product and variation types.

use crate::catalog::media::MediaAsset;
use crate::catalog::pricing::PricingRule;
use crate::ids::{ProductId, VariationId, VendorId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
///
/// Owned by a vendor or by the platform (`vendor_id == None`). Products
/// are never hard-deleted; unpublishing hides them from storefronts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Owning vendor (None = platform-owned).
    pub vendor_id: Option<VendorId>,
    /// Product name.
    pub name: String,
    /// URL-friendly slug.
    pub slug: String,
    /// Category tags for filtering/search.
    pub tags: Vec<String>,
    /// Base per-unit selling price.
    pub selling_price: Money,
    /// Whether the product is visible on storefronts.
    pub published: bool,
    /// Tiered pricing rules, in priority order. First match wins.
    pub pricing_rules: Vec<PricingRule>,
    /// Featured image, if any.
    pub featured_image: Option<MediaAsset>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Product {
    /// Create a new unpublished product.
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        selling_price: Money,
        vendor_id: Option<VendorId>,
    ) -> Self {
        let now = current_timestamp();
        Self {
            id: ProductId::generate(),
            vendor_id,
            name: name.into(),
            slug: slug.into(),
            tags: Vec::new(),
            selling_price,
            published: false,
            pricing_rules: Vec::new(),
            featured_image: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a category tag (deduplicated).
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
            self.updated_at = current_timestamp();
        }
    }

    /// Whether the product belongs to the given vendor's storefront.
    pub fn owned_by(&self, vendor_id: &VendorId) -> bool {
        self.vendor_id.as_ref() == Some(vendor_id)
    }

    /// Mark the product updated.
    pub fn touch(&mut self) {
        self.updated_at = current_timestamp();
    }
}

/// A purchasable SKU of a product (color/size combination).
///
/// This is the unit added to carts; it carries the stock count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    /// Unique variation identifier.
    pub id: VariationId,
    /// Owning product.
    pub product_id: ProductId,
    /// Color attribute.
    pub color: Option<String>,
    /// Size attribute.
    pub size: Option<String>,
    /// Stock keeping unit.
    pub sku: String,
    /// Image URL for this variation.
    pub image_url: Option<String>,
    /// Units in stock. Never negative.
    pub quantity: i64,
}

impl Variation {
    /// Create a new variation.
    pub fn new(product_id: ProductId, sku: impl Into<String>, quantity: i64) -> Self {
        Self {
            id: VariationId::generate(),
            product_id,
            color: None,
            size: None,
            sku: sku.into(),
            image_url: None,
            quantity: quantity.max(0),
        }
    }

    /// Whether the requested quantity can be fulfilled from stock.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        quantity > 0 && quantity <= self.quantity
    }

    /// Whether the variation is out of stock.
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity <= 0
    }

    /// Display name like "Blue / L" falling back to the SKU.
    pub fn display_name(&self) -> String {
        match (&self.color, &self.size) {
            (Some(c), Some(s)) => format!("{c} / {s}"),
            (Some(c), None) => c.clone(),
            (None, Some(s)) => s.clone(),
            (None, None) => self.sku.clone(),
        }
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
