//! Catalog administration service.

use crate::actor::{Actor, Role};
use crate::catalog::media::{BlobStore, MediaAsset};
use crate::catalog::pricing::{validate_rule_set, PricingRule};
use crate::catalog::product::{Product, Variation};
use crate::db::CommerceStore;
use crate::error::CommerceError;
use crate::ids::{MediaId, ProductId, VariationId, VendorId};
use crate::money::Money;
use std::sync::Arc;

/// Fields for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub tags: Vec<String>,
    pub selling_price: Money,
    /// Owning vendor; None creates a platform-owned product (admin only).
    pub vendor_id: Option<VendorId>,
}

/// Fields for adding a variation to a product.
#[derive(Debug, Clone)]
pub struct NewVariation {
    pub sku: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub image_url: Option<String>,
    pub quantity: i64,
}

/// Admin/vendor product management.
///
/// Vendors may only touch their own products; admins may touch anything.
#[derive(Clone)]
pub struct CatalogService {
    store: CommerceStore,
    blobs: Arc<dyn BlobStore>,
}

impl CatalogService {
    pub fn new(store: CommerceStore, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    /// Create a new (unpublished) product.
    pub fn create_product(
        &self,
        actor: &Actor,
        new_product: NewProduct,
    ) -> Result<Product, CommerceError> {
        match actor.role {
            Role::Admin => {}
            Role::Vendor => {
                if new_product.vendor_id != actor.vendor_id {
                    return Err(CommerceError::Authorization(
                        "vendors may only create products for their own storefront".into(),
                    ));
                }
            }
            Role::Customer => {
                return Err(CommerceError::Authorization(
                    "customers may not manage the catalog".into(),
                ))
            }
        }
        if new_product.name.trim().is_empty() {
            return Err(CommerceError::Validation("product name is required".into()));
        }
        if new_product.selling_price.is_negative() {
            return Err(CommerceError::Validation(
                "selling price must not be negative".into(),
            ));
        }

        self.store.transaction(|db| {
            let mut product = Product::new(
                new_product.name.clone(),
                new_product.slug.clone(),
                new_product.selling_price,
                new_product.vendor_id.clone(),
            );
            for tag in &new_product.tags {
                product.add_tag(tag.clone());
            }
            db.products.insert(product.id.clone(), product.clone());
            tracing::debug!(product = %product.id, "created product");
            Ok(product)
        })
    }

    /// Publish or unpublish a product.
    pub fn set_published(
        &self,
        actor: &Actor,
        product_id: &ProductId,
        published: bool,
    ) -> Result<(), CommerceError> {
        self.store.transaction(|db| {
            let product = db
                .products
                .get_mut(product_id)
                .ok_or_else(|| CommerceError::ProductNotFound(product_id.to_string()))?;
            authorize_product(actor, product)?;
            product.published = published;
            product.touch();
            Ok(())
        })
    }

    /// Replace a product's pricing rules.
    ///
    /// The whole set is validated on the way in: malformed rules never
    /// reach a price read, and overlapping ranges are rejected.
    pub fn upsert_pricing_rules(
        &self,
        actor: &Actor,
        product_id: &ProductId,
        rules: Vec<PricingRule>,
    ) -> Result<(), CommerceError> {
        validate_rule_set(&rules)?;
        self.store.transaction(|db| {
            let product = db
                .products
                .get_mut(product_id)
                .ok_or_else(|| CommerceError::ProductNotFound(product_id.to_string()))?;
            authorize_product(actor, product)?;
            product.pricing_rules = rules;
            product.touch();
            Ok(())
        })
    }

    /// Add a variation to a product.
    pub fn add_variation(
        &self,
        actor: &Actor,
        product_id: &ProductId,
        new_variation: NewVariation,
    ) -> Result<Variation, CommerceError> {
        if new_variation.sku.trim().is_empty() {
            return Err(CommerceError::Validation("variation SKU is required".into()));
        }
        if new_variation.quantity < 0 {
            return Err(CommerceError::Validation(
                "variation stock must not be negative".into(),
            ));
        }
        self.store.transaction(|db| {
            let product = db
                .products
                .get_mut(product_id)
                .ok_or_else(|| CommerceError::ProductNotFound(product_id.to_string()))?;
            authorize_product(actor, product)?;
            product.touch();

            let mut variation =
                Variation::new(product_id.clone(), new_variation.sku.clone(), new_variation.quantity);
            variation.color = new_variation.color.clone();
            variation.size = new_variation.size.clone();
            variation.image_url = new_variation.image_url.clone();
            db.variations.insert(variation.id.clone(), variation.clone());
            Ok(variation)
        })
    }

    /// Add stock to a variation.
    ///
    /// The checkout transaction remains the only path that lowers stock.
    pub fn restock(
        &self,
        actor: &Actor,
        variation_id: &VariationId,
        quantity: i64,
    ) -> Result<i64, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        self.store.transaction(|db| {
            let variation = db
                .variations
                .get(variation_id)
                .ok_or_else(|| CommerceError::VariationNotFound(variation_id.to_string()))?;
            let product_id = variation.product_id.clone();
            let product = db.product(&product_id)?;
            authorize_product(actor, product)?;

            let variation = db
                .variations
                .get_mut(variation_id)
                .ok_or_else(|| CommerceError::VariationNotFound(variation_id.to_string()))?;
            variation.quantity = variation
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            tracing::debug!(variation = %variation_id, quantity, "restocked variation");
            Ok(variation.quantity)
        })
    }

    /// Upload and attach a featured image to a product.
    pub fn set_featured_image(
        &self,
        actor: &Actor,
        product_id: &ProductId,
        path: &str,
        bytes: &[u8],
        alt: Option<String>,
    ) -> Result<MediaAsset, CommerceError> {
        // Authorize before touching blob storage.
        self.store.read(|db| {
            let product = db.product(product_id)?;
            authorize_product(actor, product)
        })?;

        let url = self.blobs.put(path, bytes)?;
        let asset = MediaAsset {
            id: MediaId::generate(),
            path: path.to_string(),
            url,
            alt,
        };

        self.store.transaction(|db| {
            let product = db
                .products
                .get_mut(product_id)
                .ok_or_else(|| CommerceError::ProductNotFound(product_id.to_string()))?;
            if let Some(old) = product.featured_image.take() {
                // Best-effort cleanup of the replaced asset.
                if let Err(e) = self.blobs.delete(&old.path) {
                    tracing::warn!(path = %old.path, error = %e, "failed to delete replaced image");
                }
            }
            product.featured_image = Some(asset.clone());
            product.touch();
            Ok(asset)
        })
    }

    /// Published products visible on a storefront.
    ///
    /// `vendor_id = None` returns the shared storefront (platform-owned
    /// products); a vendor id returns that vendor's white-labeled
    /// storefront.
    pub fn list_published(&self, vendor_id: Option<&VendorId>) -> Vec<Product> {
        self.store.read(|db| {
            let mut products: Vec<Product> = db
                .products
                .values()
                .filter(|p| p.published && p.vendor_id.as_ref() == vendor_id)
                .cloned()
                .collect();
            products.sort_by(|a, b| a.name.cmp(&b.name));
            products
        })
    }
}

fn authorize_product(actor: &Actor, product: &Product) -> Result<(), CommerceError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Vendor => match (&actor.vendor_id, &product.vendor_id) {
            (Some(mine), Some(owner)) if mine == owner => Ok(()),
            _ => Err(CommerceError::Authorization(
                "product belongs to another storefront".into(),
            )),
        },
        Role::Customer => Err(CommerceError::Authorization(
            "customers may not manage the catalog".into(),
        )),
    }
}
