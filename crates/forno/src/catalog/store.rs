use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::domain::{Addon, AddonId, Product, ProductId};

/// Immutable view of the catalog handed to storefront callers.
///
/// Filtering by category is a pass-through query; it never affects pricing.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub addons: Vec<Addon>,
}

/// Error enumeration for catalog access failures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read path into the catalog. The pricing engine only ever looks records
/// up by id or takes a snapshot; writes happen out of band.
pub trait CatalogStore: Send + Sync {
    fn product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError>;
    fn addon(&self, id: &AddonId) -> Result<Option<Addon>, CatalogError>;
    fn snapshot(&self, category: Option<&str>) -> Result<CatalogSnapshot, CatalogError>;
}

#[derive(Default)]
struct CatalogInner {
    products: HashMap<ProductId, Product>,
    addons: HashMap<AddonId, Addon>,
}

/// Catalog held in process memory, seeded at startup.
#[derive(Default, Clone)]
pub struct InMemoryCatalog {
    inner: Arc<Mutex<CatalogInner>>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>, addons: Vec<Addon>) -> Self {
        let catalog = Self::default();
        for product in products {
            catalog.insert_product(product);
        }
        for addon in addons {
            catalog.insert_addon(addon);
        }
        catalog
    }

    pub fn insert_product(&self, product: Product) {
        let mut guard = self.inner.lock().expect("catalog mutex poisoned");
        guard.products.insert(product.id.clone(), product);
    }

    pub fn insert_addon(&self, addon: Addon) {
        let mut guard = self.inner.lock().expect("catalog mutex poisoned");
        guard.addons.insert(addon.id.clone(), addon);
    }

    pub fn len(&self) -> (usize, usize) {
        let guard = self.inner.lock().expect("catalog mutex poisoned");
        (guard.products.len(), guard.addons.len())
    }
}

impl CatalogStore for InMemoryCatalog {
    fn product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        let guard = self.inner.lock().expect("catalog mutex poisoned");
        Ok(guard.products.get(id).cloned())
    }

    fn addon(&self, id: &AddonId) -> Result<Option<Addon>, CatalogError> {
        let guard = self.inner.lock().expect("catalog mutex poisoned");
        Ok(guard.addons.get(id).cloned())
    }

    fn snapshot(&self, category: Option<&str>) -> Result<CatalogSnapshot, CatalogError> {
        let guard = self.inner.lock().expect("catalog mutex poisoned");

        let mut products: Vec<Product> = guard
            .products
            .values()
            .filter(|product| category.map_or(true, |wanted| product.category == wanted))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.id.cmp(&b.id));

        let mut addons: Vec<Addon> = guard
            .addons
            .values()
            .filter(|addon| category.map_or(true, |wanted| addon.applies_to(wanted)))
            .cloned()
            .collect();
        addons.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(CatalogSnapshot { products, addons })
    }
}
