//! Catalog records the pricing engine resolves against.
//!
//! The catalog is read-only from the engine's point of view: products and
//! add-ons are loaded once (usually via [`import`]) and queried per request.

pub mod domain;
pub mod import;
pub mod store;

pub use domain::{Addon, AddonId, PricedOption, Product, ProductId, VariantAxis, SIZE_AXIS};
pub use import::{import_menu, import_menu_str, MenuImportError};
pub use store::{CatalogError, CatalogSnapshot, CatalogStore, InMemoryCatalog};
