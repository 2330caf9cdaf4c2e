use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Axis name carrying a product's base price.
pub const SIZE_AXIS: &str = "size";

/// Identifier wrapper for catalog products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for add-ons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AddonId(pub String);

impl fmt::Display for AddonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One selectable option on a variant axis.
///
/// Prices are carried in the smallest currency unit. For the size axis the
/// price is the line's base price; for every other axis it is a delta added
/// on top of the chosen size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedOption {
    pub id: String,
    pub name: String,
    pub price: u64,
    #[serde(default)]
    pub is_default: bool,
}

impl PricedOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            is_default: false,
        }
    }

    pub fn default_option(id: impl Into<String>, name: impl Into<String>, price: u64) -> Self {
        Self {
            is_default: true,
            ..Self::new(id, name, price)
        }
    }
}

/// Named dimension of choice on a product beyond size (e.g. crust).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantAxis {
    pub axis: String,
    pub options: Vec<PricedOption>,
}

impl VariantAxis {
    pub fn option(&self, option_id: &str) -> Option<&PricedOption> {
        self.options.iter().find(|option| option.id == option_id)
    }
}

/// A sellable catalog entry.
///
/// Items sold at a single price are normalized into a one-entry size list
/// named `regular`, so the pricing engine never special-cases a missing
/// size axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub available: bool,
    pub sizes: Vec<PricedOption>,
    #[serde(default)]
    pub axes: Vec<VariantAxis>,
}

impl Product {
    /// A product sold at one price, represented as a single `regular` size.
    pub fn flat_priced(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: u64,
    ) -> Self {
        Self {
            id: ProductId(id.into()),
            name: name.into(),
            category: category.into(),
            subcategory: None,
            available: true,
            sizes: vec![PricedOption::default_option("regular", "Regular", price)],
            axes: Vec::new(),
        }
    }

    pub fn size(&self, size_id: &str) -> Option<&PricedOption> {
        self.sizes.iter().find(|size| size.id == size_id)
    }

    /// The marked default size, falling back to the first entry.
    pub fn default_size(&self) -> Option<&PricedOption> {
        self.sizes
            .iter()
            .find(|size| size.is_default)
            .or_else(|| self.sizes.first())
    }

    pub fn axis(&self, axis: &str) -> Option<&VariantAxis> {
        self.axes.iter().find(|candidate| candidate.axis == axis)
    }
}

/// An optional, additively priced extra attachable to eligible categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addon {
    pub id: AddonId,
    pub name: String,
    pub category: String,
    pub applicable_categories: BTreeSet<String>,
    pub available: bool,
    pub sizes: Vec<PricedOption>,
}

impl Addon {
    pub fn flat_priced(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: u64,
        applicable: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            id: AddonId(id.into()),
            name: name.into(),
            category: category.into(),
            applicable_categories: applicable.into_iter().collect(),
            available: true,
            sizes: vec![PricedOption::default_option("regular", "Regular", price)],
        }
    }

    /// Price charged when the add-on is attached without an explicit size.
    pub fn default_price(&self) -> u64 {
        self.sizes
            .iter()
            .find(|size| size.is_default)
            .or_else(|| self.sizes.first())
            .map(|size| size.price)
            .unwrap_or(0)
    }

    pub fn applies_to(&self, category: &str) -> bool {
        self.applicable_categories.contains(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_priced_product_normalizes_to_regular_size() {
        let product = Product::flat_priced("garlic-bread", "Garlic Bread", "sides", 1500);
        assert_eq!(product.sizes.len(), 1);
        let size = product.default_size().expect("has a size");
        assert_eq!(size.id, "regular");
        assert_eq!(size.price, 1500);
        assert!(size.is_default);
    }

    #[test]
    fn default_size_falls_back_to_first_entry() {
        let product = Product {
            id: ProductId("margherita".to_string()),
            name: "Margherita".to_string(),
            category: "pizza".to_string(),
            subcategory: None,
            available: true,
            sizes: vec![
                PricedOption::new("small", "Small", 3000),
                PricedOption::new("medium", "Medium", 4000),
            ],
            axes: Vec::new(),
        };

        assert_eq!(product.default_size().expect("size").id, "small");
    }

    #[test]
    fn addon_default_price_prefers_marked_default() {
        let addon = Addon {
            id: AddonId("mushroom".to_string()),
            name: "Mushroom".to_string(),
            category: "topping".to_string(),
            applicable_categories: ["pizza".to_string()].into_iter().collect(),
            available: true,
            sizes: vec![
                PricedOption::new("light", "Light", 800),
                PricedOption::default_option("regular", "Regular", 1500),
            ],
        };

        assert_eq!(addon.default_price(), 1500);
        assert!(addon.applies_to("pizza"));
        assert!(!addon.applies_to("drinks"));
    }
}
