use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{AddonId, ProductId};

pub use crate::catalog::SIZE_AXIS;

/// Variant choice as submitted by storefront clients.
///
/// Older storefront builds sent a bare option id string, which always meant
/// a size choice; current builds send an explicit axis/option pair. Both
/// shapes are accepted at the boundary and collapse into
/// [`CanonicalSelection`] before any pricing code runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariantChoice {
    Selection {
        axis: String,
        #[serde(rename = "optionId")]
        option_id: String,
    },
    Legacy(String),
}

impl VariantChoice {
    fn into_canonical(self) -> (String, String) {
        match self {
            VariantChoice::Selection { axis, option_id } => {
                (axis.trim().to_ascii_lowercase(), option_id)
            }
            VariantChoice::Legacy(option_id) => (SIZE_AXIS.to_string(), option_id),
        }
    }
}

/// Wire-shape customization payload for one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    #[serde(default)]
    pub variants: Vec<VariantChoice>,
    #[serde(default)]
    pub addons: Vec<AddonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SelectionSet {
    /// Resolve the loose wire shape into the single internal representation.
    ///
    /// Duplicate add-on ids collapse to one selection; when the same axis is
    /// chosen twice the later choice wins. Notes pass through untouched.
    pub fn canonicalize(self) -> CanonicalSelection {
        let mut variants = BTreeMap::new();
        for choice in self.variants {
            let (axis, option_id) = choice.into_canonical();
            variants.insert(axis, option_id);
        }

        CanonicalSelection {
            variants,
            addons: self.addons.into_iter().collect(),
            notes: self.notes,
        }
    }
}

/// Canonical selection the pricing engine operates on. Never constructed
/// anywhere but [`SelectionSet::canonicalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalSelection {
    /// Axis name to chosen option id.
    pub variants: BTreeMap<String, String>,
    pub addons: BTreeSet<AddonId>,
    pub notes: Option<String>,
}

impl CanonicalSelection {
    pub fn size(&self) -> Option<&str> {
        self.variants.get(SIZE_AXIS).map(String::as_str)
    }
}

/// One side of a half-and-half line as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfChoice {
    #[serde(rename = "productId")]
    pub product_id: ProductId,
    #[serde(default)]
    pub selection: SelectionSet,
}

impl HalfChoice {
    pub fn canonicalize(self) -> CanonicalHalf {
        CanonicalHalf {
            product_id: self.product_id,
            selection: self.selection.canonicalize(),
        }
    }
}

/// Canonical form of a half-and-half side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalHalf {
    pub product_id: ProductId,
    pub selection: CanonicalSelection,
}
