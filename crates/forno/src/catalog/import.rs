//! Flat-file menu importer.
//!
//! Back-office exports describe the menu as one CSV row per priced option:
//! a product row per size or variant option, and an add-on row per add-on
//! size. Rows for the same `Id` are folded back into a single record, in
//! file order.

use std::collections::BTreeSet;
use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::domain::{Addon, AddonId, PricedOption, Product, ProductId, VariantAxis, SIZE_AXIS};

#[derive(Debug, thiserror::Error)]
pub enum MenuImportError {
    #[error("failed to read menu export: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unknown kind '{kind}' (expected 'product' or 'addon')")]
    UnknownKind { row: usize, kind: String },
    #[error("row {row}: missing required column '{column}'")]
    MissingColumn { row: usize, column: &'static str },
    #[error("product '{0}' has no size rows")]
    ProductWithoutSizes(String),
}

pub fn import_menu<R: Read>(reader: R) -> Result<(Vec<Product>, Vec<Addon>), MenuImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut products: Vec<Product> = Vec::new();
    let mut addons: Vec<Addon> = Vec::new();

    for (index, record) in csv_reader.deserialize::<MenuRow>().enumerate() {
        let row_no = index + 2; // header occupies row 1
        let row = record?;
        row.validate(row_no)?;

        match row.kind.to_ascii_lowercase().as_str() {
            "product" => fold_product_row(&mut products, row),
            "addon" => fold_addon_row(&mut addons, row),
            other => {
                return Err(MenuImportError::UnknownKind {
                    row: row_no,
                    kind: other.to_string(),
                })
            }
        }
    }

    for product in &products {
        if product.sizes.is_empty() {
            return Err(MenuImportError::ProductWithoutSizes(product.id.0.clone()));
        }
    }

    Ok((products, addons))
}

pub fn import_menu_str(menu: &str) -> Result<(Vec<Product>, Vec<Addon>), MenuImportError> {
    import_menu(menu.as_bytes())
}

fn fold_product_row(products: &mut Vec<Product>, row: MenuRow) {
    let option = row.priced_option();
    let axis = row.axis_name();

    if let Some(product) = products.iter_mut().find(|product| product.id.0 == row.id) {
        if axis == SIZE_AXIS {
            product.sizes.push(option);
        } else if let Some(existing) = product
            .axes
            .iter_mut()
            .find(|candidate| candidate.axis == axis)
        {
            existing.options.push(option);
        } else {
            product.axes.push(VariantAxis {
                axis,
                options: vec![option],
            });
        }
        return;
    }

    let mut product = Product {
        id: ProductId(row.id.clone()),
        name: row.name.clone(),
        category: row.category.clone(),
        subcategory: row.subcategory.clone(),
        available: row.available(),
        sizes: Vec::new(),
        axes: Vec::new(),
    };
    if axis == SIZE_AXIS {
        product.sizes.push(option);
    } else {
        product.axes.push(VariantAxis {
            axis,
            options: vec![option],
        });
    }
    products.push(product);
}

fn fold_addon_row(addons: &mut Vec<Addon>, row: MenuRow) {
    let option = row.priced_option();

    if let Some(addon) = addons.iter_mut().find(|addon| addon.id.0 == row.id) {
        addon.sizes.push(option);
        return;
    }

    addons.push(Addon {
        id: AddonId(row.id.clone()),
        name: row.name.clone(),
        category: row.category.clone(),
        applicable_categories: row.applicable_categories(),
        available: row.available(),
        sizes: vec![option],
    });
}

#[derive(Debug, Deserialize)]
struct MenuRow {
    #[serde(rename = "Kind")]
    kind: String,
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(
        rename = "Subcategory",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    subcategory: Option<String>,
    #[serde(rename = "Axis", default, deserialize_with = "empty_string_as_none")]
    axis: Option<String>,
    #[serde(rename = "Option")]
    option_id: String,
    #[serde(
        rename = "Option Name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    option_name: Option<String>,
    #[serde(rename = "Price")]
    price: u64,
    #[serde(rename = "Default", default, deserialize_with = "empty_string_as_none")]
    is_default: Option<String>,
    #[serde(
        rename = "Applies To",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    applies_to: Option<String>,
    #[serde(
        rename = "Available",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    available: Option<String>,
}

impl MenuRow {
    fn validate(&self, row: usize) -> Result<(), MenuImportError> {
        if self.id.is_empty() {
            return Err(MenuImportError::MissingColumn { row, column: "Id" });
        }
        if self.name.is_empty() {
            return Err(MenuImportError::MissingColumn { row, column: "Name" });
        }
        if self.category.is_empty() {
            return Err(MenuImportError::MissingColumn {
                row,
                column: "Category",
            });
        }
        if self.option_id.is_empty() {
            return Err(MenuImportError::MissingColumn {
                row,
                column: "Option",
            });
        }
        Ok(())
    }

    fn axis_name(&self) -> String {
        self.axis
            .as_deref()
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| SIZE_AXIS.to_string())
    }

    fn priced_option(&self) -> PricedOption {
        PricedOption {
            id: self.option_id.clone(),
            name: self
                .option_name
                .clone()
                .unwrap_or_else(|| self.option_id.clone()),
            price: self.price,
            is_default: truthy(self.is_default.as_deref()),
        }
    }

    fn applicable_categories(&self) -> BTreeSet<String> {
        self.applies_to
            .as_deref()
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn available(&self) -> bool {
        // Absent column means the item is on sale.
        self.available.as_deref().map_or(true, truthy_str)
    }
}

fn truthy(value: Option<&str>) -> bool {
    value.map_or(false, truthy_str)
}

fn truthy_str(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "1"
    )
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Kind,Id,Name,Category,Subcategory,Axis,Option,Option Name,Price,Default,Applies To,Available
product,margherita,Margherita,pizza,classic,size,small,Small,3000,,,true
product,margherita,Margherita,pizza,classic,size,medium,Medium,4000,true,,true
product,margherita,Margherita,pizza,classic,crust,stuffed,Stuffed Crust,1000,,,true
product,cola,Cola,drinks,,size,regular,Regular,800,true,,true
addon,mushroom,Mushroom,topping,,size,regular,Regular,1500,true,pizza,true
addon,ranch-dip,Ranch Dip,sauce,,size,regular,Regular,500,true,pizza;sides,true
";

    #[test]
    fn folds_rows_into_products_and_addons() {
        let (products, addons) = import_menu_str(SAMPLE).expect("menu imports");

        assert_eq!(products.len(), 2);
        assert_eq!(addons.len(), 2);

        let margherita = &products[0];
        assert_eq!(margherita.id.0, "margherita");
        assert_eq!(margherita.sizes.len(), 2);
        assert_eq!(margherita.default_size().expect("default").id, "medium");
        let crust = margherita.axis("crust").expect("crust axis");
        assert_eq!(crust.options.len(), 1);
        assert_eq!(crust.options[0].price, 1000);

        let ranch = &addons[1];
        assert!(ranch.applies_to("pizza"));
        assert!(ranch.applies_to("sides"));
        assert!(!ranch.applies_to("drinks"));
    }

    #[test]
    fn rejects_unknown_kind() {
        let menu = "\
Kind,Id,Name,Category,Subcategory,Axis,Option,Option Name,Price,Default,Applies To,Available
combo,meal-1,Meal One,combos,,size,regular,Regular,9000,,,true
";
        match import_menu_str(menu) {
            Err(MenuImportError::UnknownKind { row, kind }) => {
                assert_eq!(row, 2);
                assert_eq!(kind, "combo");
            }
            other => panic!("expected unknown kind error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_rows_missing_identifiers() {
        let menu = "\
Kind,Id,Name,Category,Subcategory,Axis,Option,Option Name,Price,Default,Applies To,Available
product,,Margherita,pizza,,size,small,Small,3000,,,true
";
        match import_menu_str(menu) {
            Err(MenuImportError::MissingColumn { column, .. }) => assert_eq!(column, "Id"),
            other => panic!("expected missing column error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_product_with_only_variant_rows() {
        let menu = "\
Kind,Id,Name,Category,Subcategory,Axis,Option,Option Name,Price,Default,Applies To,Available
product,margherita,Margherita,pizza,,crust,thin,Thin,0,,,true
";
        match import_menu_str(menu) {
            Err(MenuImportError::ProductWithoutSizes(id)) => assert_eq!(id, "margherita"),
            other => panic!("expected product-without-sizes error, got {other:?}"),
        }
    }

    #[test]
    fn availability_defaults_to_on_sale() {
        let menu = "\
Kind,Id,Name,Category,Subcategory,Axis,Option,Option Name,Price,Default,Applies To,Available
product,cola,Cola,drinks,,size,regular,Regular,800,true,,
product,fanta,Fanta,drinks,,size,regular,Regular,800,true,,false
";
        let (products, _) = import_menu_str(menu).expect("menu imports");
        assert!(products[0].available);
        assert!(!products[1].available);
    }
}
