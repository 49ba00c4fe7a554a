//! Products, sizes and catalog feed normalization.
//!
//! The catalog feed is an operator-edited JSON array. Parsing never throws
//! on a bad entry: the entry is normalized where possible, skipped where
//! not, and every correction is reported as a [`CatalogIssue`].

use std::collections::HashSet;

use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::filter::Facets;
use crate::types::{Price, ProductId};

/// The catalog document was not a JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog must be a JSON array, found {0}")]
    NotAList(&'static str),
}

/// A correction applied while normalizing a catalog feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogIssue {
    /// Entry at `index` could not be turned into a product.
    SkippedEntry { index: usize, reason: String },
    /// A second product reused an id; the later one was dropped.
    DuplicateProductId { index: usize, id: ProductId },
    /// A size entry at `position` had a missing or empty label; it was dropped.
    InvalidSizeLabel { id: ProductId, position: usize },
    /// A size label appeared twice in one product; the later entry was dropped.
    DuplicateSizeLabel { id: ProductId, label: String },
    /// A size had a negative or non-integer quantity; it was set to zero.
    InvalidQuantity { id: ProductId, label: String },
}

impl std::fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SkippedEntry { index, reason } => {
                write!(f, "entry {index} skipped: {reason}")
            }
            Self::DuplicateProductId { index, id } => {
                write!(f, "entry {index} skipped: duplicate product id '{id}'")
            }
            Self::InvalidSizeLabel { id, position } => {
                write!(f, "product '{id}': size {position} has no label, ignored")
            }
            Self::DuplicateSizeLabel { id, label } => {
                write!(f, "product '{id}': duplicate size '{label}' ignored")
            }
            Self::InvalidQuantity { id, label } => {
                write!(f, "product '{id}': size '{label}' quantity set to 0")
            }
        }
    }
}

/// Stock on hand for one size of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeStock {
    pub label: String,
    pub qty: u32,
}

impl SizeStock {
    #[must_use]
    pub fn new(label: impl Into<String>, qty: u32) -> Self {
        Self {
            label: label.into(),
            qty,
        }
    }

    /// Whether at least one unit is available in this size.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.qty > 0
    }
}

/// A product as shown in the catalog.
///
/// Size labels are unique within a product and colors are deduplicated;
/// both keep feed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: Option<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<SizeStock>,
}

impl Product {
    /// In stock iff any size has quantity above zero.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.sizes.iter().any(SizeStock::is_available)
    }

    /// Sizes with stock, in feed order.
    pub fn available_sizes(&self) -> impl Iterator<Item = &SizeStock> {
        self.sizes.iter().filter(|s| s.is_available())
    }

    /// Whether the product can be bought in `label`.
    ///
    /// An out-of-stock size does not count even though its label exists.
    #[must_use]
    pub fn has_available_size(&self, label: &str) -> bool {
        self.sizes
            .iter()
            .any(|s| s.label == label && s.is_available())
    }

    /// Exact, case-sensitive color membership.
    #[must_use]
    pub fn has_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }

    /// Build a product from one feed entry, recording corrections in `issues`.
    fn from_entry(index: usize, entry: &Value, issues: &mut Vec<CatalogIssue>) -> Option<Self> {
        let skip = |issues: &mut Vec<CatalogIssue>, reason: &str| {
            issues.push(CatalogIssue::SkippedEntry {
                index,
                reason: reason.to_owned(),
            });
        };

        let Some(obj) = entry.as_object() else {
            skip(issues, "not an object");
            return None;
        };
        let Some(id) = obj.get("id").and_then(ProductId::from_json) else {
            skip(issues, "missing or invalid id");
            return None;
        };
        let Some(name) = obj
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty())
        else {
            skip(issues, "missing name");
            return None;
        };
        let Some(price) = obj.get("price").and_then(Price::from_json) else {
            skip(issues, "missing, negative or non-numeric price");
            return None;
        };

        let image = obj
            .get("image")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        let colors: IndexSet<String> = obj
            .get("colors")
            .and_then(Value::as_array)
            .map(|colors| {
                colors
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|c| !c.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let mut sizes: Vec<SizeStock> = Vec::new();
        for (position, raw) in obj
            .get("sizes")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .enumerate()
        {
            let Some(label) = raw
                .get("label")
                .and_then(Value::as_str)
                .filter(|l| !l.is_empty())
            else {
                issues.push(CatalogIssue::InvalidSizeLabel {
                    id: id.clone(),
                    position,
                });
                continue;
            };
            if sizes.iter().any(|s| s.label == label) {
                issues.push(CatalogIssue::DuplicateSizeLabel {
                    id: id.clone(),
                    label: label.to_owned(),
                });
                continue;
            }
            let qty = match raw.get("qty") {
                None | Some(Value::Null) => 0,
                Some(value) => value
                    .as_u64()
                    .and_then(|q| u32::try_from(q).ok())
                    .unwrap_or_else(|| {
                        issues.push(CatalogIssue::InvalidQuantity {
                            id: id.clone(),
                            label: label.to_owned(),
                        });
                        0
                    }),
            };
            sizes.push(SizeStock::new(label, qty));
        }

        Some(Self {
            id,
            name: name.to_owned(),
            price,
            image,
            colors: colors.into_iter().collect(),
            sizes,
        })
    }
}

/// An immutable, normalized catalog with its facets.
///
/// Facets are derived once at construction; a new feed means a new
/// `Catalog`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    products: Vec<Product>,
    facets: Facets,
}

/// Result of normalizing a catalog feed.
#[derive(Debug, Clone, Default)]
pub struct ParsedCatalog {
    pub catalog: Catalog,
    pub issues: Vec<CatalogIssue>,
}

impl Catalog {
    /// Build a catalog from already-valid products.
    ///
    /// Products with an id already seen are dropped.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let mut seen = HashSet::new();
        let products: Vec<Product> = products
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();
        let facets = Facets::from_products(&products);
        Self { products, facets }
    }

    /// The empty catalog used when the feed cannot be loaded.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize a parsed JSON feed.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotAList`] if the document is not an array.
    /// Bad entries inside the array are never an error.
    pub fn from_json(document: &Value) -> Result<ParsedCatalog, CatalogError> {
        let Value::Array(entries) = document else {
            return Err(CatalogError::NotAList(json_kind(document)));
        };

        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        let mut products = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let Some(product) = Product::from_entry(index, entry, &mut issues) else {
                continue;
            };
            if !seen.insert(product.id.clone()) {
                issues.push(CatalogIssue::DuplicateProductId {
                    index,
                    id: product.id,
                });
                continue;
            }
            products.push(product);
        }

        Ok(ParsedCatalog {
            catalog: Self::new(products),
            issues,
        })
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn facets(&self) -> &Facets {
        &self.facets
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id.as_str() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn aria_feed() -> Value {
        json!([{
            "id": "1",
            "name": "Aria Gown",
            "price": 120,
            "image": "https://img.example/aria.jpg",
            "colors": ["red"],
            "sizes": [{"label": "S", "qty": 2}, {"label": "M", "qty": 0}]
        }])
    }

    #[test]
    fn test_parses_well_formed_feed() {
        let parsed = Catalog::from_json(&aria_feed()).unwrap();
        assert!(parsed.issues.is_empty());
        assert_eq!(parsed.catalog.len(), 1);

        let aria = parsed.catalog.get("1").unwrap();
        assert_eq!(aria.name, "Aria Gown");
        assert_eq!(aria.price.display(), "$120");
        assert_eq!(aria.colors, vec!["red".to_string()]);
        assert_eq!(
            aria.sizes,
            vec![SizeStock::new("S", 2), SizeStock::new("M", 0)]
        );
        assert!(aria.in_stock());
        assert!(aria.has_available_size("S"));
        assert!(!aria.has_available_size("M"));
    }

    #[test]
    fn test_non_list_is_an_error() {
        assert_eq!(
            Catalog::from_json(&json!({"products": []})).unwrap_err(),
            CatalogError::NotAList("an object")
        );
        assert!(Catalog::from_json(&json!(null)).is_err());
    }

    #[test]
    fn test_missing_sizes_and_colors_default_to_empty() {
        let parsed = Catalog::from_json(&json!([
            {"id": 3, "name": "Luz Midi", "price": "89.5", "sizes": null}
        ]))
        .unwrap();
        let luz = parsed.catalog.get("3").unwrap();
        assert!(luz.sizes.is_empty());
        assert!(luz.colors.is_empty());
        assert!(luz.image.is_none());
        assert!(!luz.in_stock());
        assert!(parsed.issues.is_empty());
    }

    #[test]
    fn test_bad_entries_are_skipped_with_issues() {
        let parsed = Catalog::from_json(&json!([
            "not a product",
            {"name": "No Id", "price": 10},
            {"id": "a", "price": 10},
            {"id": "b", "name": "Free?", "price": -5},
            {"id": "c", "name": "Kept", "price": 10}
        ]))
        .unwrap();
        assert_eq!(parsed.catalog.len(), 1);
        assert_eq!(parsed.issues.len(), 4);
        assert!(
            parsed
                .issues
                .iter()
                .all(|i| matches!(i, CatalogIssue::SkippedEntry { .. }))
        );
    }

    #[test]
    fn test_sizes_are_normalized() {
        let parsed = Catalog::from_json(&json!([{
            "id": "x",
            "name": "Sol Dress",
            "price": 75,
            "colors": ["gold", "gold", "ivory"],
            "sizes": [
                {"label": "S", "qty": -3},
                {"label": "S", "qty": 4},
                {"label": "L"},
                {"qty": 9},
                {"label": "", "qty": 2}
            ]
        }]))
        .unwrap();
        let sol = parsed.catalog.get("x").unwrap();
        assert_eq!(sol.colors, vec!["gold".to_string(), "ivory".to_string()]);
        assert_eq!(
            sol.sizes,
            vec![SizeStock::new("S", 0), SizeStock::new("L", 0)]
        );
        assert_eq!(
            parsed.issues,
            vec![
                CatalogIssue::InvalidQuantity {
                    id: ProductId::new("x"),
                    label: "S".into()
                },
                CatalogIssue::DuplicateSizeLabel {
                    id: ProductId::new("x"),
                    label: "S".into()
                },
                CatalogIssue::InvalidSizeLabel {
                    id: ProductId::new("x"),
                    position: 3
                },
                CatalogIssue::InvalidSizeLabel {
                    id: ProductId::new("x"),
                    position: 4
                },
            ]
        );
        assert!(!parsed.catalog.facets().sizes.contains(&String::new()));
        assert_eq!(
            parsed.issues[3].to_string(),
            "product 'x': size 3 has no label, ignored"
        );
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let parsed = Catalog::from_json(&json!([
            {"id": "1", "name": "First", "price": 1},
            {"id": 1, "name": "Second", "price": 2}
        ]))
        .unwrap();
        assert_eq!(parsed.catalog.len(), 1);
        assert_eq!(parsed.catalog.get("1").unwrap().name, "First");
        assert!(matches!(
            parsed.issues.as_slice(),
            [CatalogIssue::DuplicateProductId { index: 1, .. }]
        ));
    }

    #[test]
    fn test_facets_are_built_with_catalog() {
        let parsed = Catalog::from_json(&aria_feed()).unwrap();
        assert_eq!(parsed.catalog.facets().sizes, vec!["S", "M"]);
        assert_eq!(parsed.catalog.facets().colors, vec!["red"]);
    }
}
