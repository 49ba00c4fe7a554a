//! The filter engine and catalog facets.
//!
//! Filtering is a pure function of the catalog and the current criteria.
//! Catalogs hold a few hundred products at most, so every request runs a
//! full linear scan; there is no incremental state between calls.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};

/// The three independent filter inputs. Empty strings are inactive; a
/// query of only whitespace counts as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the product name, ignoring surrounding
    /// whitespace.
    #[serde(rename = "q")]
    pub query: String,
    /// Exact size label that must be in stock.
    pub size: String,
    /// Exact, case-sensitive color.
    pub color: String,
}

impl FilterCriteria {
    #[must_use]
    pub fn new(query: impl Into<String>, size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            size: size.into(),
            color: color.into(),
        }
    }

    /// True when no criterion is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.size.is_empty() && self.color.is_empty()
    }

    /// Whether `product` satisfies every active criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let query = self.query.trim();
        let matches_query =
            query.is_empty() || product.name.to_lowercase().contains(&query.to_lowercase());
        let matches_size = self.size.is_empty() || product.has_available_size(&self.size);
        let matches_color = self.color.is_empty() || product.has_color(&self.color);
        matches_query && matches_size && matches_color
    }

    /// Filter a product slice, preserving order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

impl Catalog {
    /// The visible subset of the catalog for `criteria`, in catalog order.
    #[must_use]
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&Product> {
        criteria.apply(self.products())
    }
}

/// Distinct size labels and colors across a whole catalog.
///
/// Values keep the order of their first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
}

impl Facets {
    /// Derive facets from the unfiltered product list.
    ///
    /// Out-of-stock sizes are included; the facet lists what exists, not
    /// what is available.
    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        let sizes: IndexSet<&str> = products
            .iter()
            .flat_map(|p| p.sizes.iter().map(|s| s.label.as_str()))
            .collect();
        let colors: IndexSet<&str> = products
            .iter()
            .flat_map(|p| p.colors.iter().map(String::as_str))
            .collect();

        Self {
            sizes: sizes.into_iter().map(str::to_owned).collect(),
            colors: colors.into_iter().map(str::to_owned).collect(),
        }
    }
}
