//! Catalog feed check.
//!
//! Runs the storefront's normalizer over a file so operators can see what
//! visitors will get before uploading it.

use std::path::Path;

use muva_core::{Catalog, CatalogIssue};

use super::{FeedError, read_feed};

/// Summary of a parsed catalog file.
#[derive(Debug)]
pub struct CatalogReport {
    pub products: usize,
    pub in_stock: usize,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub issues: Vec<CatalogIssue>,
}

impl CatalogReport {
    /// Normalize `document` and summarize the result.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::Catalog` if the document is not a list.
    pub fn from_json(document: &serde_json::Value) -> Result<Self, FeedError> {
        let parsed = Catalog::from_json(document)?;
        let catalog = parsed.catalog;
        Ok(Self {
            products: catalog.len(),
            in_stock: catalog.products().iter().filter(|p| p.in_stock()).count(),
            sizes: catalog.facets().sizes.clone(),
            colors: catalog.facets().colors.clone(),
            issues: parsed.issues,
        })
    }
}

/// Check a catalog file.
///
/// # Errors
///
/// Returns an error if the file can't be read or parsed, is not a list, or
/// (with `strict`) if any issue was found.
pub async fn check(path: &Path, strict: bool) -> Result<(), FeedError> {
    tracing::info!("Checking catalog: {}", path.display());

    let document = read_feed(path).await?;
    let report = CatalogReport::from_json(&document)?;

    tracing::info!(
        "  Products: {} ({} in stock)",
        report.products,
        report.in_stock
    );
    tracing::info!("  Sizes: {}", report.sizes.join(", "));
    tracing::info!("  Colors: {}", report.colors.join(", "));

    if report.issues.is_empty() {
        tracing::info!("No issues found");
        return Ok(());
    }

    for issue in &report.issues {
        tracing::warn!("  {issue}");
    }
    if strict {
        return Err(FeedError::Strict(report.issues.len()));
    }
    Ok(())
}
