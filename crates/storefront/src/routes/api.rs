//! JSON API over the loaded catalog.
//!
//! ```text
//! GET /api/products?q=&size=&color=  - Filtered products with facets
//! GET /api/products/{id}             - One product
//! ```

use axum::{
    Json,
    extract::{Path, Query, State},
};
use muva_core::{Facets, FilterCriteria, Product};
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Response for the product listing.
#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    /// Facets of the whole catalog, not of the filtered subset.
    pub facets: Facets,
    pub total: usize,
}

/// List products matching the filter criteria.
///
/// # Errors
///
/// Returns `CatalogLoading` until the feeds have been loaded.
#[instrument(skip(state))]
pub async fn products(
    State(state): State<AppState>,
    Query(criteria): Query<FilterCriteria>,
) -> Result<Json<ProductsResponse>> {
    let loaded = state.catalog().snapshot().ok_or(AppError::CatalogLoading)?;

    let products: Vec<Product> = loaded
        .catalog
        .filter(&criteria)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ProductsResponse {
        total: products.len(),
        products,
        facets: loaded.catalog.facets().clone(),
    }))
}

/// Get a single product by id.
///
/// # Errors
///
/// Returns `CatalogLoading` until the feeds have been loaded and `NotFound`
/// for an unknown id.
#[instrument(skip(state))]
pub async fn product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let loaded = state.catalog().snapshot().ok_or(AppError::CatalogLoading)?;

    loaded
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
