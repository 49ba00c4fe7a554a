//! Catalog page route handler.
//!
//! The single page carries the hero, the filter bar, the product grid, the
//! policies, the contact form and, when `?book` is present, the booking
//! dialog.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use muva_core::{BookingCoordinator, BookingState, ContactSubmitter, FilterCriteria, Settings};
use serde::Deserialize;
use tracing::instrument;

use super::views::{BookingView, ContactView, FacetOption, ProductView, catalog_href};
use crate::error::add_breadcrumb;
use crate::filters;
use crate::state::AppState;

/// Query parameters accepted by the catalog page.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogQuery {
    pub q: String,
    pub size: String,
    pub color: String,
    /// Present (even empty) to open the booking dialog.
    pub book: Option<String>,
}

impl CatalogQuery {
    #[must_use]
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(self.q.as_str(), self.size.as_str(), self.color.as_str())
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// True until the feeds have been loaded.
    pub loading: bool,
    /// Fallback advisory when the catalog feed failed.
    pub notice: Option<String>,
    pub query: String,
    pub size_options: Vec<FacetOption>,
    pub color_options: Vec<FacetOption>,
    pub products: Vec<ProductView>,
    /// Opens the generic booking dialog, keeping the filters.
    pub book_now_href: String,
    pub booking: Option<BookingView>,
    pub contact: ContactView,
}

/// Render the catalog page for `criteria` with the given dialog and form state.
pub(crate) fn catalog_page(
    state: &AppState,
    criteria: &FilterCriteria,
    booking: &BookingState,
    contact: ContactView,
) -> HomeTemplate {
    let snapshot = state.catalog().snapshot();
    let close_href = catalog_href(criteria, None);

    let Some(loaded) = snapshot else {
        return HomeTemplate {
            loading: true,
            notice: None,
            query: criteria.query.clone(),
            size_options: Vec::new(),
            color_options: Vec::new(),
            products: Vec::new(),
            book_now_href: catalog_href(criteria, Some("")),
            booking: BookingView::new(booking, &Settings::default(), close_href),
            contact,
        };
    };

    let facets = loaded.catalog.facets();
    let products = loaded
        .catalog
        .filter(criteria)
        .into_iter()
        .map(|p| ProductView::new(p, criteria))
        .collect();

    HomeTemplate {
        loading: false,
        notice: loaded.notice.clone(),
        query: criteria.query.clone(),
        size_options: FacetOption::list(&facets.sizes, &criteria.size),
        color_options: FacetOption::list(&facets.colors, &criteria.color),
        products,
        book_now_href: catalog_href(criteria, Some("")),
        booking: BookingView::new(booking, &loaded.settings, close_href),
        contact,
    }
}

/// Display the catalog page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>, Query(query): Query<CatalogQuery>) -> HomeTemplate {
    let criteria = query.criteria();
    let snapshot = state.catalog().snapshot();

    let mut booking = BookingCoordinator::new();
    if let Some(id) = query.book.as_deref().map(str::trim) {
        let product = snapshot.as_ref().and_then(|loaded| loaded.catalog.get(id));
        match product {
            Some(product) => {
                add_breadcrumb("booking", "Opened booking dialog", Some(&[("product_id", id)]));
                booking.open_for(product.clone());
            }
            None => {
                if !id.is_empty() {
                    tracing::debug!(product_id = %id, "Unknown product, opening generic booking");
                }
                add_breadcrumb("booking", "Opened booking dialog", None);
                booking.open_generic();
            }
        }
    }

    let form_id = snapshot
        .as_ref()
        .map(|loaded| loaded.settings.formspree_id.as_str())
        .unwrap_or_default();
    let contact = ContactView::new(&ContactSubmitter::new(form_id), None);

    catalog_page(&state, &criteria, booking.state(), contact)
}
