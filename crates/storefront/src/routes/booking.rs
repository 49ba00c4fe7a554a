//! Standalone booking dialog.
//!
//! `GET /booking` renders the same dialog as `/?book=` without the page
//! around it, for embedding or linking from elsewhere.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use muva_core::BookingCoordinator;
use serde::Deserialize;
use tracing::instrument;

use super::views::BookingView;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::state::AppState;

/// Query parameters for the booking page.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookingQuery {
    /// Product to book a fitting for; absent or unknown means generic.
    pub product: Option<String>,
}

/// Booking dialog template.
#[derive(Template, WebTemplate)]
#[template(path = "booking.html")]
pub struct BookingTemplate {
    pub booking: BookingView,
}

/// Display the booking dialog.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<BookingQuery>,
) -> BookingTemplate {
    let snapshot = state.catalog().snapshot();
    let product = query.product.as_deref().map(str::trim).and_then(|id| {
        snapshot
            .as_ref()
            .and_then(|loaded| loaded.catalog.get(id).cloned())
    });

    let mut coordinator = BookingCoordinator::new();
    match product {
        Some(product) => {
            add_breadcrumb(
                "booking",
                "Opened booking page",
                Some(&[("product_id", product.id.as_str())]),
            );
            coordinator.open_for(product);
        }
        None => coordinator.open_generic(),
    }

    let settings = snapshot
        .map(|loaded| loaded.settings.clone())
        .unwrap_or_default();
    let booking = BookingView::open(coordinator.product(), &settings, "/#catalog".to_string());

    BookingTemplate { booking }
}
