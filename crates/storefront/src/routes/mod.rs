//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog page (?q=&size=&color=&book=)
//! GET  /booking                - Booking dialog alone (?product=)
//! POST /contact                - Contact form (rate limited)
//!
//! # JSON API
//! GET  /api/products           - Filtered products with facets
//! GET  /api/products/{id}      - One product
//!
//! # Operations
//! GET  /health                 - Liveness
//! GET  /health/ready           - 503 until the catalog is loaded
//!
//! # Files
//! GET  /catalog.json           - Catalog feed (from the public dir)
//! GET  /settings.json          - Settings feed (from the public dir)
//! GET  /static/*               - Stylesheet and images
//! ```

pub mod api;
pub mod booking;
pub mod contact;
pub mod home;
pub mod views;

use axum::{
    Router,
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header::CACHE_CONTROL},
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::middleware::{contact_rate_limiter, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(api::products))
        .route("/products/{id}", get(api::product))
}

/// Create the contact router, rate limited per client IP.
///
/// With `trust_proxy` the client IP comes from proxy headers.
pub fn contact_routes(trust_proxy: bool) -> Router<AppState> {
    let router = Router::new().route("/contact", post(contact::submit));
    match contact_rate_limiter(trust_proxy) {
        Some(limiter) => router.layer(limiter),
        None => {
            tracing::warn!("Contact rate limiter unavailable, serving unlimited");
            router
        }
    }
}

/// Create all page routes for the storefront.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/booking", get(booking::show))
        .merge(contact_routes(state.config().trust_proxy))
        .nest("/api", api_routes())
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
}

/// Feed files and static assets served from disk.
fn file_routes(state: &AppState) -> Router<AppState> {
    let config = state.config();
    let feeds = Router::new()
        .route_service(
            "/catalog.json",
            ServeFile::new(config.public_dir.join("catalog.json")),
        )
        .route_service(
            "/settings.json",
            ServeFile::new(config.public_dir.join("settings.json")),
        )
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ));

    let assets = ServeDir::new(&config.static_dir);
    feeds.nest_service(
        "/static",
        tower::ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=3600"),
            ))
            .service(assets),
    )
}

/// Build the full application with middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes(&state))
        .merge(file_routes(&state))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable until the catalog feeds have settled.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.catalog().is_loading() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}
