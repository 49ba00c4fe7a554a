//! Integration tests for the catalog and settings feed loader.
//!
//! The feeds are served by an in-process mock; each test checks one way the
//! loader can succeed or degrade.

use std::time::Duration;

use axum::http::StatusCode;
use muva_integration_tests::{Canned, MockServer, feeds, sample_catalog, storefront_config};
use muva_storefront::catalog::{CatalogLoader, CatalogStore, FALLBACK_NOTICE, LoadedCatalog};
use muva_storefront::config::FeedConfig;
use muva_storefront::state::AppState;
use serde_json::json;

fn loader_for(server: &MockServer) -> CatalogLoader {
    let feeds = FeedConfig::rooted_at(&server.url).unwrap();
    CatalogLoader::new(reqwest::Client::new(), &feeds)
}

fn settings_json() -> Canned {
    Canned::json(&json!({
        "calendlyUrl": "https://calendly.com/muva/30min",
        "formspreeId": "xyzabc"
    }))
}

// =============================================================================
// Successful Loads
// =============================================================================

#[tokio::test]
async fn test_loads_catalog_and_settings() {
    let server = feeds(Canned::json(&sample_catalog()), settings_json()).await;

    let loaded = loader_for(&server).load().await;

    assert_eq!(loaded.catalog.len(), 3);
    assert!(loaded.notice.is_none());
    assert_eq!(
        loaded.settings.booking_url(),
        Some("https://calendly.com/muva/30min")
    );
    assert_eq!(loaded.settings.form_id(), Some("xyzabc"));
}

#[tokio::test]
async fn test_facets_come_from_whole_catalog() {
    let server = feeds(Canned::json(&sample_catalog()), settings_json()).await;

    let loaded = loader_for(&server).load().await;

    assert_eq!(loaded.catalog.facets().sizes, vec!["S", "M", "L"]);
    assert_eq!(
        loaded.catalog.facets().colors,
        vec!["Emerald", "Black", "Lilac", "Blush"]
    );
}

#[tokio::test]
async fn test_catalog_request_bypasses_cache() {
    let server = feeds(Canned::json(&sample_catalog()), settings_json()).await;

    loader_for(&server).load().await;

    let catalog = server.requests_to("/catalog.json");
    assert_eq!(catalog.len(), 1);
    assert_eq!(
        catalog[0].headers.get("cache-control").unwrap(),
        "no-cache"
    );

    let settings = server.requests_to("/settings.json");
    assert_eq!(settings.len(), 1);
    let query = settings[0].query.clone().unwrap_or_default();
    let millis = query.strip_prefix("v=").unwrap();
    assert!(millis.parse::<u128>().unwrap() > 0);
}

// =============================================================================
// Catalog Degradation
// =============================================================================

#[tokio::test]
async fn test_catalog_not_a_list_falls_back() {
    let server = feeds(Canned::json(&json!({"products": []})), settings_json()).await;

    let loaded = loader_for(&server).load().await;

    assert!(loaded.catalog.is_empty());
    assert_eq!(loaded.notice.as_deref(), Some(FALLBACK_NOTICE));
    // Settings are independent of the catalog
    assert_eq!(loaded.settings.form_id(), Some("xyzabc"));
}

#[tokio::test]
async fn test_catalog_server_error_falls_back() {
    let server = feeds(
        Canned::text(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
        settings_json(),
    )
    .await;

    let loaded = loader_for(&server).load().await;

    assert!(loaded.catalog.is_empty());
    assert_eq!(loaded.notice.as_deref(), Some(FALLBACK_NOTICE));
}

#[tokio::test]
async fn test_catalog_invalid_json_falls_back() {
    let server = feeds(Canned::text(StatusCode::OK, "<html>"), settings_json()).await;

    let loaded = loader_for(&server).load().await;

    assert!(loaded.catalog.is_empty());
    assert_eq!(loaded.notice.as_deref(), Some(FALLBACK_NOTICE));
}

#[tokio::test]
async fn test_unreachable_feeds_fall_back() {
    // Bind and drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = url::Url::parse(&format!("http://{addr}/")).unwrap();
    let loader = CatalogLoader::new(
        reqwest::Client::new(),
        &FeedConfig::rooted_at(&base).unwrap(),
    );

    let loaded = loader.load().await;

    assert!(loaded.catalog.is_empty());
    assert_eq!(loaded.notice.as_deref(), Some(FALLBACK_NOTICE));
    assert!(loaded.settings.booking_url().is_none());
}

// =============================================================================
// Settings Degradation
// =============================================================================

#[tokio::test]
async fn test_empty_settings_disable_features() {
    let server = feeds(Canned::json(&sample_catalog()), Canned::json(&json!({}))).await;

    let loaded = loader_for(&server).load().await;

    assert_eq!(loaded.settings.calendly_url, "");
    assert_eq!(loaded.settings.formspree_id, "");
    assert_eq!(loaded.catalog.len(), 3);
    assert!(loaded.notice.is_none());
}

#[tokio::test]
async fn test_missing_settings_are_silent() {
    let server = MockServer::start([(
        axum::http::Method::GET,
        "/catalog.json",
        Canned::json(&sample_catalog()),
    )])
    .await;

    let loaded = loader_for(&server).load().await;

    assert_eq!(loaded.catalog.len(), 3);
    assert!(loaded.notice.is_none());
    assert!(loaded.settings.form_id().is_none());
}

// =============================================================================
// Store Lifecycle
// =============================================================================

#[tokio::test]
async fn test_store_installs_first_load_only() {
    let store = CatalogStore::new();
    assert!(store.is_loading());
    assert!(store.snapshot().is_none());

    let first = LoadedCatalog {
        notice: Some("first".to_string()),
        ..LoadedCatalog::default()
    };
    assert!(store.install(first));
    assert!(!store.is_loading());

    assert!(!store.install(LoadedCatalog::default()));
    assert_eq!(store.snapshot().unwrap().notice.as_deref(), Some("first"));
}

#[tokio::test]
async fn test_background_load_finishes() {
    let server = feeds(Canned::json(&sample_catalog()), settings_json()).await;
    let formspree = MockServer::start([]).await;
    let state = AppState::new(storefront_config(&server.url, formspree.url("/f/"))).unwrap();

    assert!(state.catalog().is_loading());
    state.start_catalog_load();

    tokio::time::timeout(Duration::from_secs(5), async {
        while state.catalog().is_loading() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    assert_eq!(state.catalog().snapshot().unwrap().catalog.len(), 3);
}
