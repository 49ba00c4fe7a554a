//! Integration tests for Muva.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p muva-integration-tests
//! ```
//!
//! No external services are needed: feeds and the form endpoint are served
//! by in-process axum mocks bound to `127.0.0.1:0`, and the storefront
//! router is driven with `tower::ServiceExt::oneshot`.
//!
//! # Test Categories
//!
//! - `catalog_loader` - Feed fetching and degradation
//! - `storefront_routes` - Pages, booking and the JSON API
//! - `contact_submission` - Contact form against a mock form endpoint

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::{Body, Bytes},
    extract::{Request, State},
    http::{HeaderMap, Method, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use muva_storefront::config::{FeedConfig, SentryConfig, StorefrontConfig};
use muva_storefront::state::AppState;
use url::Url;

/// A request seen by a mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    /// The body parsed as JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// A canned mock response.
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl Canned {
    /// 200 with a JSON body.
    #[must_use]
    pub fn json(value: &serde_json::Value) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "application/json",
            body: value.to_string(),
        }
    }

    /// `status` with a plain-text body.
    #[must_use]
    pub fn text(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.to_string(),
        }
    }
}

struct MockState {
    routes: HashMap<(Method, String), Canned>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// An in-process HTTP server answering canned responses by method and path.
///
/// Unknown routes answer 404. Every request is recorded.
#[derive(Clone)]
pub struct MockServer {
    pub url: Url,
    state: Arc<MockState>,
}

impl MockServer {
    /// Start a mock server with the given routes.
    pub async fn start(routes: impl IntoIterator<Item = (Method, &'static str, Canned)>) -> Self {
        let state = Arc::new(MockState {
            routes: routes
                .into_iter()
                .map(|(method, path, canned)| ((method, path.to_string()), canned))
                .collect(),
            requests: Mutex::new(Vec::new()),
        });

        let router = Router::new().fallback(respond).with_state(Arc::clone(&state));
        let url = spawn(router).await;
        Self { url, state }
    }

    /// Absolute URL for `path` on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        self.url.join(path).unwrap()
    }

    /// All requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests received for `path`.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

async fn respond(State(state): State<Arc<MockState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let path = parts.uri.path().to_string();

    state.requests.lock().unwrap().push(RecordedRequest {
        method: parts.method.clone(),
        path: path.clone(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers,
        body,
    });

    match state.routes.get(&(parts.method, path)) {
        Some(canned) => (
            canned.status,
            [(CONTENT_TYPE, canned.content_type)],
            canned.body.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}/")).unwrap()
}

/// Storefront configuration reading feeds from `feeds` and posting forms
/// to `formspree_endpoint`.
#[must_use]
pub fn storefront_config(feeds: &Url, formspree_endpoint: Url) -> StorefrontConfig {
    let mut feed_config = FeedConfig::rooted_at(feeds).unwrap();
    feed_config.formspree_endpoint = formspree_endpoint;

    let storefront_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront");
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        trust_proxy: false,
        public_dir: storefront_dir.join("public"),
        static_dir: storefront_dir.join("static"),
        feeds: feed_config,
        sentry: SentryConfig::default(),
    }
}

/// A storefront whose feeds are served by `feeds`, with the catalog loaded.
pub async fn loaded_storefront(feeds: &MockServer, formspree: &MockServer) -> AppState {
    let state = AppState::new(storefront_config(&feeds.url, formspree.url("/f/"))).unwrap();
    state.load_catalog().await;
    state
}

/// Mock feeds answering `catalog` and `settings`.
pub async fn feeds(catalog: Canned, settings: Canned) -> MockServer {
    MockServer::start([
        (Method::GET, "/catalog.json", catalog),
        (Method::GET, "/settings.json", settings),
    ])
    .await
}

/// The catalog used across the scenarios.
#[must_use]
pub fn sample_catalog() -> serde_json::Value {
    serde_json::json!([
        {
            "id": "1",
            "name": "Aria Gown",
            "price": 120,
            "colors": ["Emerald"],
            "sizes": [{"label": "S", "qty": 0}, {"label": "M", "qty": 2}]
        },
        {
            "id": "2",
            "name": "Luna Slip",
            "price": 95.5,
            "image": "https://img.example/luna.jpg",
            "colors": ["Black", "Lilac"],
            "sizes": [{"label": "S", "qty": 1}]
        },
        {
            "id": "3",
            "name": "Rosa Midi",
            "price": 140,
            "colors": ["Blush"],
            "sizes": [{"label": "L", "qty": 0}]
        }
    ])
}

/// Read a response body as a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
