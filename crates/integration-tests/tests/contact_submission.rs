//! Integration tests for the contact form.
//!
//! `POST /contact` is driven through the full router; the form endpoint is
//! an in-process mock so every outbound submission can be inspected.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use muva_integration_tests::{
    Canned, MockServer, body_string, feeds, loaded_storefront, sample_catalog, storefront_config,
};
use muva_storefront::routes::app;
use muva_storefront::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

const FORM_PATH: &str = "/f/xyzabc";
const SUCCESS: &str = "Thanks! We’ll be in touch shortly.";
const FAILURE: &str = "Something went wrong. Please try again.";

async fn storefront(settings: Value, formspree: &MockServer) -> AppState {
    let server = feeds(Canned::json(&sample_catalog()), Canned::json(&settings)).await;
    loaded_storefront(&server, formspree).await
}

fn configured() -> Value {
    json!({"calendlyUrl": "", "formspreeId": "xyzabc"})
}

fn contact_request(form: &str, peer: &str, forwarded_for: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/contact")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(ip) = forwarded_for {
        builder = builder.header("x-forwarded-for", ip);
    }
    let mut request = builder.body(Body::from(form.to_string())).unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
    request
}

async fn post_contact(state: &AppState, form: &str) -> (StatusCode, String) {
    let response = app(state.clone())
        .oneshot(contact_request(form, "203.0.113.9:5000", None))
        .await
        .unwrap();
    let status = response.status();
    (status, body_string(response).await)
}

const VALID_FORM: &str =
    "name=Ana&email=Ana%40Example.com&message=Is+the+Aria+available+in+M%3F&_gotcha=";

// =============================================================================
// Delivery
// =============================================================================

#[tokio::test]
async fn test_success_posts_json_and_clears_fields() {
    let formspree = MockServer::start([(
        Method::POST,
        FORM_PATH,
        Canned::json(&json!({"ok": true})),
    )])
    .await;
    let state = storefront(configured(), &formspree).await;

    let (status, body) = post_contact(&state, VALID_FORM).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"data-status="success""#));
    assert!(body.contains(SUCCESS));
    assert!(!body.contains(r#"value="Ana""#));

    let sent = formspree.requests_to(FORM_PATH);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].headers.get("accept").unwrap(), "application/json");
    let payload = sent[0].json();
    assert_eq!(payload["name"], "Ana");
    assert_eq!(payload["email"], "ana@example.com");
    assert_eq!(payload["message"], "Is the Aria available in M?");
}

#[tokio::test]
async fn test_endpoint_failure_keeps_fields() {
    let formspree = MockServer::start([(
        Method::POST,
        FORM_PATH,
        Canned::text(StatusCode::INTERNAL_SERVER_ERROR, "down"),
    )])
    .await;
    let state = storefront(configured(), &formspree).await;

    let (status, body) = post_contact(&state, VALID_FORM).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"data-status="error""#));
    assert!(body.contains(FAILURE));
    assert!(body.contains(r#"value="Ana""#));
    assert_eq!(formspree.requests_to(FORM_PATH).len(), 1);
}

#[tokio::test]
async fn test_unknown_form_is_an_error() {
    // No route for the form id: the mock answers 404
    let formspree = MockServer::start([]).await;
    let state = storefront(configured(), &formspree).await;

    let (_, body) = post_contact(&state, VALID_FORM).await;

    assert!(body.contains(r#"data-status="error""#));
    assert!(body.contains(FAILURE));
}

// =============================================================================
// Submissions That Never Leave
// =============================================================================

#[tokio::test]
async fn test_honeypot_drops_silently() {
    let formspree = MockServer::start([(
        Method::POST,
        FORM_PATH,
        Canned::json(&json!({"ok": true})),
    )])
    .await;
    let state = storefront(configured(), &formspree).await;

    let (status, body) = post_contact(
        &state,
        "name=Bot&email=bot%40spam.example&message=Buy+now&_gotcha=http%3A%2F%2Fspam.example",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(formspree.requests().is_empty());
    assert!(body.contains(r#"data-status="idle""#));
    assert!(!body.contains(SUCCESS));
    assert!(!body.contains(FAILURE));
}

#[tokio::test]
async fn test_disabled_without_form_id() {
    let formspree = MockServer::start([(
        Method::POST,
        FORM_PATH,
        Canned::json(&json!({"ok": true})),
    )])
    .await;
    let state = storefront(json!({}), &formspree).await;

    let (_, body) = post_contact(&state, VALID_FORM).await;

    assert!(formspree.requests().is_empty());
    assert!(body.contains(r#"data-status="idle""#));
    assert!(body.contains("<fieldset disabled>"));
    assert!(body.contains("Add a formspreeId to settings.json"));
}

#[tokio::test]
async fn test_contact_form_disabled_on_page_without_form_id() {
    let formspree = MockServer::start([]).await;
    let state = storefront(json!({}), &formspree).await;

    let response = app(state.clone())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = body_string(response).await;

    assert!(body.contains("<fieldset disabled>"));
}

#[tokio::test]
async fn test_invalid_email_stays_idle() {
    let formspree = MockServer::start([(
        Method::POST,
        FORM_PATH,
        Canned::json(&json!({"ok": true})),
    )])
    .await;
    let state = storefront(configured(), &formspree).await;

    let (_, body) = post_contact(&state, "name=Ana&email=not-an-email&message=Hi&_gotcha=").await;

    assert!(formspree.requests().is_empty());
    assert!(body.contains(r#"data-status="idle""#));
    assert!(body.contains("Please enter a valid email address."));
    // Fields are kept for correction
    assert!(body.contains(r#"value="Ana""#));
}

#[tokio::test]
async fn test_blank_message_stays_idle() {
    let formspree = MockServer::start([]).await;
    let state = storefront(configured(), &formspree).await;

    let (_, body) =
        post_contact(&state, "name=Ana&email=ana%40example.com&message=++&_gotcha=").await;

    assert!(formspree.requests().is_empty());
    assert!(body.contains("Please include a message."));
}

// =============================================================================
// Rate Limiting
// =============================================================================

async fn statuses_for(state: &AppState, requests: Vec<Request<Body>>) -> Vec<StatusCode> {
    // One router so every request shares the limiter
    let router = app(state.clone());
    let mut statuses = Vec::new();
    for request in requests {
        let response = router.clone().oneshot(request).await.unwrap();
        statuses.push(response.status());
    }
    statuses
}

#[tokio::test]
async fn test_rotating_forwarded_for_is_still_limited() {
    let formspree = MockServer::start([(
        Method::POST,
        FORM_PATH,
        Canned::json(&json!({"ok": true})),
    )])
    .await;
    let state = storefront(configured(), &formspree).await;

    let requests = (0..8)
        .map(|i| contact_request(VALID_FORM, "198.51.100.4:6000", Some(&format!("10.9.9.{i}"))))
        .collect();
    let statuses = statuses_for(&state, requests).await;

    assert_eq!(&statuses[..5], &[StatusCode::OK; 5]);
    assert_eq!(&statuses[5..], &[StatusCode::TOO_MANY_REQUESTS; 3]);
    assert_eq!(formspree.requests_to(FORM_PATH).len(), 5);
}

#[tokio::test]
async fn test_forwarded_for_keys_limiter_behind_proxy() {
    let formspree = MockServer::start([(
        Method::POST,
        FORM_PATH,
        Canned::json(&json!({"ok": true})),
    )])
    .await;
    let server = feeds(Canned::json(&sample_catalog()), Canned::json(&configured())).await;
    let mut config = storefront_config(&server.url, formspree.url("/f/"));
    config.trust_proxy = true;
    let state = AppState::new(config).unwrap();
    state.load_catalog().await;

    // Every request arrives from the proxy's address
    let requests = (0..8)
        .map(|i| contact_request(VALID_FORM, "10.0.0.1:6000", Some(&format!("203.0.113.{i}"))))
        .collect();
    let statuses = statuses_for(&state, requests).await;
    assert_eq!(statuses, vec![StatusCode::OK; 8]);

    let requests = (0..6)
        .map(|_| contact_request(VALID_FORM, "10.0.0.1:6000", Some("203.0.113.50")))
        .collect();
    let statuses = statuses_for(&state, requests).await;
    assert_eq!(statuses[5], StatusCode::TOO_MANY_REQUESTS);
}
