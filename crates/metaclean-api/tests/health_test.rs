//! Liveness, health and fallback route tests.
//!
//! Run with: `cargo test -p metaclean-api --test health_test`

mod helpers;

use axum::http::StatusCode;
use chrono::DateTime;
use helpers::setup_test_app;

#[tokio::test]
async fn test_service_info() {
    let app = setup_test_app().await;

    let response = app.client().get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "metadata-cleaner-api");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(body["endpoints"]["health"], "GET /");
    assert_eq!(body["endpoints"]["healthCheck"], "GET /health");
    assert_eq!(body["endpoints"]["clearMetadata"], "POST /clear-metadata");
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    let timestamp = body["timestamp"].as_str().expect("timestamp is a string");
    assert!(timestamp.ends_with('Z'));
    assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let app = setup_test_app().await;

    let response = app.client().get("/does-not-exist").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}
