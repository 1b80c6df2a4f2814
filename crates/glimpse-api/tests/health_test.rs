//! Health endpoint integration tests.

mod helpers;

use axum::http::StatusCode;
use helpers::setup_test_app;
use serde_json::Value;

#[tokio::test]
async fn test_liveness() {
    let app = setup_test_app();
    let response = app.client().get("/health/live").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "alive");
}

#[tokio::test]
async fn test_health_reports_components() {
    let app = setup_test_app();
    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy");
    assert_eq!(body["storage"], "healthy");
    assert_eq!(body["caption_provider"], "gemini");
}

#[tokio::test]
async fn test_readiness_fails_when_database_is_down() {
    let app = setup_test_app();
    assert_eq!(
        app.client().get("/health/ready").await.status_code(),
        StatusCode::OK
    );

    app.artifacts.fail_lists(true);
    let response = app.client().get("/health/ready").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["status"], "not_ready");
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let app = setup_test_app();
    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body["paths"].get("/upload").is_some());
    assert!(body["paths"].get("/gallery").is_some());
}
