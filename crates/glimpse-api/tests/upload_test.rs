//! Upload API integration tests.
//!
//! Run with: `cargo test -p glimpse-api --test upload_test`

mod helpers;

use axum::http::StatusCode;
use glimpse_captions::CaptionError;
use glimpse_core::models::UploadResponse;
use glimpse_services::test_helpers::StaticCaptioner;
use helpers::fixtures::{create_minimal_png, create_test_jpeg, file_form};
use helpers::{setup_test_app, setup_test_app_with, TEST_CAPTION};
use serde_json::Value;

#[tokio::test]
async fn test_upload_stores_original_then_records_metadata() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("cat.jpg", "image/jpeg", create_test_jpeg()))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: UploadResponse = response.json();
    assert_eq!(body.file_name, "cat.jpg");
    assert_eq!(body.storage_key, "originals/cat.jpg");
    assert_eq!(body.caption, TEST_CAPTION);
    assert!(body.url.ends_with("/originals/cat.jpg"));

    assert_eq!(
        app.log.entries(),
        vec![
            "storage.put originals/cat.jpg",
            "captions.caption",
            "artifacts.insert originals/cat.jpg",
        ]
    );
    assert_eq!(app.artifacts.records().len(), 1);
    assert_eq!(
        app.storage.content_type("originals/cat.jpg").as_deref(),
        Some("image/jpeg")
    );
}

#[tokio::test]
async fn test_upload_rejects_disallowed_extension_without_side_effects() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("malware.exe", "application/octet-stream", vec![0x4D, 0x5A]))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().unwrap().contains("malware.exe"));

    assert!(app.log.entries().is_empty());
    assert!(app.storage.keys().is_empty());
    assert!(app.artifacts.records().is_empty());
}

#[tokio::test]
async fn test_zero_byte_upload_is_rejected() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("cat.jpg", "image/jpeg", Vec::new()))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "Empty file");
    assert!(app.log.entries().is_empty());
}

#[tokio::test]
async fn test_upload_without_file_part_is_rejected() {
    let app = setup_test_app();

    let form = axum_test::multipart::MultipartForm::new().add_text("caption", "hello");
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No file selected");
    assert!(app.log.entries().is_empty());
}

#[tokio::test]
async fn test_upload_with_non_multipart_body_is_rejected() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/upload")
        .json(&serde_json::json!({ "file": "cat.jpg" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_upload_over_size_limit_is_413() {
    let app = setup_test_app_with(
        StaticCaptioner::text(TEST_CAPTION),
        &[("MAX_FILE_SIZE_MB", "1")],
    );

    let mut data = create_minimal_png();
    data.resize(1024 * 1024 + 1, 0);
    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("big.png", "image/png", data))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert!(app.storage.keys().is_empty());
}

#[tokio::test]
async fn test_caption_failure_still_creates_record() {
    let app = setup_test_app_with(
        StaticCaptioner::failing(CaptionError::MissingApiKey("GEMINI_API_KEY")),
        &[],
    );

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("dog.png", "image/png", create_minimal_png()))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: UploadResponse = response.json();
    assert!(body.caption.starts_with("Error: "));
    assert!(body.caption.contains("GEMINI_API_KEY"));

    let records = app.artifacts.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].caption, body.caption);
}

#[tokio::test]
async fn test_storage_failure_is_502_and_records_nothing() {
    let app = setup_test_app();
    app.storage.fail_puts(true);

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("cat.jpg", "image/jpeg", create_test_jpeg()))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["code"], "STORAGE_WRITE_ERROR");
    assert_eq!(body["error"], "S3 Upload Error");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .starts_with("S3 Upload Error: "));
    assert_eq!(app.log.entries(), vec!["storage.put originals/cat.jpg"]);
    assert!(app.artifacts.records().is_empty());
}

#[tokio::test]
async fn test_metadata_failure_is_500_and_leaves_blob() {
    let app = setup_test_app();
    app.artifacts.fail_inserts(true);

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("cat.jpg", "image/jpeg", create_test_jpeg()))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "DATABASE_WRITE_ERROR");
    assert_eq!(body["error"], "Database Error");
    assert_eq!(app.storage.keys(), vec!["originals/cat.jpg"]);
    assert!(app.artifacts.records().is_empty());
}

#[tokio::test]
async fn test_production_hides_details_of_sensitive_errors() {
    let app = setup_test_app_with(
        StaticCaptioner::text(TEST_CAPTION),
        &[
            ("ENVIRONMENT", "production"),
            ("CORS_ORIGINS", "https://gallery.example.com"),
        ],
    );
    app.artifacts.fail_inserts(true);

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("cat.jpg", "image/jpeg", create_test_jpeg()))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "DATABASE_WRITE_ERROR");
    assert_eq!(body["error"], "Database Error");
    assert!(body.get("details").is_none());
    assert!(body.get("error_type").is_none());
}

#[tokio::test]
async fn test_development_shows_details_of_sensitive_errors() {
    let app = setup_test_app();
    app.artifacts.fail_inserts(true);

    let response = app
        .client()
        .post("/upload")
        .multipart(file_form("cat.jpg", "image/jpeg", create_test_jpeg()))
        .await;

    let body: Value = response.json();
    assert!(body["details"]
        .as_str()
        .unwrap()
        .starts_with("Database Error: "));
}
