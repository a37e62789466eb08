//! Health and middleware integration tests.

mod helpers;

use axum::http::StatusCode;
use helpers::fixtures::{csv_rows, file_form};
use helpers::setup_test_app;

#[tokio::test]
async fn test_liveness() {
    let app = setup_test_app().await;

    let response = app.client().get("/health/live").await;

    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "status": "alive" }));
}

#[tokio::test]
async fn test_readiness_reports_upload_dir() {
    let app = setup_test_app().await;

    let response = app.client().get("/health/ready").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["storage"], "healthy");
    assert_eq!(
        body["upload_dir"],
        app.upload_dir().display().to_string()
    );
}

#[tokio::test]
async fn test_readiness_fails_when_upload_dir_removed() {
    let app = setup_test_app().await;
    std::fs::remove_dir_all(app.upload_dir()).expect("remove upload dir");

    let response = app.client().get("/health/ready").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "not_ready");
    assert!(!app.upload_dir().exists());

    // The next upload recreates the directory and readiness recovers
    app.client()
        .post("/upload")
        .multipart(file_form("data.csv", "text/csv", csv_rows(2)))
        .await
        .assert_status(StatusCode::FOUND);
    app.client().get("/health/ready").await.assert_status_ok();
}

#[tokio::test]
async fn test_request_id_generated() {
    let app = setup_test_app().await;

    let response = app.client().get("/upload").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("X-Request-ID header");
    assert!(uuid::Uuid::parse_str(request_id.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_request_id_echoed() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/upload")
        .add_header("X-Request-ID", "upload-42")
        .await;

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "upload-42"
    );
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = setup_test_app().await;

    let response = app.client().get("/upload").await;

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get("content-security-policy").is_some());
    assert!(headers.get("strict-transport-security").is_none());
}
