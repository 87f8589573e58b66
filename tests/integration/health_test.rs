//! Integration tests for the health endpoint.

use http::StatusCode;
use serde_json::Value;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.get("status").and_then(Value::as_str), Some("ok"));
    assert_eq!(response.body.get("queue").and_then(Value::as_str), Some("up"));
    assert_eq!(response.body.get("storage").and_then(Value::as_str), Some("up"));
    assert!(response.body.get("version").and_then(Value::as_str).is_some());
}

#[tokio::test]
async fn test_health_check_under_api_prefix() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.get("status").and_then(Value::as_str), Some("ok"));
}
