//! Integration tests for the request rate limiter.

use http::StatusCode;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_requests_over_limit_are_rejected() {
    let mut config = helpers::test_config();
    config.rate_limit.enabled = true;
    config.rate_limit.max_requests = 3;
    config.rate_limit.window_ms = 60_000;
    let app = TestApp::with_config(config).await;

    for i in 0..3 {
        let response = app.request("GET", "/api/queue/status", None).await;
        assert_eq!(response.status, StatusCode::OK, "request {i} rejected");
        let remaining = response
            .headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap();
        assert_eq!(remaining, 2 - i);
    }

    let response = app.request("GET", "/api/queue/status", None).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        response.body.get("error").and_then(|v| v.as_str()),
        Some("RATE_LIMITED")
    );
    assert!(response.headers.get("retry-after").is_some());
    assert_eq!(
        response
            .headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok()),
        Some("0")
    );
}

#[tokio::test]
async fn test_limit_is_per_endpoint() {
    let mut config = helpers::test_config();
    config.rate_limit.enabled = true;
    config.rate_limit.max_requests = 2;
    config.rate_limit.window_ms = 60_000;
    let app = TestApp::with_config(config).await;

    for _ in 0..2 {
        let response = app.request("GET", "/api/queue/status", None).await;
        assert_eq!(response.status, StatusCode::OK);
    }
    let response = app.request("GET", "/api/queue/status", None).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);

    // A different endpoint has its own window.
    let response = app.request("GET", "/api/stats", None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_disabled_limiter_passes_all_requests() {
    let app = TestApp::new().await;

    for _ in 0..20 {
        let response = app.request("GET", "/api/queue/status", None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.headers.get("x-ratelimit-limit").is_none());
    }
}

#[tokio::test]
async fn test_window_expiry_restores_budget() {
    let mut config = helpers::test_config();
    config.rate_limit.enabled = true;
    config.rate_limit.max_requests = 1;
    config.rate_limit.window_ms = 100;
    let app = TestApp::with_config(config).await;

    let response = app.request("GET", "/api/queue/status", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let response = app.request("GET", "/api/queue/status", None).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);

    tokio::time::sleep(std::time::Duration::from_millis(150)).await;

    let response = app.request("GET", "/api/queue/status", None).await;
    assert_eq!(response.status, StatusCode::OK);
}
