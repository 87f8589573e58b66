//! Sliding-window rate limiting middleware.

use std::net::SocketAddr;

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::debug;

use crate::state::AppState;

/// Enforce the per-client request limit.
///
/// Keys by client IP and request path. On rejection responds 429 with
/// `Retry-After` and `X-RateLimit-*` headers; admitted responses carry
/// the remaining budget.
pub async fn enforce(State(state): State<AppState>, request: Request, next: Next) -> Response {
    // ConnectInfo is absent when the router is driven directly in
    // tests; those requests share one window.
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let path = request.uri().path().to_string();

    let decision = state.limiter.allow(&client_ip, &path).await;

    if !decision.allowed {
        debug!(client_ip, path, retry_after_ms = decision.retry_after_ms, "Request rate limited");

        let retry_after_seconds = decision.retry_after_ms.div_ceil(1000);
        let body = Json(json!({
            "error": "RATE_LIMITED",
            "message": "Too many requests, slow down",
            "retry_after_ms": decision.retry_after_ms,
        }));

        let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
        let headers = response.headers_mut();
        headers.insert(header::RETRY_AFTER, header_value(retry_after_seconds));
        headers.insert("x-ratelimit-limit", header_value(decision.limit));
        headers.insert("x-ratelimit-remaining", header_value(0));
        return response;
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", header_value(decision.limit));
    headers.insert("x-ratelimit-remaining", header_value(decision.remaining));
    response
}

fn header_value(value: u64) -> HeaderValue {
    HeaderValue::from_str(&value.to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("0"))
}
