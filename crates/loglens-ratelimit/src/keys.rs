//! Rate-limit key builders.
//!
//! Centralising key construction prevents typos and makes it easy to
//! find every key the limiter uses.

/// Window key for one client identifier on one endpoint.
pub fn request_key(endpoint: &str, identifier: &str) -> String {
    format!("rate_limit:{endpoint}:{identifier}")
}
