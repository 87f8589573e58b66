//! Sliding-window admission decisions.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use loglens_core::config::rate_limit::RateLimitConfig;

use crate::backend::RateLimitBackend;
use crate::keys;

/// Limit parameters for one decision.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    /// Maximum requests allowed per window.
    pub max_requests: u64,
    /// Window span in milliseconds.
    pub window_ms: u64,
}

impl From<&RateLimitConfig> for RateLimitSettings {
    fn from(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window_ms: config.window_ms,
        }
    }
}

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    /// Whether the request is admitted.
    pub allowed: bool,
    /// The limit that applied.
    pub limit: u64,
    /// Requests left in the current window.
    pub remaining: u64,
    /// Milliseconds until the window has room again. Zero when allowed.
    pub retry_after_ms: u64,
}

impl RateLimitDecision {
    fn admitted(limit: u64, count: u64) -> Self {
        Self {
            allowed: true,
            limit,
            remaining: limit.saturating_sub(count),
            retry_after_ms: 0,
        }
    }
}

/// Sliding-window rate limiter over a pluggable backend.
#[derive(Debug, Clone)]
pub struct SlidingWindowLimiter {
    backend: Arc<dyn RateLimitBackend>,
    settings: RateLimitSettings,
}

impl SlidingWindowLimiter {
    pub fn new(backend: Arc<dyn RateLimitBackend>, settings: RateLimitSettings) -> Self {
        Self { backend, settings }
    }

    /// Check one request against the configured limit.
    pub async fn allow(&self, identifier: &str, endpoint: &str) -> RateLimitDecision {
        self.allow_with(identifier, endpoint, self.settings).await
    }

    /// Check one request against explicit limit parameters.
    ///
    /// Counting happens first, so a rejected request still occupies a
    /// slot in the window. A backend failure admits the request: log
    /// availability is worth more here than strict limiting.
    pub async fn allow_with(
        &self,
        identifier: &str,
        endpoint: &str,
        settings: RateLimitSettings,
    ) -> RateLimitDecision {
        let key = keys::request_key(endpoint, identifier);
        let now_ms = Utc::now().timestamp_millis();

        let snapshot = match self.backend.record(&key, now_ms, settings.window_ms).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(%error, identifier, endpoint, "Rate limit backend failed, admitting request");
                return RateLimitDecision::admitted(settings.max_requests, 0);
            }
        };

        if snapshot.count > settings.max_requests {
            let retry_after_ms =
                (snapshot.oldest_ms + settings.window_ms as i64 - now_ms).max(0) as u64;
            RateLimitDecision {
                allowed: false,
                limit: settings.max_requests,
                remaining: 0,
                retry_after_ms,
            }
        } else {
            RateLimitDecision::admitted(settings.max_requests, snapshot.count)
        }
    }
}
