//! Rate limiting configuration.

use serde::{Deserialize, Serialize};

/// Sliding-window rate limiter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether request rate limiting is enforced.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Window backend: `"memory"` or `"redis"`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Maximum requests allowed per window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u64,
    /// Window span in milliseconds.
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
    /// Redis backend settings.
    #[serde(default)]
    pub redis: RedisConfig,
}

/// Redis connection settings for the rate limiter backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Prefix applied to every key written by this service.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            backend: default_backend(),
            max_requests: default_max_requests(),
            window_ms: default_window_ms(),
            redis: RedisConfig::default(),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_max_requests() -> u64 {
    10
}

fn default_window_ms() -> u64 {
    10_000
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "loglens:".to_string()
}
