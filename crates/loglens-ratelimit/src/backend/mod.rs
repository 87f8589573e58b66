//! Window state backends.

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "redis-backend")]
pub mod redis;

use async_trait::async_trait;

use loglens_core::result::AppResult;

#[cfg(feature = "memory")]
pub use memory::MemoryBackend;
#[cfg(feature = "redis-backend")]
pub use redis::RedisBackend;

/// Window state after recording one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSnapshot {
    /// Requests in the window, including the one just recorded.
    pub count: u64,
    /// Timestamp of the oldest request still in the window, in epoch
    /// milliseconds.
    pub oldest_ms: i64,
}

/// Sliding-window state store.
///
/// `record` must be atomic per key: drop entries older than
/// `now_ms - window_ms`, add `now_ms`, and report the resulting state
/// in one step even under concurrent callers.
#[async_trait]
pub trait RateLimitBackend: Send + Sync + std::fmt::Debug + 'static {
    async fn record(&self, key: &str, now_ms: i64, window_ms: u64) -> AppResult<WindowSnapshot>;
}
