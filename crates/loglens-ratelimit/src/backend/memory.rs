//! Process-local window backend.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use loglens_core::result::AppResult;

use super::{RateLimitBackend, WindowSnapshot};

/// Window backend holding per-key timestamp queues in a moka cache.
///
/// Idle keys are evicted by time-to-idle, so clients that stop sending
/// requests do not leak window state.
#[derive(Debug)]
pub struct MemoryBackend {
    windows: Cache<String, Arc<Mutex<VecDeque<i64>>>>,
}

impl MemoryBackend {
    /// `idle_ttl` should comfortably exceed the window span.
    pub fn new(max_keys: u64, idle_ttl: Duration) -> Self {
        Self {
            windows: Cache::builder()
                .max_capacity(max_keys)
                .time_to_idle(idle_ttl)
                .build(),
        }
    }
}

#[async_trait]
impl RateLimitBackend for MemoryBackend {
    async fn record(&self, key: &str, now_ms: i64, window_ms: u64) -> AppResult<WindowSnapshot> {
        let window = self
            .windows
            .get_with(key.to_string(), async { Arc::new(Mutex::new(VecDeque::new())) })
            .await;

        let mut timestamps = window.lock().unwrap_or_else(|e| e.into_inner());
        let cutoff = now_ms - window_ms as i64;
        while timestamps.front().is_some_and(|&t| t <= cutoff) {
            timestamps.pop_front();
        }
        timestamps.push_back(now_ms);

        Ok(WindowSnapshot {
            count: timestamps.len() as u64,
            oldest_ms: timestamps.front().copied().unwrap_or(now_ms),
        })
    }
}
