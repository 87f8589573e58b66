//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use loglens_core::config::AppConfig;
use loglens_database::store::StatsStore;
use loglens_ratelimit::SlidingWindowLimiter;
use loglens_realtime::EventBus;
use loglens_storage::ChunkStore;
use loglens_worker::JobQueue;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Job queue for enqueuing uploads and status queries.
    pub queue: Arc<JobQueue>,
    /// Persisted log statistics.
    pub stats: Arc<dyn StatsStore>,
    /// Chunk storage for uploaded files.
    pub chunks: ChunkStore,
    /// Event bus for the WebSocket stream.
    pub bus: Arc<EventBus>,
    /// Request rate limiter.
    pub limiter: Arc<SlidingWindowLimiter>,
}
