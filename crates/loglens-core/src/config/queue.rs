//! Job queue configuration.

use serde::{Deserialize, Serialize};

/// Durable job queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Queue store backend: `"postgres"` or `"memory"`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Default maximum execution attempts per job.
    #[serde(default = "default_max_attempts")]
    pub default_max_attempts: i32,
    /// Base retry delay in milliseconds (doubled per attempt).
    #[serde(default = "default_base_delay")]
    pub retry_base_delay_ms: u64,
    /// Upper bound on the retry delay in milliseconds.
    #[serde(default = "default_max_delay")]
    pub retry_max_delay_ms: u64,
    /// Lease duration for claimed jobs in seconds. An active job whose
    /// lease expires is returned to the waiting state by maintenance.
    #[serde(default = "default_visibility_timeout")]
    pub visibility_timeout_seconds: u64,
    /// Number of most recent completed jobs to retain.
    #[serde(default = "default_completed_keep_count")]
    pub completed_keep_count: i64,
    /// Age in seconds after which completed jobs are pruned.
    #[serde(default = "default_completed_keep")]
    pub completed_keep_seconds: u64,
    /// Age in seconds after which terminally failed jobs are pruned.
    /// Kept longer than completed jobs for diagnosis.
    #[serde(default = "default_failed_keep")]
    pub failed_keep_seconds: u64,
    /// Buffer size of the queue transition broadcast channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer_size: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            default_max_attempts: default_max_attempts(),
            retry_base_delay_ms: default_base_delay(),
            retry_max_delay_ms: default_max_delay(),
            visibility_timeout_seconds: default_visibility_timeout(),
            completed_keep_count: default_completed_keep_count(),
            completed_keep_seconds: default_completed_keep(),
            failed_keep_seconds: default_failed_keep(),
            event_buffer_size: default_event_buffer(),
        }
    }
}

fn default_backend() -> String {
    "postgres".to_string()
}

fn default_max_attempts() -> i32 {
    3
}

fn default_base_delay() -> u64 {
    1000
}

fn default_max_delay() -> u64 {
    60_000
}

fn default_visibility_timeout() -> u64 {
    300
}

fn default_completed_keep_count() -> i64 {
    1000
}

fn default_completed_keep() -> u64 {
    3600
}

fn default_failed_keep() -> u64 {
    24 * 3600
}

fn default_event_buffer() -> usize {
    256
}
