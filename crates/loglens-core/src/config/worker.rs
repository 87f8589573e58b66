//! Worker pool configuration.

use serde::{Deserialize, Serialize};

/// Worker pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the in-process worker pool is started.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Maximum number of jobs processed concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Idle poll interval in milliseconds when the queue is empty.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Interval in seconds between maintenance sweeps
    /// (lease reclaim and retention pruning).
    #[serde(default = "default_maintenance_interval")]
    pub maintenance_interval_seconds: u64,
    /// Seconds to wait for in-flight jobs during shutdown.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            concurrency: default_concurrency(),
            poll_interval_ms: default_poll_interval(),
            maintenance_interval_seconds: default_maintenance_interval(),
            shutdown_grace_seconds: default_shutdown_grace(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}

fn default_poll_interval() -> u64 {
    500
}

fn default_maintenance_interval() -> u64 {
    60
}

fn default_shutdown_grace() -> u64 {
    30
}
