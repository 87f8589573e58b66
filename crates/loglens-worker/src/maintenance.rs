//! Periodic queue maintenance: retention pruning and lease recovery.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use loglens_core::config::queue::QueueConfig;
use loglens_database::store::JobStore;

/// Runs the queue's housekeeping sweep.
#[derive(Debug, Clone)]
pub struct QueueMaintenance {
    store: Arc<dyn JobStore>,
    config: QueueConfig,
}

impl QueueMaintenance {
    pub fn new(store: Arc<dyn JobStore>, config: QueueConfig) -> Self {
        Self { store, config }
    }

    /// One maintenance pass. Each step logs its own failure and the
    /// sweep continues; a broken store must not kill the runner loop.
    pub async fn run_once(&self) {
        let now = Utc::now();

        match self.store.reclaim_expired_leases(now).await {
            Ok(0) => {}
            Ok(reclaimed) => info!(reclaimed, "Recovered jobs with expired leases"),
            Err(e) => error!(error = %e, "Lease recovery failed"),
        }

        let completed_cutoff =
            now - chrono::Duration::seconds(self.config.completed_keep_seconds as i64);
        match self
            .store
            .prune_completed(self.config.completed_keep_count, completed_cutoff)
            .await
        {
            Ok(0) => {}
            Ok(pruned) => info!(pruned, "Pruned completed jobs"),
            Err(e) => error!(error = %e, "Completed job pruning failed"),
        }

        let failed_cutoff = now - chrono::Duration::seconds(self.config.failed_keep_seconds as i64);
        match self.store.prune_failed(failed_cutoff).await {
            Ok(0) => {}
            Ok(pruned) => info!(pruned, "Pruned failed jobs"),
            Err(e) => error!(error = %e, "Failed job pruning failed"),
        }
    }
}
