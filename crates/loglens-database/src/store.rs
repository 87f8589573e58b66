//! Persistence traits implemented by the Postgres and memory backends.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use loglens_core::result::AppResult;
use loglens_entity::job::{Job, JobCounts};
use loglens_entity::stats::LogStats;

/// Durable job state store.
///
/// Implementations must make `claim_next` safe under concurrent
/// callers: a waiting job is handed to exactly one worker.
#[async_trait]
pub trait JobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a newly accepted job in the waiting state.
    async fn insert(&self, job: &Job) -> AppResult<()>;

    /// Atomically claim the best waiting job: lowest priority value
    /// first, then earliest `enqueued_at`. Jobs with a future
    /// `scheduled_at` are skipped. The claimed job becomes active with
    /// `attempts` incremented and a lease taken for `lease`.
    async fn claim_next(&self, worker_id: &str, lease: Duration) -> AppResult<Option<Job>>;

    /// Record progress for an active job and return the stored value.
    /// The store keeps the maximum of the old and new values.
    async fn record_progress(&self, id: Uuid, progress: i32) -> AppResult<i32>;

    /// Transition an active job to completed. Returns `false` when the
    /// job was not active (already finished), making completion
    /// idempotent.
    async fn mark_completed(&self, id: Uuid, result: &serde_json::Value) -> AppResult<bool>;

    /// Transition a job to terminal failure.
    async fn mark_failed(&self, id: Uuid, error: &str) -> AppResult<()>;

    /// Return a failed attempt to the waiting state with a retry time.
    async fn schedule_retry(&self, id: Uuid, run_at: DateTime<Utc>, error: &str) -> AppResult<()>;

    /// Look up a job by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>>;

    /// Per-status job counts.
    async fn counts(&self) -> AppResult<JobCounts>;

    /// Delete completed jobs beyond the most recent `keep_count` or
    /// finished before `cutoff`. Returns the number deleted.
    async fn prune_completed(&self, keep_count: i64, cutoff: DateTime<Utc>) -> AppResult<u64>;

    /// Delete failed jobs finished before `cutoff`.
    async fn prune_failed(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;

    /// Recover active jobs whose lease expired before `now`: jobs with
    /// attempts remaining return to waiting, exhausted jobs become
    /// failed. Returns the number of jobs touched.
    async fn reclaim_expired_leases(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// Check store connectivity.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Store for aggregated log statistics.
#[async_trait]
pub trait StatsStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist statistics for a processed file. Returns `false` when a
    /// row for the same `file_id` already exists (the insert is
    /// ignored, keeping re-runs idempotent).
    async fn insert(&self, stats: &LogStats) -> AppResult<bool>;

    /// Look up statistics by file id.
    async fn find_by_file_id(&self, file_id: &str) -> AppResult<Option<LogStats>>;

    /// Most recently processed statistics, newest first.
    async fn list_recent(&self, limit: i64) -> AppResult<Vec<LogStats>>;
}
