//! Job entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::JobStatus;

/// A queued log-processing job.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    /// Unique job identifier.
    pub id: Uuid,
    /// Job payload (JSON, see [`super::payload::LogFilePayload`]).
    pub payload: serde_json::Value,
    /// Numeric priority. Lower values are dequeued first.
    pub priority: i32,
    /// Current job status.
    pub status: JobStatus,
    /// Number of execution attempts started so far.
    pub attempts: i32,
    /// Maximum allowed attempts.
    pub max_attempts: i32,
    /// Completion percentage of the current attempt (0..=100).
    pub progress: i32,
    /// Result data on completion (JSON).
    pub result: Option<serde_json::Value>,
    /// Error message from the most recent failed attempt.
    pub error_message: Option<String>,
    /// When the job was accepted into the queue.
    pub enqueued_at: DateTime<Utc>,
    /// Earliest execution time for a retried job (None = immediate).
    pub scheduled_at: Option<DateTime<Utc>>,
    /// When the current attempt started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the job reached a terminal state.
    pub finished_at: Option<DateTime<Utc>>,
    /// Worker ID that claimed the job.
    pub worker_id: Option<String>,
    /// When the current claim lease expires. An active job past this
    /// deadline is presumed abandoned and returned to waiting.
    pub lease_expires_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Check if another attempt may be scheduled after a failure.
    pub fn can_retry(&self) -> bool {
        self.attempts < self.max_attempts
    }
}

/// Per-status job counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, FromRow)]
pub struct JobCounts {
    pub waiting: i64,
    pub active: i64,
    pub completed: i64,
    pub failed: i64,
}
