//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loglens_entity::job::{Job, JobCounts};
use loglens_entity::stats::LogStats;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Response to a log upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Queued job ID for status polling.
    pub job_id: Uuid,
    /// Stored file ID for stats lookup.
    pub file_id: String,
    /// Number of chunks the upload was split into.
    pub total_chunks: i32,
    /// Upload size in bytes.
    pub size_bytes: i64,
}

/// Job detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResponse {
    /// Job ID.
    pub id: Uuid,
    /// Current status.
    pub status: String,
    /// Completion percentage of the current attempt.
    pub progress: i32,
    /// Attempts started so far.
    pub attempts: i32,
    /// Maximum allowed attempts.
    pub max_attempts: i32,
    /// Result summary on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error from the most recent failed attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// When the job was accepted.
    pub enqueued_at: DateTime<Utc>,
    /// When the current attempt started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the job reached a terminal state.
    pub finished_at: Option<DateTime<Utc>>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            status: job.status.to_string(),
            progress: job.progress,
            attempts: job.attempts,
            max_attempts: job.max_attempts,
            result: job.result,
            error_message: job.error_message,
            enqueued_at: job.enqueued_at,
            started_at: job.started_at,
            finished_at: job.finished_at,
        }
    }
}

/// Per-state queue counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStatusResponse {
    pub waiting: i64,
    pub active: i64,
    pub completed: i64,
    pub failed: i64,
}

impl From<JobCounts> for QueueStatusResponse {
    fn from(counts: JobCounts) -> Self {
        Self {
            waiting: counts.waiting,
            active: counts.active,
            completed: counts.completed,
            failed: counts.failed,
        }
    }
}

/// Persisted statistics for one processed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    /// File ID.
    pub file_id: String,
    /// Total error signal (keyword plus structured level matches).
    pub error_count: i64,
    pub warning_count: i64,
    pub critical_count: i64,
    pub timeout_count: i64,
    pub exception_count: i64,
    /// Distinct IPv4 addresses, sorted.
    pub unique_ips: Vec<String>,
    /// Full per-keyword counts.
    pub keywords: serde_json::Value,
    /// When processing finished.
    pub processed_at: DateTime<Utc>,
}

impl From<LogStats> for StatsResponse {
    fn from(stats: LogStats) -> Self {
        Self {
            file_id: stats.file_id,
            error_count: stats.error_count,
            warning_count: stats.warning_count,
            critical_count: stats.critical_count,
            timeout_count: stats.timeout_count,
            exception_count: stats.exception_count,
            unique_ips: stats.unique_ips,
            keywords: stats.keywords,
            processed_at: stats.processed_at,
        }
    }
}

/// Health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Queue store reachability.
    pub queue: String,
    /// Chunk storage reachability.
    pub storage: String,
}
