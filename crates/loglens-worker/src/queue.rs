//! Job queue for enqueuing, claiming, and finishing log-processing jobs.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

use loglens_core::config::queue::QueueConfig;
use loglens_core::error::{AppError, ErrorKind};
use loglens_core::events::{CompletionDetails, QueueEvent};
use loglens_core::result::AppResult;
use loglens_database::store::JobStore;
use loglens_entity::job::{Job, JobCounts, JobStatus, LogFilePayload};

/// Job queue over a pluggable store.
///
/// Every state transition is broadcast as a [`QueueEvent`]; delivery is
/// best effort and a lagging subscriber never blocks the queue.
#[derive(Debug, Clone)]
pub struct JobQueue {
    store: Arc<dyn JobStore>,
    config: QueueConfig,
    events: broadcast::Sender<QueueEvent>,
}

impl JobQueue {
    pub fn new(store: Arc<dyn JobStore>, config: QueueConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer_size.max(1));
        Self {
            store,
            config,
            events,
        }
    }

    /// Subscribe to queue transition events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<QueueEvent> {
        self.events.subscribe()
    }

    /// Accept a new log-processing job.
    ///
    /// A store failure surfaces as `ServiceUnavailable` so the
    /// ingestion boundary can tell clients to retry later.
    pub async fn enqueue(&self, payload: &LogFilePayload) -> AppResult<Job> {
        let job = Job {
            id: Uuid::new_v4(),
            payload: serde_json::to_value(payload)?,
            priority: LogFilePayload::priority_for_size(payload.size_bytes),
            status: JobStatus::Waiting,
            attempts: 0,
            max_attempts: self.config.default_max_attempts,
            progress: 0,
            result: None,
            error_message: None,
            enqueued_at: Utc::now(),
            scheduled_at: None,
            started_at: None,
            finished_at: None,
            worker_id: None,
            lease_expires_at: None,
        };

        self.store.insert(&job).await.map_err(|e| {
            AppError::with_source(ErrorKind::ServiceUnavailable, "Job queue is unavailable", e)
        })?;

        debug!(job_id = %job.id, file_id = %payload.file_id, priority = job.priority, "Enqueued job");
        self.emit(QueueEvent::Waiting { job_id: job.id });
        Ok(job)
    }

    /// Claim the next due job for a worker, taking a visibility lease.
    pub async fn dequeue(&self, worker_id: &str) -> AppResult<Option<Job>> {
        let lease = Duration::from_secs(self.config.visibility_timeout_seconds);
        let Some(job) = self.store.claim_next(worker_id, lease).await? else {
            return Ok(None);
        };

        debug!(job_id = %job.id, worker_id, attempt = job.attempts, "Dequeued job");
        self.emit(QueueEvent::Active {
            job_id: job.id,
            attempt: job.attempts,
        });
        Ok(Some(job))
    }

    /// Record progress for an active job.
    ///
    /// Progress is monotonically non-decreasing; a caller reporting a
    /// lower value than already stored is a programming defect.
    pub async fn report_progress(&self, job_id: Uuid, percent: i32) -> AppResult<()> {
        if !(0..=100).contains(&percent) {
            return Err(AppError::validation(format!(
                "Progress must be between 0 and 100, got {percent}"
            )));
        }

        let stored = self.store.record_progress(job_id, percent).await?;
        if stored != percent {
            debug_assert!(false, "progress regressed: reported {percent}, stored {stored}");
            warn!(%job_id, percent, stored, "Ignored regressing progress report");
        }

        self.emit(QueueEvent::Progress {
            job_id,
            progress: stored,
        });
        Ok(())
    }

    /// Finish a job successfully. Idempotent: a second completion of
    /// the same job is a no-op and emits nothing.
    pub async fn complete(&self, job_id: Uuid, details: CompletionDetails) -> AppResult<()> {
        let result = serde_json::to_value(&details)?;
        if self.store.mark_completed(job_id, &result).await? {
            self.emit(QueueEvent::Completed { job_id, details });
        }
        Ok(())
    }

    /// Record a failed attempt. Jobs with attempts remaining return to
    /// the queue with exponential backoff; exhausted jobs go terminal.
    pub async fn fail(&self, job: &Job, error: &str) -> AppResult<()> {
        if job.can_retry() {
            let delay = self.retry_delay(job.attempts);
            let run_at = Utc::now() + chrono::Duration::from_std(delay).unwrap_or_default();
            self.store.schedule_retry(job.id, run_at, error).await?;

            debug!(job_id = %job.id, attempt = job.attempts, delay_ms = delay.as_millis() as u64, "Scheduled retry");
            self.emit(QueueEvent::Failed {
                job_id: job.id,
                error: error.to_string(),
                will_retry: true,
            });
        } else {
            self.fail_terminal(job.id, error).await?;
        }
        Ok(())
    }

    /// Fail a job without retrying, regardless of attempts remaining.
    pub async fn fail_permanent(&self, job_id: Uuid, error: &str) -> AppResult<()> {
        self.fail_terminal(job_id, error).await
    }

    async fn fail_terminal(&self, job_id: Uuid, error: &str) -> AppResult<()> {
        self.store.mark_failed(job_id, error).await?;
        self.emit(QueueEvent::Failed {
            job_id,
            error: error.to_string(),
            will_retry: false,
        });
        Ok(())
    }

    /// Per-status job counts.
    pub async fn counts(&self) -> AppResult<JobCounts> {
        self.store.counts().await
    }

    /// Look up a job.
    pub async fn find(&self, job_id: Uuid) -> AppResult<Option<Job>> {
        self.store.find_by_id(job_id).await
    }

    /// Check store connectivity.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.store.health_check().await
    }

    /// Backoff before retry attempt `attempt + 1`: base doubled per
    /// completed attempt, capped at the configured maximum.
    fn retry_delay(&self, attempt: i32) -> Duration {
        let exponent = attempt.saturating_sub(1).clamp(0, 31) as u32;
        let delay_ms = self
            .config
            .retry_base_delay_ms
            .saturating_mul(1u64 << exponent)
            .min(self.config.retry_max_delay_ms);
        Duration::from_millis(delay_ms)
    }

    fn emit(&self, event: QueueEvent) {
        // No receivers is fine; events are advisory.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loglens_database::memory::MemoryJobStore;

    fn queue(config: QueueConfig) -> JobQueue {
        JobQueue::new(Arc::new(MemoryJobStore::new()), config)
    }

    fn payload() -> LogFilePayload {
        LogFilePayload {
            file_id: "f1".into(),
            filename: "app.log".into(),
            total_chunks: 1,
            size_bytes: 42,
        }
    }

    #[test]
    fn retry_delay_doubles_and_caps() {
        let queue = queue(QueueConfig {
            retry_base_delay_ms: 1000,
            retry_max_delay_ms: 5000,
            ..QueueConfig::default()
        });
        assert_eq!(queue.retry_delay(1), Duration::from_millis(1000));
        assert_eq!(queue.retry_delay(2), Duration::from_millis(2000));
        assert_eq!(queue.retry_delay(3), Duration::from_millis(4000));
        assert_eq!(queue.retry_delay(4), Duration::from_millis(5000));
        assert_eq!(queue.retry_delay(10), Duration::from_millis(5000));
    }

    #[tokio::test]
    async fn enqueue_emits_waiting_event() {
        let queue = queue(QueueConfig::default());
        let mut events = queue.subscribe_events();

        let job = queue.enqueue(&payload()).await.unwrap();
        assert_eq!(job.status, JobStatus::Waiting);
        assert_eq!(job.priority, 1);

        match events.recv().await.unwrap() {
            QueueEvent::Waiting { job_id } => assert_eq!(job_id, job.id),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn progress_rejects_out_of_range_values() {
        let queue = queue(QueueConfig::default());
        let job = queue.enqueue(&payload()).await.unwrap();
        queue.dequeue("w1").await.unwrap();

        assert!(queue.report_progress(job.id, -1).await.is_err());
        assert!(queue.report_progress(job.id, 101).await.is_err());
        assert!(queue.report_progress(job.id, 100).await.is_ok());
    }

    #[tokio::test]
    async fn failed_job_is_rescheduled_with_backoff() {
        let queue = queue(QueueConfig::default());
        queue.enqueue(&payload()).await.unwrap();
        let claimed = queue.dequeue("w1").await.unwrap().unwrap();

        queue.fail(&claimed, "boom").await.unwrap();

        let stored = queue.find(claimed.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Waiting);
        assert!(stored.scheduled_at.is_some());
        assert_eq!(stored.error_message.as_deref(), Some("boom"));
    }
}
