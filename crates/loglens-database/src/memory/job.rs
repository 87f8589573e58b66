//! In-memory job store implementation.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use loglens_core::result::AppResult;
use loglens_entity::job::{Job, JobCounts, JobStatus};

use crate::store::JobStore;

/// Job store held entirely in process memory.
///
/// A single mutex guards all operations, so a claim scan is atomic with
/// respect to other claimers the same way the Postgres `SKIP LOCKED`
/// query is.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: Mutex<HashMap<Uuid, Job>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn insert(&self, job: &Job) -> AppResult<()> {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn claim_next(&self, worker_id: &str, lease: Duration) -> AppResult<Option<Job>> {
        let now = Utc::now();
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());

        let candidate = jobs
            .values()
            .filter(|j| {
                j.status == JobStatus::Waiting
                    && j.scheduled_at.is_none_or(|at| at <= now)
            })
            .min_by_key(|j| (j.priority, j.enqueued_at))
            .map(|j| j.id);

        let Some(id) = candidate else {
            return Ok(None);
        };

        let job = jobs.get_mut(&id).ok_or_else(|| {
            loglens_core::AppError::internal("Claimed job vanished from memory store")
        })?;
        job.status = JobStatus::Active;
        job.started_at = Some(now);
        job.worker_id = Some(worker_id.to_string());
        job.attempts += 1;
        job.progress = 0;
        job.scheduled_at = None;
        job.lease_expires_at = Some(now + chrono::Duration::from_std(lease).unwrap_or_default());
        Ok(Some(job.clone()))
    }

    async fn record_progress(&self, id: Uuid, progress: i32) -> AppResult<i32> {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        match jobs.get_mut(&id) {
            Some(job) if job.status == JobStatus::Active => {
                job.progress = job.progress.max(progress);
                Ok(job.progress)
            }
            _ => Err(loglens_core::AppError::not_found(format!(
                "No active job {id}"
            ))),
        }
    }

    async fn mark_completed(&self, id: Uuid, result: &serde_json::Value) -> AppResult<bool> {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        match jobs.get_mut(&id) {
            Some(job) if job.status == JobStatus::Active => {
                job.status = JobStatus::Completed;
                job.result = Some(result.clone());
                job.progress = 100;
                job.finished_at = Some(Utc::now());
                job.lease_expires_at = None;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> AppResult<()> {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(job) = jobs.get_mut(&id) {
            job.status = JobStatus::Failed;
            job.error_message = Some(error.to_string());
            job.finished_at = Some(Utc::now());
            job.lease_expires_at = None;
        }
        Ok(())
    }

    async fn schedule_retry(&self, id: Uuid, run_at: DateTime<Utc>, error: &str) -> AppResult<()> {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(job) = jobs.get_mut(&id) {
            job.status = JobStatus::Waiting;
            job.error_message = Some(error.to_string());
            job.scheduled_at = Some(run_at);
            job.worker_id = None;
            job.started_at = None;
            job.lease_expires_at = None;
            job.progress = 0;
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>> {
        let jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        Ok(jobs.get(&id).cloned())
    }

    async fn counts(&self) -> AppResult<JobCounts> {
        let jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        let mut counts = JobCounts {
            waiting: 0,
            active: 0,
            completed: 0,
            failed: 0,
        };
        for job in jobs.values() {
            match job.status {
                JobStatus::Waiting => counts.waiting += 1,
                JobStatus::Active => counts.active += 1,
                JobStatus::Completed => counts.completed += 1,
                JobStatus::Failed => counts.failed += 1,
            }
        }
        Ok(counts)
    }

    async fn prune_completed(&self, keep_count: i64, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());

        let mut completed: Vec<(Uuid, Option<DateTime<Utc>>)> = jobs
            .values()
            .filter(|j| j.status == JobStatus::Completed)
            .map(|j| (j.id, j.finished_at))
            .collect();
        completed.sort_by(|a, b| b.1.cmp(&a.1));

        let mut remove: Vec<Uuid> = completed
            .iter()
            .skip(keep_count.max(0) as usize)
            .map(|(id, _)| *id)
            .collect();
        remove.extend(
            completed
                .iter()
                .filter(|(_, at)| at.is_some_and(|t| t < cutoff))
                .map(|(id, _)| *id),
        );
        remove.sort_unstable();
        remove.dedup();

        for id in &remove {
            jobs.remove(id);
        }
        Ok(remove.len() as u64)
    }

    async fn prune_failed(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        let before = jobs.len();
        jobs.retain(|_, j| {
            !(j.status == JobStatus::Failed && j.finished_at.is_some_and(|t| t < cutoff))
        });
        Ok((before - jobs.len()) as u64)
    }

    async fn reclaim_expired_leases(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut jobs = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        let mut touched = 0u64;
        for job in jobs.values_mut() {
            if job.status != JobStatus::Active
                || !job.lease_expires_at.is_some_and(|at| at < now)
            {
                continue;
            }
            if job.attempts >= job.max_attempts {
                job.status = JobStatus::Failed;
                job.error_message = Some("Worker lease expired".to_string());
                job.finished_at = Some(now);
            } else {
                job.status = JobStatus::Waiting;
                job.started_at = None;
                job.progress = 0;
            }
            job.worker_id = None;
            job.lease_expires_at = None;
            touched += 1;
        }
        Ok(touched)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
