//! PostgreSQL job store implementation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use loglens_core::error::{AppError, ErrorKind};
use loglens_core::result::AppResult;
use loglens_entity::job::{Job, JobCounts};

use crate::store::JobStore;

/// Job store backed by a PostgreSQL table.
///
/// Claiming uses `FOR UPDATE SKIP LOCKED` so concurrent workers never
/// block each other or receive the same job.
#[derive(Debug, Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert(&self, job: &Job) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO jobs (id, payload, priority, status, attempts, max_attempts, \
             progress, enqueued_at, scheduled_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(job.id)
        .bind(&job.payload)
        .bind(job.priority)
        .bind(job.status)
        .bind(job.attempts)
        .bind(job.max_attempts)
        .bind(job.progress)
        .bind(job.enqueued_at)
        .bind(job.scheduled_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert job", e))?;
        Ok(())
    }

    async fn claim_next(&self, worker_id: &str, lease: Duration) -> AppResult<Option<Job>> {
        sqlx::query_as::<_, Job>(
            "UPDATE jobs SET status = 'active', started_at = NOW(), worker_id = $1, \
             attempts = attempts + 1, progress = 0, scheduled_at = NULL, \
             lease_expires_at = NOW() + make_interval(secs => $2) \
             WHERE id = ( \
                SELECT id FROM jobs \
                WHERE status = 'waiting' \
                AND (scheduled_at IS NULL OR scheduled_at <= NOW()) \
                ORDER BY priority ASC, enqueued_at ASC \
                FOR UPDATE SKIP LOCKED \
                LIMIT 1 \
             ) RETURNING *",
        )
        .bind(worker_id)
        .bind(lease.as_secs_f64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim job", e))
    }

    async fn record_progress(&self, id: Uuid, progress: i32) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE jobs SET progress = GREATEST(progress, $2) \
             WHERE id = $1 AND status = 'active' RETURNING progress",
        )
        .bind(id)
        .bind(progress)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record progress", e))?
        .ok_or_else(|| AppError::not_found(format!("No active job {id}")))
    }

    async fn mark_completed(&self, id: Uuid, result: &serde_json::Value) -> AppResult<bool> {
        let updated = sqlx::query(
            "UPDATE jobs SET status = 'completed', result = $2, progress = 100, \
             finished_at = NOW(), lease_expires_at = NULL \
             WHERE id = $1 AND status = 'active'",
        )
        .bind(id)
        .bind(result)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to complete job", e))?;
        Ok(updated.rows_affected() > 0)
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'failed', error_message = $2, finished_at = NOW(), \
             lease_expires_at = NULL WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark job failed", e))?;
        Ok(())
    }

    async fn schedule_retry(&self, id: Uuid, run_at: DateTime<Utc>, error: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE jobs SET status = 'waiting', error_message = $3, scheduled_at = $2, \
             worker_id = NULL, started_at = NULL, lease_expires_at = NULL, progress = 0 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(run_at)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to schedule retry", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find job", e))
    }

    async fn counts(&self) -> AppResult<JobCounts> {
        sqlx::query_as::<_, JobCounts>(
            "SELECT \
             COUNT(*) FILTER (WHERE status = 'waiting') AS waiting, \
             COUNT(*) FILTER (WHERE status = 'active') AS active, \
             COUNT(*) FILTER (WHERE status = 'completed') AS completed, \
             COUNT(*) FILTER (WHERE status = 'failed') AS failed \
             FROM jobs",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count jobs", e))
    }

    async fn prune_completed(&self, keep_count: i64, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let deleted = sqlx::query(
            "DELETE FROM jobs WHERE status = 'completed' AND (finished_at < $2 OR id IN ( \
                SELECT id FROM jobs WHERE status = 'completed' \
                ORDER BY finished_at DESC OFFSET $1))",
        )
        .bind(keep_count)
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to prune completed jobs", e)
        })?;
        Ok(deleted.rows_affected())
    }

    async fn prune_failed(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let deleted = sqlx::query("DELETE FROM jobs WHERE status = 'failed' AND finished_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to prune failed jobs", e)
            })?;
        Ok(deleted.rows_affected())
    }

    async fn reclaim_expired_leases(&self, now: DateTime<Utc>) -> AppResult<u64> {
        // Exhausted jobs go terminal instead of looping through the
        // queue forever.
        let failed = sqlx::query(
            "UPDATE jobs SET status = 'failed', error_message = 'Worker lease expired', \
             finished_at = NOW(), worker_id = NULL, lease_expires_at = NULL \
             WHERE status = 'active' AND lease_expires_at < $1 AND attempts >= max_attempts",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fail expired jobs", e))?;

        let reclaimed = sqlx::query(
            "UPDATE jobs SET status = 'waiting', worker_id = NULL, started_at = NULL, \
             lease_expires_at = NULL, progress = 0 \
             WHERE status = 'active' AND lease_expires_at < $1 AND attempts < max_attempts",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reclaim leases", e))?;

        Ok(failed.rows_affected() + reclaimed.rows_affected())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
