//! PostgreSQL statistics store implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use loglens_core::error::{AppError, ErrorKind};
use loglens_core::result::AppResult;
use loglens_entity::stats::LogStats;

use crate::store::StatsStore;

/// Statistics store backed by a PostgreSQL table keyed by `file_id`.
#[derive(Debug, Clone)]
pub struct PgStatsStore {
    pool: PgPool,
}

impl PgStatsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsStore for PgStatsStore {
    async fn insert(&self, stats: &LogStats) -> AppResult<bool> {
        let inserted = sqlx::query(
            "INSERT INTO log_stats (file_id, error_count, warning_count, critical_count, \
             timeout_count, exception_count, unique_ips, keywords, processed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (file_id) DO NOTHING",
        )
        .bind(&stats.file_id)
        .bind(stats.error_count)
        .bind(stats.warning_count)
        .bind(stats.critical_count)
        .bind(stats.timeout_count)
        .bind(stats.exception_count)
        .bind(&stats.unique_ips)
        .bind(&stats.keywords)
        .bind(stats.processed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert stats", e))?;
        Ok(inserted.rows_affected() > 0)
    }

    async fn find_by_file_id(&self, file_id: &str) -> AppResult<Option<LogStats>> {
        sqlx::query_as::<_, LogStats>("SELECT * FROM log_stats WHERE file_id = $1")
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find stats", e))
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<LogStats>> {
        sqlx::query_as::<_, LogStats>(
            "SELECT * FROM log_stats ORDER BY processed_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list stats", e))
    }
}
