//! Log-processing job execution.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::debug;

use loglens_core::error::{AppError, ErrorKind};
use loglens_core::events::CompletionDetails;
use loglens_database::store::StatsStore;
use loglens_entity::job::{Job, LogFilePayload};
use loglens_entity::stats::LogStats;
use loglens_parser::{LogParser, ParseStats};
use loglens_storage::ChunkStore;

use crate::queue::JobQueue;

/// Error from job execution.
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure, do not retry.
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure, may retry.
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

/// Trait for job processor implementations.
#[async_trait]
pub trait JobProcessor: Send + Sync + std::fmt::Debug {
    /// Execute one claimed job, reporting progress through the queue.
    async fn process(
        &self,
        job: &Job,
        queue: &JobQueue,
    ) -> Result<CompletionDetails, JobExecutionError>;
}

/// The log-file processor: retrieves chunks, parses, persists stats.
///
/// Progress bands: chunk retrieval 0-30, parsing 30-90, persistence
/// 90-100. Every reported value is non-decreasing.
#[derive(Debug, Clone)]
pub struct LogProcessor {
    chunks: ChunkStore,
    parser: Arc<LogParser>,
    stats: Arc<dyn StatsStore>,
}

impl LogProcessor {
    pub fn new(chunks: ChunkStore, parser: Arc<LogParser>, stats: Arc<dyn StatsStore>) -> Self {
        Self {
            chunks,
            parser,
            stats,
        }
    }

    async fn retrieve_content(
        &self,
        job: &Job,
        payload: &LogFilePayload,
        queue: &JobQueue,
    ) -> Result<String, JobExecutionError> {
        let mut content = Vec::with_capacity(payload.size_bytes.max(0) as usize);
        for index in 0..payload.total_chunks {
            let chunk = self
                .chunks
                .read_chunk(&payload.file_id, index)
                .await
                .map_err(|e| match e.kind {
                    // A missing chunk cannot reappear on retry.
                    ErrorKind::NotFound => JobExecutionError::Permanent(format!(
                        "Chunk {index} of file {} is missing",
                        payload.file_id
                    )),
                    _ => JobExecutionError::Transient(format!(
                        "Failed to read chunk {index} of file {}: {e}",
                        payload.file_id
                    )),
                })?;
            content.extend_from_slice(&chunk);

            let percent = (index + 1) * 30 / payload.total_chunks.max(1);
            queue.report_progress(job.id, percent).await?;
        }
        Ok(String::from_utf8_lossy(&content).into_owned())
    }

    async fn parse_content(
        &self,
        job: &Job,
        content: String,
        queue: &JobQueue,
    ) -> Result<ParseStats, JobExecutionError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<i32>();
        let parser = Arc::clone(&self.parser);

        let parse_task = tokio::task::spawn_blocking(move || {
            parser.parse_with_progress(&content, |progress| {
                let _ = tx.send(progress.percent);
            })
        });

        // The sender drops when parsing finishes, ending this loop.
        while let Some(percent) = rx.recv().await {
            let mapped = 30 + percent.clamp(0, 100) * 60 / 100;
            queue.report_progress(job.id, mapped).await?;
        }

        parse_task
            .await
            .map_err(|e| AppError::internal(format!("Parser task panicked: {e}")).into())
    }
}

#[async_trait]
impl JobProcessor for LogProcessor {
    async fn process(
        &self,
        job: &Job,
        queue: &JobQueue,
    ) -> Result<CompletionDetails, JobExecutionError> {
        let payload: LogFilePayload = serde_json::from_value(job.payload.clone())
            .map_err(|e| JobExecutionError::Permanent(format!("Malformed job payload: {e}")))?;

        let content = self.retrieve_content(job, &payload, queue).await?;
        let parsed = self.parse_content(job, content, queue).await?;
        queue.report_progress(job.id, 90).await?;

        let stats = LogStats {
            file_id: payload.file_id.clone(),
            error_count: parsed.error_total() as i64,
            warning_count: parsed.keyword("warning") as i64,
            critical_count: parsed.keyword("critical") as i64,
            timeout_count: parsed.keyword("timeout") as i64,
            exception_count: parsed.keyword("exception") as i64,
            unique_ips: parsed.unique_ips.iter().cloned().collect(),
            keywords: serde_json::to_value(&parsed.keywords).map_err(AppError::from)?,
            processed_at: Utc::now(),
        };

        let inserted = self
            .stats
            .insert(&stats)
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Failed to persist stats: {e}")))?;
        if !inserted {
            debug!(file_id = %payload.file_id, "Stats already recorded for file");
        }

        Ok(CompletionDetails {
            file_id: payload.file_id,
            keywords: parsed.keywords,
            unique_ips: stats.unique_ips,
        })
    }
}
