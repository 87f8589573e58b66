//! Queue inspection endpoints.

use axum::Json;
use axum::extract::{Path, State};
use loglens_core::error::AppError;
use uuid::Uuid;

use crate::dto::{ApiResponse, JobResponse, QueueStatusResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn queue_status(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<QueueStatusResponse>>, ApiError> {
    let counts = state.queue.counts().await?;
    Ok(Json(ApiResponse::ok(QueueStatusResponse::from(counts))))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ApiResponse<JobResponse>>, ApiError> {
    let job = state
        .queue
        .find(job_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Job {job_id} not found")))?;
    Ok(Json(ApiResponse::ok(JobResponse::from(job))))
}
