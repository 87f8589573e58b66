//! Parsed log statistics endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use loglens_core::error::AppError;
use serde::Deserialize;

use crate::dto::{ApiResponse, StatsResponse};
use crate::error::ApiError;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct ListStatsQuery {
    pub limit: Option<i64>,
}

pub async fn list_stats(
    State(state): State<AppState>,
    Query(query): Query<ListStatsQuery>,
) -> Result<Json<ApiResponse<Vec<StatsResponse>>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let stats = state.stats.list_recent(limit).await?;
    let responses = stats.into_iter().map(StatsResponse::from).collect();
    Ok(Json(ApiResponse::ok(responses)))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Json<ApiResponse<StatsResponse>>, ApiError> {
    let stats = state
        .stats
        .find_by_file_id(&file_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No statistics found for file {file_id}")))?;
    Ok(Json(ApiResponse::ok(StatsResponse::from(stats))))
}
