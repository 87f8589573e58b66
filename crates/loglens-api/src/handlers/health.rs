//! Health check endpoint.

use axum::Json;
use axum::extract::State;

use crate::dto::HealthResponse;
use crate::state::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let queue_ok = state.queue.health_check().await.unwrap_or(false);
    let storage_ok = state.chunks.health_check().await.unwrap_or(false);

    let status = if queue_ok && storage_ok { "ok" } else { "degraded" };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        queue: component_status(queue_ok),
        storage: component_status(storage_ok),
    })
}

fn component_status(healthy: bool) -> String {
    if healthy { "up" } else { "down" }.to_string()
}
