//! HTTP route assembly.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handlers::{health, queue, stats, upload, ws};
use crate::middleware::{cors::build_cors_layer, rate_limit};
use crate::state::AppState;

/// Build the complete application router.
pub fn build_router(state: AppState) -> Router {
    let mut api = Router::new()
        .route("/logs", post(upload::upload_log))
        .route("/queue/status", get(queue::queue_status))
        .route("/jobs/{id}", get(queue::get_job))
        .route("/stats", get(stats::list_stats))
        .route("/stats/{file_id}", get(stats::get_stats))
        .route("/health", get(health::health_check));

    if state.config.rate_limit.enabled {
        api = api.layer(from_fn_with_state(state.clone(), rate_limit::enforce));
    }

    // Headroom over the file limit for the multipart envelope.
    let max_body = state.config.storage.max_upload_size_bytes + 64 * 1024;

    Router::new()
        .nest("/api", api)
        .route("/ws", get(ws::ws_events))
        .route("/health", get(health::health_check))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config.server.cors))
        .with_state(state)
}
