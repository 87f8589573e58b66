//! Log file upload endpoint.

use axum::Json;
use axum::extract::{Multipart, State};
use bytes::Bytes;
use loglens_core::error::AppError;
use loglens_entity::job::LogFilePayload;
use loglens_storage::ChunkStore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::{ApiResponse, UploadResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Accept a log file, split it into chunks, and enqueue a processing job.
///
/// The file is stored chunk by chunk before the job is created so a
/// worker never claims a job whose content is still being written.
pub async fn upload_log(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, ApiError> {
    let (filename, data) = read_file_field(&mut multipart).await?;

    if data.is_empty() {
        return Err(AppError::validation("Uploaded file is empty").into());
    }

    let size_bytes = data.len() as i64;
    let max_size = state.config.storage.max_upload_size_bytes as i64;
    if size_bytes > max_size {
        return Err(AppError::validation(format!(
            "File exceeds the maximum upload size of {max_size} bytes"
        ))
        .into());
    }

    let file_id = Uuid::new_v4().to_string();
    let chunk_size = state.config.storage.chunk_size_bytes.max(1);
    let total_chunks = write_chunks(&state.chunks, &file_id, &data, chunk_size).await?;

    let payload = LogFilePayload {
        file_id: file_id.clone(),
        filename,
        total_chunks,
        size_bytes,
    };
    let job = match state.queue.enqueue(&payload).await {
        Ok(job) => job,
        Err(err) => {
            // Orphaned chunks would never be cleaned up by a worker.
            if let Err(cleanup_err) = state.chunks.delete_all(&file_id, total_chunks).await {
                warn!(file_id, error = %cleanup_err, "Failed to clean up chunks after enqueue error");
            }
            return Err(err.into());
        }
    };

    info!(
        job_id = %job.id,
        file_id,
        filename = %payload.filename,
        total_chunks,
        size_bytes,
        "Log file accepted for processing"
    );

    Ok(Json(ApiResponse::ok(UploadResponse {
        job_id: job.id,
        file_id,
        total_chunks,
        size_bytes,
    })))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
    {
        let is_file = field.name() == Some("file") || field.file_name().is_some();
        if !is_file {
            continue;
        }

        let filename = field
            .file_name()
            .map(ToString::to_string)
            .unwrap_or_else(|| "upload.log".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Failed to read uploaded file: {e}")))?;
        return Ok((filename, data));
    }

    Err(AppError::validation("Missing 'file' field in multipart request").into())
}

async fn write_chunks(
    chunks: &ChunkStore,
    file_id: &str,
    data: &Bytes,
    chunk_size: usize,
) -> Result<i32, ApiError> {
    let mut index = 0i32;
    for chunk in data.chunks(chunk_size) {
        let piece = data.slice_ref(chunk);
        if let Err(err) = chunks.write_chunk(file_id, index, piece).await {
            // Include the chunk that just failed; it may exist partially.
            if let Err(cleanup_err) = chunks.delete_all(file_id, index + 1).await {
                warn!(file_id, error = %cleanup_err, "Failed to clean up partial upload");
            }
            return Err(err.into());
        }
        index += 1;
    }
    Ok(index)
}
