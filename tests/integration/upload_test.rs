//! Integration tests for log upload and end-to-end processing.

use http::StatusCode;
use serde_json::Value;

use crate::helpers::{self, TestApp};

const SAMPLE_LOG: &str = "\
[2024-01-01T10:00:00] INFO Service started\n\
[2024-01-01T10:00:01] ERROR Connection refused from 192.168.1.50\n\
Request timeout after 30s from 10.0.0.7\n\
[2024-01-01T10:00:03] WARN Disk warning threshold reached\n\
Unhandled exception in request handler\n";

#[tokio::test]
async fn test_upload_accepts_log_file() {
    let app = TestApp::new().await;

    let response = app.upload("app.log", SAMPLE_LOG.as_bytes()).await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let data = response.data();
    assert!(data.get("job_id").and_then(Value::as_str).is_some());
    assert!(data.get("file_id").and_then(Value::as_str).is_some());
    assert_eq!(data.get("total_chunks").and_then(Value::as_i64), Some(1));
    assert_eq!(
        data.get("size_bytes").and_then(Value::as_i64),
        Some(SAMPLE_LOG.len() as i64)
    );
}

#[tokio::test]
async fn test_upload_rejects_empty_file() {
    let app = TestApp::new().await;

    let response = app.upload("empty.log", b"").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_rejects_missing_file_field() {
    let app = TestApp::new().await;

    let response = app.request("POST", "/api/logs", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_rejects_oversized_file() {
    let mut config = helpers::test_config();
    config.storage.max_upload_size_bytes = 16;
    let app = TestApp::with_config(config).await;

    let response = app.upload("big.log", SAMPLE_LOG.as_bytes()).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_is_processed_end_to_end() {
    let app = TestApp::new().await;
    let (shutdown, worker) = app.spawn_worker();

    let response = app.upload("app.log", SAMPLE_LOG.as_bytes()).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let job_id = response.data()["job_id"].as_str().unwrap().to_string();
    let file_id = response.data()["file_id"].as_str().unwrap().to_string();

    let job = helpers::wait_for_job_status(&app, &job_id, "completed").await;
    assert_eq!(job.get("progress").and_then(Value::as_i64), Some(100));

    let response = app
        .request("GET", &format!("/api/stats/{file_id}"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let stats = response.data();
    // "ERROR" counts once as a keyword and once as a structured level
    assert_eq!(stats.get("error_count").and_then(Value::as_i64), Some(2));
    assert_eq!(stats.get("warning_count").and_then(Value::as_i64), Some(1));
    assert_eq!(stats.get("timeout_count").and_then(Value::as_i64), Some(1));
    assert_eq!(stats.get("exception_count").and_then(Value::as_i64), Some(1));
    assert_eq!(
        stats.get("unique_ips").and_then(Value::as_array).map(Vec::len),
        Some(2)
    );

    let _ = shutdown.send(true);
    let _ = worker.await;
}

#[tokio::test]
async fn test_multi_chunk_upload_is_reassembled() {
    let mut config = helpers::test_config();
    config.storage.chunk_size_bytes = 32;
    let app = TestApp::with_config(config).await;
    let (shutdown, worker) = app.spawn_worker();

    let response = app.upload("app.log", SAMPLE_LOG.as_bytes()).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let data = response.data();
    assert!(data["total_chunks"].as_i64().unwrap() > 1);
    let job_id = data["job_id"].as_str().unwrap().to_string();
    let file_id = data["file_id"].as_str().unwrap().to_string();

    helpers::wait_for_job_status(&app, &job_id, "completed").await;

    // Chunk boundaries must not change what the parser sees.
    let response = app
        .request("GET", &format!("/api/stats/{file_id}"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.data().get("error_count").and_then(Value::as_i64),
        Some(2)
    );

    let _ = shutdown.send(true);
    let _ = worker.await;
}
