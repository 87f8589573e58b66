//! Integration tests for queue status and job lookup endpoints.

use http::StatusCode;
use serde_json::Value;
use uuid::Uuid;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_queue_status_reflects_enqueued_jobs() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/queue/status", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data().get("waiting").and_then(Value::as_i64), Some(0));

    for i in 0..3 {
        let upload = app
            .upload(&format!("file-{i}.log"), b"ERROR something broke\n")
            .await;
        assert_eq!(upload.status, StatusCode::OK);
    }

    let response = app.request("GET", "/api/queue/status", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let data = response.data();
    assert_eq!(data.get("waiting").and_then(Value::as_i64), Some(3));
    assert_eq!(data.get("active").and_then(Value::as_i64), Some(0));
    assert_eq!(data.get("completed").and_then(Value::as_i64), Some(0));
    assert_eq!(data.get("failed").and_then(Value::as_i64), Some(0));
}

#[tokio::test]
async fn test_get_job_returns_queue_state() {
    let app = TestApp::new().await;

    let upload = app.upload("app.log", b"a line\n").await;
    let job_id = upload.data()["job_id"].as_str().unwrap().to_string();

    let response = app.request("GET", &format!("/api/jobs/{job_id}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    let job = response.data();
    assert_eq!(job.get("status").and_then(Value::as_str), Some("waiting"));
    assert_eq!(job.get("progress").and_then(Value::as_i64), Some(0));
    assert_eq!(job.get("attempts").and_then(Value::as_i64), Some(0));
    assert!(job.get("enqueued_at").and_then(Value::as_str).is_some());
    assert!(job.get("started_at").unwrap().is_null());
}

#[tokio::test]
async fn test_get_unknown_job_returns_404() {
    let app = TestApp::new().await;

    let response = app
        .request("GET", &format!("/api/jobs/{}", Uuid::new_v4()), None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_job_rejects_malformed_id() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/jobs/not-a-uuid", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
