//! Integration tests for the statistics endpoints.

use http::StatusCode;
use serde_json::Value;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_list_stats_empty() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/stats", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data().as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_get_unknown_stats_returns_404() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/stats/no-such-file", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stats_listed_after_processing() {
    let app = TestApp::new().await;
    let (shutdown, worker) = app.spawn_worker();

    let mut file_ids = Vec::new();
    for i in 0..2 {
        let upload = app
            .upload(
                &format!("file-{i}.log"),
                b"ERROR disk failure at 172.16.0.9\ncritical fault\n",
            )
            .await;
        assert_eq!(upload.status, StatusCode::OK);
        let job_id = upload.data()["job_id"].as_str().unwrap().to_string();
        file_ids.push(upload.data()["file_id"].as_str().unwrap().to_string());
        helpers::wait_for_job_status(&app, &job_id, "completed").await;
    }

    let response = app.request("GET", "/api/stats", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let listed = response.data().as_array().unwrap();
    assert_eq!(listed.len(), 2);

    for file_id in &file_ids {
        let response = app
            .request("GET", &format!("/api/stats/{file_id}"), None)
            .await;
        assert_eq!(response.status, StatusCode::OK);
        let stats = response.data();
        assert_eq!(stats.get("file_id").and_then(Value::as_str), Some(file_id.as_str()));
        assert_eq!(stats.get("critical_count").and_then(Value::as_i64), Some(1));
        assert_eq!(
            stats.get("unique_ips").and_then(Value::as_array).map(Vec::len),
            Some(1)
        );
    }

    let _ = shutdown.send(true);
    let _ = worker.await;
}

#[tokio::test]
async fn test_list_stats_respects_limit() {
    let app = TestApp::new().await;
    let (shutdown, worker) = app.spawn_worker();

    for i in 0..3 {
        let upload = app.upload(&format!("f{i}.log"), b"warning slow query\n").await;
        let job_id = upload.data()["job_id"].as_str().unwrap().to_string();
        helpers::wait_for_job_status(&app, &job_id, "completed").await;
    }

    let response = app.request("GET", "/api/stats?limit=2", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data().as_array().map(Vec::len), Some(2));

    let _ = shutdown.send(true);
    let _ = worker.await;
}
