//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use loglens_api::AppState;
use loglens_core::config::AppConfig;
use loglens_core::traits::StorageProvider;
use loglens_database::memory::{MemoryJobStore, MemoryStatsStore};
use loglens_database::store::{JobStore, StatsStore};
use loglens_parser::LogParser;
use loglens_ratelimit::backend::MemoryBackend;
use loglens_ratelimit::{RateLimitSettings, SlidingWindowLimiter};
use loglens_realtime::{EventBus, QueueEventBridge};
use loglens_storage::{ChunkStore, LocalStorageProvider};
use loglens_worker::{JobQueue, LogProcessor, QueueMaintenance, WorkerRunner};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application state for direct inspection
    pub state: AppState,
    /// Application config
    pub config: Arc<AppConfig>,
    job_store: Arc<dyn JobStore>,
    _storage_dir: tempfile::TempDir,
}

impl TestApp {
    /// Create a test application with rate limiting disabled.
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a test application from the given configuration.
    ///
    /// Uses in-memory job and stats stores and a temporary directory
    /// for chunk storage, so tests need no external services.
    pub async fn with_config(config: AppConfig) -> Self {
        let storage_dir = tempfile::tempdir().expect("Failed to create temp storage dir");

        let job_store: Arc<dyn JobStore> = Arc::new(MemoryJobStore::new());
        let stats_store: Arc<dyn StatsStore> = Arc::new(MemoryStatsStore::new());

        let root = storage_dir
            .path()
            .to_str()
            .expect("Temp dir path is not valid UTF-8");
        let provider: Arc<dyn StorageProvider> = Arc::new(
            LocalStorageProvider::new(root)
                .await
                .expect("Failed to init local storage"),
        );
        let chunks = ChunkStore::new(provider);

        let queue = Arc::new(JobQueue::new(Arc::clone(&job_store), config.queue.clone()));

        let bus = Arc::new(EventBus::new(config.realtime.subscriber_buffer_size));
        let _bridge = QueueEventBridge::new(Arc::clone(&bus)).spawn(queue.subscribe_events());

        let backend = Arc::new(MemoryBackend::new(1000, Duration::from_secs(60)));
        let limiter = Arc::new(SlidingWindowLimiter::new(
            backend,
            RateLimitSettings::from(&config.rate_limit),
        ));

        let state = AppState {
            config: Arc::new(config),
            queue,
            stats: stats_store,
            chunks,
            bus,
            limiter,
        };

        let router = loglens_api::build_router(state.clone());

        Self {
            router,
            config: Arc::clone(&state.config),
            state,
            job_store,
            _storage_dir: storage_dir,
        }
    }

    /// Spawn a background worker processing this app's queue.
    ///
    /// Returns the shutdown handle; send `true` to stop the worker.
    pub fn spawn_worker(&self) -> (watch::Sender<bool>, JoinHandle<()>) {
        let parser = Arc::new(
            LogParser::new(&self.config.parser).expect("Failed to build parser"),
        );
        let processor = Arc::new(LogProcessor::new(
            self.state.chunks.clone(),
            parser,
            Arc::clone(&self.state.stats),
        ));
        let maintenance =
            QueueMaintenance::new(Arc::clone(&self.job_store), self.config.queue.clone());
        let runner = WorkerRunner::new(
            Arc::clone(&self.state.queue),
            processor,
            maintenance,
            self.config.worker.clone(),
            "test-worker".to_string(),
        );

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            runner.run(rx).await;
        });
        (tx, handle)
    }

    /// Make a JSON HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Upload a file through the multipart endpoint
    pub async fn upload(&self, filename: &str, content: &[u8]) -> TestResponse {
        let boundary = "loglens-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: text/plain\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/api/logs")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .expect("Failed to build upload request");

        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: http::HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The `data` payload of a successful API response.
    pub fn data(&self) -> &Value {
        self.body.get("data").unwrap_or(&Value::Null)
    }
}

/// Configuration tuned for fast tests: in-memory queue, small retry
/// delays, rate limiting off.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.queue.backend = "memory".to_string();
    config.queue.retry_base_delay_ms = 1;
    config.queue.retry_max_delay_ms = 10;
    config.rate_limit.enabled = false;
    config.worker.enabled = false;
    config.worker.poll_interval_ms = 10;
    config.worker.maintenance_interval_seconds = 3600;
    config.worker.shutdown_grace_seconds = 5;
    config
}

/// Poll a job until it reaches the given status or the timeout expires.
pub async fn wait_for_job_status(app: &TestApp, job_id: &str, status: &str) -> Value {
    for _ in 0..500 {
        let response = app.request("GET", &format!("/api/jobs/{job_id}"), None).await;
        if response.status == StatusCode::OK {
            let job = response.data().clone();
            if job.get("status").and_then(Value::as_str) == Some(status) {
                return job;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("Job {job_id} never reached status '{status}'");
}
