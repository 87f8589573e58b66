//! LogLens Server — Log File Analysis Pipeline
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use loglens_core::config::AppConfig;
use loglens_core::error::AppError;
use loglens_core::traits::StorageProvider;
use loglens_database::store::{JobStore, StatsStore};
use loglens_ratelimit::backend::RateLimitBackend;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("LOGLENS_ENV").unwrap_or_else(|_| "default".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting LogLens v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Job and stats stores ─────────────────────────────
    let (job_store, stats_store) = build_stores(&config).await?;

    // ── Step 2: Chunk storage ────────────────────────────────────
    tracing::info!(
        "Initializing storage (provider: {})...",
        config.storage.provider
    );
    let provider: Arc<dyn StorageProvider> = Arc::new(
        loglens_storage::LocalStorageProvider::new(&config.storage.local.root_path).await?,
    );
    let chunks = loglens_storage::ChunkStore::new(provider);
    tracing::info!("Storage initialized");

    // ── Step 3: Job queue ────────────────────────────────────────
    let queue = Arc::new(loglens_worker::JobQueue::new(
        Arc::clone(&job_store),
        config.queue.clone(),
    ));

    // ── Step 4: Event bus + queue event bridge ───────────────────
    let bus = Arc::new(loglens_realtime::EventBus::new(
        config.realtime.subscriber_buffer_size,
    ));
    let bridge = loglens_realtime::QueueEventBridge::new(Arc::clone(&bus));
    let bridge_handle = bridge.spawn(queue.subscribe_events());

    // ── Step 5: Rate limiter ─────────────────────────────────────
    let limiter = build_limiter(&config).await?;

    // ── Step 6: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 7: Background worker ────────────────────────────────
    let worker_handle = if config.worker.enabled {
        tracing::info!("Starting background worker...");

        let worker_id = format!("worker-{}", &uuid::Uuid::new_v4().to_string()[..8]);

        let parser = Arc::new(loglens_parser::LogParser::new(&config.parser)?);
        let processor = Arc::new(loglens_worker::LogProcessor::new(
            chunks.clone(),
            parser,
            Arc::clone(&stats_store),
        ));
        let maintenance =
            loglens_worker::QueueMaintenance::new(Arc::clone(&job_store), config.queue.clone());
        let runner = loglens_worker::WorkerRunner::new(
            Arc::clone(&queue),
            processor,
            maintenance,
            config.worker.clone(),
            worker_id,
        );

        let worker_cancel = shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            runner.run(worker_cancel).await;
        });

        tracing::info!("Background worker started");
        Some(handle)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 8: Build and start HTTP server ──────────────────────
    tracing::info!(
        "Starting HTTP server on {}:{}...",
        config.server.host,
        config.server.port
    );

    let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let app_state = loglens_api::AppState {
        config: Arc::new(config),
        queue,
        stats: stats_store,
        chunks,
        bus,
        limiter,
    };

    let app = loglens_api::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("LogLens server listening on {}", addr);

    // ── Step 9: Graceful shutdown ────────────────────────────────
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 10: Wait for background tasks ───────────────────────
    tracing::info!("Waiting for background tasks to complete...");

    if let Some(handle) = worker_handle {
        let _ = tokio::time::timeout(grace, handle).await;
    }
    bridge_handle.abort();

    tracing::info!("LogLens server shut down gracefully");
    Ok(())
}

/// Build the job and stats stores for the configured queue backend.
async fn build_stores(
    config: &AppConfig,
) -> Result<(Arc<dyn JobStore>, Arc<dyn StatsStore>), AppError> {
    match config.queue.backend.as_str() {
        "postgres" => {
            tracing::info!("Connecting to database...");
            let db = loglens_database::DatabasePool::connect(&config.database).await?;

            tracing::info!("Running database migrations...");
            loglens_database::migration::run_migrations(db.pool()).await?;
            tracing::info!("Database migrations complete");

            let jobs: Arc<dyn JobStore> = Arc::new(
                loglens_database::repositories::job::PgJobStore::new(db.pool().clone()),
            );
            let stats: Arc<dyn StatsStore> = Arc::new(
                loglens_database::repositories::stats::PgStatsStore::new(db.pool().clone()),
            );
            Ok((jobs, stats))
        }
        "memory" => {
            tracing::info!("Using in-memory job queue (jobs do not survive restarts)");
            let jobs: Arc<dyn JobStore> =
                Arc::new(loglens_database::memory::MemoryJobStore::new());
            let stats: Arc<dyn StatsStore> =
                Arc::new(loglens_database::memory::MemoryStatsStore::new());
            Ok((jobs, stats))
        }
        other => Err(AppError::configuration(format!(
            "Unknown queue backend '{}', expected 'postgres' or 'memory'",
            other
        ))),
    }
}

/// Build the rate limiter for the configured backend.
async fn build_limiter(
    config: &AppConfig,
) -> Result<Arc<loglens_ratelimit::SlidingWindowLimiter>, AppError> {
    let settings = loglens_ratelimit::RateLimitSettings::from(&config.rate_limit);

    let backend: Arc<dyn RateLimitBackend> = match config.rate_limit.backend.as_str() {
        "redis" => {
            tracing::info!("Connecting to Redis rate-limit backend...");
            Arc::new(
                loglens_ratelimit::backend::RedisBackend::connect(&config.rate_limit.redis).await?,
            )
        }
        "memory" => Arc::new(loglens_ratelimit::backend::MemoryBackend::new(
            10_000,
            std::time::Duration::from_millis(config.rate_limit.window_ms * 2),
        )),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown rate limit backend '{}', expected 'memory' or 'redis'",
                other
            )));
        }
    };

    Ok(Arc::new(loglens_ratelimit::SlidingWindowLimiter::new(
        backend, settings,
    )))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
