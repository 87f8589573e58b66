//! # loglens-worker
//!
//! The processing half of the pipeline:
//! - A durable job queue with retry scheduling and transition events
//! - A worker runner that polls for jobs under a concurrency bound
//! - The log processor that turns stored chunks into statistics
//! - Queue maintenance (retention pruning, lease recovery)

pub mod maintenance;
pub mod processor;
pub mod queue;
pub mod runner;

pub use maintenance::QueueMaintenance;
pub use processor::{JobExecutionError, JobProcessor, LogProcessor};
pub use queue::JobQueue;
pub use runner::WorkerRunner;
