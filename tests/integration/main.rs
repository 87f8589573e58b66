//! Integration test harness.

pub mod helpers;

mod health_test;
mod queue_test;
mod rate_limit_test;
mod stats_test;
mod upload_test;
mod ws_test;
