//! PostgreSQL-backed store implementations.

pub mod job;
pub mod stats;

pub use job::PgJobStore;
pub use stats::PgStatsStore;
