//! In-memory store implementations for single-node use and tests.

pub mod job;
pub mod stats;

pub use job::MemoryJobStore;
pub use stats::MemoryStatsStore;
