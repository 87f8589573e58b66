//! # loglens-database
//!
//! Persistence for jobs and log statistics. The [`store::JobStore`] and
//! [`store::StatsStore`] traits are implemented twice: against
//! PostgreSQL ([`repositories`]) and fully in memory ([`memory`]) for
//! single-node deployments and tests. The backend is selected by the
//! `queue.backend` configuration key.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{JobStore, StatsStore};
