//! Core trait definitions implemented by backend crates.

pub mod storage;

pub use storage::StorageProvider;
