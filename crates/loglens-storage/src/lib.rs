//! # loglens-storage
//!
//! Chunk storage for uploaded log files. The API splits uploads into
//! fixed-size chunks; [`chunked::ChunkStore`] names and tracks them on
//! top of a [`loglens_core::traits::StorageProvider`] backend.

pub mod chunked;
pub mod local;

pub use chunked::ChunkStore;
pub use local::LocalStorageProvider;
