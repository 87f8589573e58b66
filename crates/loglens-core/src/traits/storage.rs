//! Storage provider trait for pluggable chunk storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for chunk storage backends.
///
/// The [`StorageProvider`] trait is defined here in `loglens-core` and
/// implemented in `loglens-storage`. Keys are opaque to the provider;
/// chunk naming is handled by the layer above.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and writable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write bytes under the given key, replacing any existing object.
    async fn put(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Read the object stored under the given key into memory.
    async fn get(&self, key: &str) -> AppResult<Bytes>;

    /// Delete the object stored under the given key.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether an object exists under the given key.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}
