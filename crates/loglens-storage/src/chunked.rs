//! Chunk naming and lifecycle on top of a storage provider.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use loglens_core::result::AppResult;
use loglens_core::traits::storage::StorageProvider;

/// Names and tracks upload chunks on a [`StorageProvider`].
///
/// Chunks of an upload are stored under `{file_id}_part{index}` with
/// zero-based sequential indices.
#[derive(Debug, Clone)]
pub struct ChunkStore {
    provider: Arc<dyn StorageProvider>,
}

impl ChunkStore {
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// Storage key of one chunk.
    pub fn chunk_key(file_id: &str, index: i32) -> String {
        format!("{file_id}_part{index}")
    }

    /// Write one chunk.
    pub async fn write_chunk(&self, file_id: &str, index: i32, data: Bytes) -> AppResult<()> {
        self.provider.put(&Self::chunk_key(file_id, index), data).await
    }

    /// Read one chunk. Returns a not-found error when the chunk was
    /// never written or has been deleted.
    pub async fn read_chunk(&self, file_id: &str, index: i32) -> AppResult<Bytes> {
        self.provider.get(&Self::chunk_key(file_id, index)).await
    }

    /// Check whether one chunk exists.
    pub async fn chunk_exists(&self, file_id: &str, index: i32) -> AppResult<bool> {
        self.provider.exists(&Self::chunk_key(file_id, index)).await
    }

    /// Delete all chunks of an upload. Missing chunks are skipped.
    pub async fn delete_all(&self, file_id: &str, total_chunks: i32) -> AppResult<()> {
        for index in 0..total_chunks {
            self.provider.delete(&Self::chunk_key(file_id, index)).await?;
        }
        debug!(file_id, total_chunks, "Deleted upload chunks");
        Ok(())
    }

    /// Health of the underlying provider.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.provider.health_check().await
    }

    /// Name of the underlying provider.
    pub fn provider_type(&self) -> &str {
        self.provider.provider_type()
    }
}
