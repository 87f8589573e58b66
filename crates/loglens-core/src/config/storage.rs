//! Upload storage configuration.

use serde::{Deserialize, Serialize};

/// Chunked upload storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage provider type. Only `"local"` is supported.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Size of a stored chunk in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size_bytes: usize,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_bytes: usize,
    /// Local filesystem provider settings.
    #[serde(default)]
    pub local: LocalStorageConfig,
}

/// Local filesystem provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root directory for stored chunks.
    #[serde(default = "default_root_path")]
    pub root_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            chunk_size_bytes: default_chunk_size(),
            max_upload_size_bytes: default_max_upload_size(),
            local: LocalStorageConfig::default(),
        }
    }
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_chunk_size() -> usize {
    5 * 1024 * 1024
}

fn default_max_upload_size() -> usize {
    512 * 1024 * 1024
}

fn default_root_path() -> String {
    "./data/chunks".to_string()
}
