//! Realtime event fan-out configuration.

use serde::{Deserialize, Serialize};

/// Event bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Per-subscriber buffered event capacity. A subscriber whose
    /// buffer is full is dropped rather than blocking publishers.
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            subscriber_buffer_size: default_subscriber_buffer(),
        }
    }
}

fn default_subscriber_buffer() -> usize {
    64
}
