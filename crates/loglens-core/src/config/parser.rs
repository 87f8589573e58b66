//! Log parser configuration.

use serde::{Deserialize, Serialize};

/// Log parsing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Keywords counted across the whole file (whole-word,
    /// case-insensitive).
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Minimum number of lines between progress callbacks.
    #[serde(default = "default_progress_interval")]
    pub progress_interval_lines: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            progress_interval_lines: default_progress_interval(),
        }
    }
}

fn default_keywords() -> Vec<String> {
    ["error", "warning", "critical", "timeout", "exception"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_progress_interval() -> u64 {
    1000
}
