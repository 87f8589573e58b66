//! Aggregate parse results.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Aggregate statistics for one parsed log file.
///
/// Ordered collections keep serialization deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Per-keyword occurrence counts (whole-word, case-insensitive).
    pub keywords: BTreeMap<String, u64>,
    /// Structured lines whose level field equals "error".
    pub level_errors: u64,
    /// Distinct IPv4-shaped substrings seen anywhere in the file.
    pub unique_ips: BTreeSet<String>,
    /// Non-empty lines processed.
    pub lines: u64,
}

impl ParseStats {
    /// Count for a single keyword, zero when untracked.
    pub fn keyword(&self, keyword: &str) -> u64 {
        self.keywords.get(keyword).copied().unwrap_or(0)
    }

    /// Total error signal: the "error" keyword count plus structured
    /// lines at error level. The two sources are additive, so a line
    /// `[ts] ERROR error occurred` contributes twice.
    pub fn error_total(&self) -> u64 {
        self.keyword("error") + self.level_errors
    }
}
