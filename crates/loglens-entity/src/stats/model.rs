//! Log statistics entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Aggregated statistics extracted from one processed log file.
///
/// `file_id` is the primary key; repeated inserts for the same file
/// are ignored so a re-run attempt cannot duplicate results.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LogStats {
    /// Identifier of the processed upload.
    pub file_id: String,
    /// Occurrences of "error" plus structured lines at ERROR level.
    pub error_count: i64,
    /// Occurrences of "warning".
    pub warning_count: i64,
    /// Occurrences of "critical".
    pub critical_count: i64,
    /// Occurrences of "timeout".
    pub timeout_count: i64,
    /// Occurrences of "exception".
    pub exception_count: i64,
    /// Distinct IPv4 addresses seen in the file, sorted.
    pub unique_ips: Vec<String>,
    /// Full per-keyword counts (JSON object, keyword -> count).
    pub keywords: serde_json::Value,
    /// When processing finished.
    pub processed_at: DateTime<Utc>,
}
