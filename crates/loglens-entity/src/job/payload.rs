//! Typed job payload definitions.

use serde::{Deserialize, Serialize};

/// Payload of a log-file processing job.
///
/// The uploaded file is stored as `total_chunks` sequential chunks
/// keyed by `file_id` before the job is enqueued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilePayload {
    /// Identifier of the stored upload.
    pub file_id: String,
    /// Original filename as submitted by the client.
    pub filename: String,
    /// Number of stored chunks.
    pub total_chunks: i32,
    /// Total upload size in bytes.
    pub size_bytes: i64,
}

impl LogFilePayload {
    /// Priority derived from upload size: one unit per started MiB,
    /// so smaller files are dequeued first.
    pub fn priority_for_size(size_bytes: i64) -> i32 {
        const MIB: u64 = 1024 * 1024;
        let started_mib = (size_bytes.max(1) as u64).div_ceil(MIB);
        started_mib.min(i32::MAX as u64) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_scales_per_started_mib() {
        assert_eq!(LogFilePayload::priority_for_size(-1), 1);
        assert_eq!(LogFilePayload::priority_for_size(0), 1);
        assert_eq!(LogFilePayload::priority_for_size(1), 1);
        assert_eq!(LogFilePayload::priority_for_size(1024 * 1024), 1);
        assert_eq!(LogFilePayload::priority_for_size(1024 * 1024 + 1), 2);
        assert_eq!(LogFilePayload::priority_for_size(10 * 1024 * 1024), 10);
    }
}
