//! Job queue transition events.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary of a successfully processed log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionDetails {
    /// Identifier of the processed file.
    pub file_id: String,
    /// Per-keyword occurrence counts.
    pub keywords: BTreeMap<String, u64>,
    /// Distinct IPv4 addresses seen in the file, sorted.
    pub unique_ips: Vec<String>,
}

/// State transition of a job in the queue.
///
/// Every transition names the job it concerns. Events are broadcast on
/// a best-effort channel; subscribers that lag may miss transitions but
/// never observe them out of order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueueEvent {
    /// Job accepted and waiting for a worker.
    Waiting { job_id: Uuid },
    /// Job claimed by a worker and started.
    Active { job_id: Uuid, attempt: i32 },
    /// Job reported progress (0..=100).
    Progress { job_id: Uuid, progress: i32 },
    /// Job finished successfully.
    Completed {
        job_id: Uuid,
        details: CompletionDetails,
    },
    /// Job attempt failed.
    Failed {
        job_id: Uuid,
        error: String,
        /// Whether another attempt is scheduled.
        will_retry: bool,
    },
}

impl QueueEvent {
    /// Identifier of the job this event concerns.
    pub fn job_id(&self) -> Uuid {
        match self {
            Self::Waiting { job_id }
            | Self::Active { job_id, .. }
            | Self::Progress { job_id, .. }
            | Self::Completed { job_id, .. }
            | Self::Failed { job_id, .. } => *job_id,
        }
    }
}
