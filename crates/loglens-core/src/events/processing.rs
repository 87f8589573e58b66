//! Processing events delivered to realtime subscribers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::queue::CompletionDetails;

/// Severity of a [`ProcessingEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A human-readable pipeline event as delivered to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingEvent {
    /// Event severity.
    pub kind: EventKind,
    /// Human-readable description.
    pub message: String,
    /// Time the event was produced.
    pub timestamp: DateTime<Utc>,
    /// Completion percentage, when the event carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    /// Result summary, present on completion events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<CompletionDetails>,
}

impl ProcessingEvent {
    pub fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: Utc::now(),
            progress: None,
            details: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(EventKind::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(EventKind::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(EventKind::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(EventKind::Error, message)
    }

    pub fn with_progress(mut self, progress: i32) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_details(mut self, details: CompletionDetails) -> Self {
        self.details = Some(details);
        self
    }
}
