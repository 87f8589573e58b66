//! Event types published by the pipeline.
//!
//! [`queue::QueueEvent`] describes job state transitions at the queue
//! boundary; [`processing::ProcessingEvent`] is the human-readable form
//! delivered to realtime subscribers.

pub mod processing;
pub mod queue;

pub use processing::{EventKind, ProcessingEvent};
pub use queue::{CompletionDetails, QueueEvent};
