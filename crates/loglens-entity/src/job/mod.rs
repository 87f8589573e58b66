//! Job queue domain entities.

pub mod model;
pub mod payload;
pub mod status;

pub use model::{Job, JobCounts};
pub use payload::LogFilePayload;
pub use status::JobStatus;
