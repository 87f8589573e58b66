//! Request and response DTOs.

pub mod response;

pub use response::{
    ApiResponse, HealthResponse, JobResponse, QueueStatusResponse, StatsResponse, UploadResponse,
};
