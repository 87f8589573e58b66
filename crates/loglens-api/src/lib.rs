//! # loglens-api
//!
//! The HTTP boundary of LogLens: multipart log ingestion, queue and
//! statistics queries, the WebSocket event stream, and the rate-limit
//! and CORS middleware around them.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
