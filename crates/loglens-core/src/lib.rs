//! # loglens-core
//!
//! Core crate for LogLens. Contains configuration schemas, the typed
//! queue/processing event definitions, the storage trait seam, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other LogLens crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
