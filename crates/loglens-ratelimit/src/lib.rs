//! # loglens-ratelimit
//!
//! Sliding-window request rate limiting. The window state lives behind
//! [`backend::RateLimitBackend`] with a process-local implementation
//! (moka) and a Redis implementation for multi-node deployments.
//! Backend failures admit the request (fail open).

pub mod backend;
pub mod keys;
pub mod limiter;

pub use limiter::{RateLimitDecision, RateLimitSettings, SlidingWindowLimiter};
