//! # loglens-realtime
//!
//! Fan-out of [`loglens_core::events::ProcessingEvent`]s to live
//! subscribers. The [`bus::EventBus`] delivers to each subscriber over
//! a bounded channel; [`bridge::QueueEventBridge`] translates raw queue
//! transitions into the human-readable events subscribers see.

pub mod bridge;
pub mod bus;
pub mod subscriber;

pub use bridge::QueueEventBridge;
pub use bus::{EventBus, Subscription};
