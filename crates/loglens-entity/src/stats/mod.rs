//! Log statistics domain entities.

pub mod model;

pub use model::LogStats;
