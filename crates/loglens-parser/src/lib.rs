//! # loglens-parser
//!
//! Deterministic log file parser. Given the full text of a log file it
//! produces aggregate [`stats::ParseStats`]: per-keyword occurrence
//! counts, structured-line error levels, and the set of distinct IPv4
//! addresses. Parsing is pure; the same input always yields identical
//! output.

pub mod parser;
pub mod stats;

pub use parser::{LogParser, ParseProgress};
pub use stats::ParseStats;
