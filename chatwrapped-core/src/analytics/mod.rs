//! Analytics for chatwrapped
//!
//! Aggregates adapter output into global and per-identity statistics:
//! - Counts (total/sent/received) and daily averages
//! - Word and message frequency rankings
//! - Monthly activity distribution
//!
//! [`global_stats`] runs the metrics sequentially; [`compute_global_stats`]
//! fans them out as independent tasks for callers that want the long scans
//! off their thread. Everything here is recomputed per pass and never
//! persisted.

pub mod engine;
pub mod stats;

pub use engine::compute_global_stats;
pub use stats::{global_stats, identity_stats};
