//! Per-session tracker that logs debug adapter traffic.
//!
//! Provides:
//! - `LoggingTrackerFactory` - Hands out one tracker per session
//! - `LoggingTracker` - Relays messages, errors and exit to `tracing`

pub mod tracker;

pub use tracker::{LoggingTracker, LoggingTrackerFactory};
