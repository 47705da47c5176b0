//! telemetry/mod.rs
//! Per-call counters and immutable snapshots for streaming codec runs.
//!
//! - Counters are mutated inside the chunk loop only.
//! - Snapshots are what callers and logs see once the loop has finished.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
