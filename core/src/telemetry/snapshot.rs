//! telemetry/snapshot.rs
//! Immutable summary of a finished streaming call.

use std::time::Duration;
use serde::Serialize;

use crate::ratio::ratio;
use crate::telemetry::counters::StreamCounters;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamSnapshot {
    pub chunks: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    /// Space saving of the compressed side relative to the plain side.
    pub ratio: f64,
    pub elapsed: Duration,
}

impl StreamSnapshot {
    /// Build a snapshot for a compression run: input is plain, output is packed.
    pub fn compressed(counters: &StreamCounters) -> Self {
        Self::build(counters, counters.bytes_in, counters.bytes_out)
    }

    /// Build a snapshot for a decompression run: input is packed, output is plain.
    pub fn decompressed(counters: &StreamCounters) -> Self {
        Self::build(counters, counters.bytes_out, counters.bytes_in)
    }

    fn build(counters: &StreamCounters, plain: u64, packed: u64) -> Self {
        Self {
            chunks: counters.chunks,
            bytes_in: counters.bytes_in,
            bytes_out: counters.bytes_out,
            ratio: ratio(plain as usize, packed as usize),
            elapsed: counters.started.elapsed(),
        }
    }
}
