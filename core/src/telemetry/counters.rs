//! telemetry/counters.rs
//! Mutable counters used during one streaming call.
use std::time::Instant;

/// Deterministic counters collected while draining a source.
#[derive(Clone, Debug)]
pub struct StreamCounters {
    pub chunks: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub started: Instant,
}

impl Default for StreamCounters {
    fn default() -> Self {
        Self { chunks: 0, bytes_in: 0, bytes_out: 0, started: Instant::now() }
    }
}

impl StreamCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one chunk read from the source and what the codec emitted for it.
    pub fn add_chunk(&mut self, read_len: usize, emitted_len: usize) {
        self.chunks += 1;
        self.bytes_in += read_len as u64;
        self.bytes_out += emitted_len as u64;
    }

    /// Record the bytes emitted by finalization (trailer, pending output).
    pub fn add_finish(&mut self, emitted_len: usize) {
        self.bytes_out += emitted_len as u64;
    }
}

