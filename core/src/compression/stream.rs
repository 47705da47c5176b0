//! compression/stream.rs
//! Chunked drivers that pump a reader through an incremental context.
//!
//! Summary:
//! - Reads up to `CHUNK_SIZE` bytes per step and writes what the context emits
//!   before reading the next chunk, so memory stays bounded by one chunk.
//! - `finish()` runs exactly once after EOF, also for empty input.
//! - Read and write failures abort the call; nothing is returned as complete.
use std::io::{ErrorKind, Read, Write};

use tracing::debug;

use crate::constants::CHUNK_SIZE;
use crate::compression::types::{Compressor, Decompressor};
use crate::telemetry::{StreamCounters, StreamSnapshot};
use crate::types::{CompressionError, Result};

/// Fill `buf` until it is full or the reader reports EOF.
/// Returns the number of bytes read; `0` means end of stream.
pub fn read_chunk<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut off = 0;
    while off < buf.len() {
        match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => off += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(CompressionError::StreamReadFailed(e)),
        }
    }
    Ok(off)
}

fn emit<W: Write + ?Sized>(w: &mut W, out: &mut Vec<u8>) -> Result<usize> {
    let n = out.len();
    if n > 0 {
        w.write_all(out).map_err(CompressionError::StreamWriteFailed)?;
        out.clear();
    }
    Ok(n)
}

/// Compress everything `r` yields into `w`.
pub fn compress_stream<R, W>(r: &mut R, w: &mut W, mut compressor: Box<dyn Compressor>) -> Result<StreamSnapshot>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut out = Vec::with_capacity(CHUNK_SIZE);
    let mut counters = StreamCounters::new();

    loop {
        let n = read_chunk(r, &mut buf)?;
        if n == 0 {
            break;
        }
        compressor.compress_chunk(&buf[..n], &mut out)?;
        let emitted = emit(w, &mut out)?;
        counters.add_chunk(n, emitted);
    }

    compressor.finish(&mut out)?;
    let emitted = emit(w, &mut out)?;
    counters.add_finish(emitted);
    w.flush().map_err(CompressionError::StreamWriteFailed)?;

    let snapshot = StreamSnapshot::compressed(&counters);
    debug!(
        encoding = %compressor.encoding(),
        chunks = snapshot.chunks,
        bytes_in = snapshot.bytes_in,
        bytes_out = snapshot.bytes_out,
        "compress stream finished"
    );
    Ok(snapshot)
}

/// Decompress everything `r` yields into `w`.
/// A malformed chunk aborts immediately with `InvalidCompressedData`.
pub fn decompress_stream<R, W>(r: &mut R, w: &mut W, mut decompressor: Box<dyn Decompressor>) -> Result<StreamSnapshot>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut out = Vec::with_capacity(CHUNK_SIZE);
    let mut counters = StreamCounters::new();

    loop {
        let n = read_chunk(r, &mut buf)?;
        if n == 0 {
            break;
        }
        decompressor.decompress_chunk(&buf[..n], &mut out)?;
        let emitted = emit(w, &mut out)?;
        counters.add_chunk(n, emitted);
    }

    decompressor.finish(&mut out)?;
    let emitted = emit(w, &mut out)?;
    counters.add_finish(emitted);
    w.flush().map_err(CompressionError::StreamWriteFailed)?;

    let snapshot = StreamSnapshot::decompressed(&counters);
    debug!(
        encoding = %decompressor.encoding(),
        chunks = snapshot.chunks,
        bytes_in = snapshot.bytes_in,
        bytes_out = snapshot.bytes_out,
        "decompress stream finished"
    );
    Ok(snapshot)
}
