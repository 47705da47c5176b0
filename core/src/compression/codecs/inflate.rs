//! Inflate side. Raw and zlib run on flate2's low-level `Decompress` so the
//! driver can tell a complete stream from a truncated one; gzip runs on the
//! Vec-backed `MultiGzDecoder` writer, which validates header, CRC32 and size
//! of every member. Concatenated members decode to the concatenation of their
//! payloads; anything after a member that is not another member is rejected.

use std::io::Write;

use flate2::write::MultiGzDecoder;
use flate2::{Decompress, FlushDecompress, Status};
use tracing::warn;

use crate::compression::constants::INFLATE_RESERVE;
use crate::compression::types::{Decompressor, Encoding};
use crate::types::{CompressionError, Result};

/// Shared output cap; `None` is unbounded.
#[derive(Debug, Clone, Copy)]
struct Limit {
    max: Option<usize>,
    produced: usize,
}

impl Limit {
    fn new(max: Option<usize>) -> Self {
        Self { max, produced: 0 }
    }

    fn add(&mut self, encoding: Encoding, n: usize) -> Result<()> {
        self.produced += n;
        match self.max {
            Some(max) if self.produced > max => Err(CompressionError::invalid_data(
                encoding.name(),
                format!("decompressed size exceeds max_length {}", max),
            )),
            _ => Ok(()),
        }
    }
}

pub struct InflateDecompressor {
    encoding: Encoding,
    inner: Decompress,
    limit: Limit,
    stream_end: bool,
    finished: bool,
}

impl InflateDecompressor {
    fn new(encoding: Encoding, max_length: Option<usize>) -> Self {
        let zlib_header = encoding == Encoding::Zlib;
        Self {
            encoding,
            inner: Decompress::new(zlib_header),
            limit: Limit::new(max_length),
            stream_end: false,
            finished: false,
        }
    }

    fn run(&mut self, mut input: &[u8], out: &mut Vec<u8>, flush: FlushDecompress) -> Result<()> {
        loop {
            if self.stream_end {
                if !input.is_empty() {
                    warn!(encoding = %self.encoding, trailing = input.len(), "ignoring bytes after stream end");
                }
                return Ok(());
            }

            out.reserve(INFLATE_RESERVE);
            let before_in = self.inner.total_in();
            let before_out = self.inner.total_out();
            let status = self
                .inner
                .decompress_vec(input, out, flush)
                .map_err(|e| CompressionError::invalid_data(self.encoding.name(), e.to_string()))?;
            let consumed = (self.inner.total_in() - before_in) as usize;
            let produced = (self.inner.total_out() - before_out) as usize;
            input = &input[consumed..];
            self.limit.add(self.encoding, produced)?;

            match status {
                Status::StreamEnd => self.stream_end = true,
                Status::Ok | Status::BufError => {
                    if consumed == 0 && produced == 0 {
                        return Ok(());
                    }
                    if input.is_empty() && out.len() < out.capacity() {
                        return Ok(());
                    }
                }
            }
        }
    }
}

impl Decompressor for InflateDecompressor {
    fn decompress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<()> {
        if self.finished {
            return Err(CompressionError::CodecState(format!(
                "{} decoder fed after finish", self.encoding
            )));
        }
        self.run(input, out, FlushDecompress::None)
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<()> {
        if self.finished {
            return Err(CompressionError::CodecState(format!(
                "{} decoder finished twice", self.encoding
            )));
        }
        self.finished = true;
        self.run(&[], out, FlushDecompress::Finish)?;
        if !self.stream_end {
            return Err(CompressionError::invalid_data(
                self.encoding.name(),
                "truncated stream",
            ));
        }
        Ok(())
    }

    fn encoding(&self) -> Encoding {
        self.encoding
    }
}

pub struct GzipDecompressor {
    inner: MultiGzDecoder<Vec<u8>>,
    limit: Limit,
    finished: bool,
}

impl GzipDecompressor {
    fn new(max_length: Option<usize>) -> Self {
        Self {
            inner: MultiGzDecoder::new(Vec::new()),
            limit: Limit::new(max_length),
            finished: false,
        }
    }

    fn drain_into(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let buf = self.inner.get_mut();
        let n = buf.len();
        out.append(buf);
        self.limit.add(Encoding::Gzip, n)
    }
}

impl Decompressor for GzipDecompressor {
    fn decompress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<()> {
        if self.finished {
            return Err(CompressionError::CodecState("gzip decoder fed after finish".into()));
        }
        self.inner
            .write_all(input)
            .map_err(|e| CompressionError::invalid_data("gzip", e.to_string()))?;
        self.drain_into(out)
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<()> {
        if self.finished {
            return Err(CompressionError::CodecState("gzip decoder finished twice".into()));
        }
        self.finished = true;
        self.inner
            .try_finish()
            .map_err(|e| CompressionError::invalid_data("gzip", e.to_string()))?;
        self.drain_into(out)
    }

    fn encoding(&self) -> Encoding {
        Encoding::Gzip
    }
}

pub fn new_decompressor(encoding: Encoding, max_length: Option<usize>) -> Box<dyn Decompressor + Send> {
    match encoding {
        Encoding::Gzip => Box::new(GzipDecompressor::new(max_length)),
        Encoding::Raw | Encoding::Zlib => Box::new(InflateDecompressor::new(encoding, max_length)),
    }
}

/// One-shot decode through the same incremental context.
pub fn decompress_bytes(data: &[u8], encoding: Encoding, max_length: Option<usize>) -> Result<Vec<u8>> {
    let mut dec = new_decompressor(encoding, max_length);
    let mut out = Vec::with_capacity(data.len().saturating_mul(2));
    dec.decompress_chunk(data, &mut out)?;
    dec.finish(&mut out)?;
    Ok(out)
}
