//! Deflate encoder for all three containers via flate2's Vec-backed writers.
//!
//! Each writer owns the framing for its format (gzip header + CRC32/size
//! trailer, zlib header + Adler-32, nothing for raw). Emitted bytes are
//! drained from the inner Vec after every step.

use std::io::Write;

use flate2::write::{DeflateEncoder, GzEncoder, ZlibEncoder};
use flate2::Compression;

use crate::compression::constants::{DEFAULT_LEVEL, MAX_LEVEL, MIN_LEVEL};
use crate::compression::types::{Compressor, Encoding};
use crate::types::{CompressionError, Result};

enum Encoder {
    Raw(DeflateEncoder<Vec<u8>>),
    Zlib(ZlibEncoder<Vec<u8>>),
    Gzip(GzEncoder<Vec<u8>>),
}

impl Encoder {
    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Encoder::Raw(e) => e,
            Encoder::Zlib(e) => e,
            Encoder::Gzip(e) => e,
        }
    }

    fn try_finish(&mut self) -> std::io::Result<()> {
        match self {
            Encoder::Raw(e) => e.try_finish(),
            Encoder::Zlib(e) => e.try_finish(),
            Encoder::Gzip(e) => e.try_finish(),
        }
    }

    fn drain_into(&mut self, out: &mut Vec<u8>) {
        let buf = match self {
            Encoder::Raw(e) => e.get_mut(),
            Encoder::Zlib(e) => e.get_mut(),
            Encoder::Gzip(e) => e.get_mut(),
        };
        out.append(buf);
    }
}

/// Map a user level onto flate2's scale. `-1` selects the codec default.
pub fn compression_level(encoding: Encoding, level: i32) -> Result<Compression> {
    match level {
        DEFAULT_LEVEL => Ok(Compression::default()),
        0..=MAX_LEVEL => Ok(Compression::new(level as u32)),
        _ => Err(CompressionError::init_failed(
            encoding.name(),
            format!("level {} outside {}..={}", level, MIN_LEVEL, MAX_LEVEL),
        )),
    }
}

pub struct DeflateCompressor {
    encoding: Encoding,
    inner: Encoder,
    finished: bool,
}

impl DeflateCompressor {
    pub fn new(encoding: Encoding, level: i32) -> Result<Box<dyn Compressor + Send>> {
        let lvl = compression_level(encoding, level)?;
        let inner = match encoding {
            Encoding::Raw => Encoder::Raw(DeflateEncoder::new(Vec::new(), lvl)),
            Encoding::Zlib => Encoder::Zlib(ZlibEncoder::new(Vec::new(), lvl)),
            Encoding::Gzip => Encoder::Gzip(GzEncoder::new(Vec::new(), lvl)),
        };
        Ok(Box::new(Self { encoding, inner, finished: false }))
    }

    fn process_failed(&self, e: std::io::Error) -> CompressionError {
        CompressionError::CodecState(format!("{} encoder: {}", self.encoding, e))
    }
}

impl Compressor for DeflateCompressor {
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<()> {
        if self.finished {
            return Err(CompressionError::CodecState(format!(
                "{} encoder fed after finish", self.encoding
            )));
        }
        if let Err(e) = self.inner.writer().write_all(input) {
            return Err(self.process_failed(e));
        }
        self.inner.drain_into(out);
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<()> {
        if self.finished {
            return Err(CompressionError::CodecState(format!(
                "{} encoder finished twice", self.encoding
            )));
        }
        if let Err(e) = self.inner.try_finish() {
            return Err(self.process_failed(e));
        }
        self.finished = true;
        self.inner.drain_into(out);
        Ok(())
    }

    fn encoding(&self) -> Encoding {
        self.encoding
    }
}

/// One-shot encode. Framing and trailer come from the same flate2 writer.
pub fn compress_bytes(data: &[u8], level: i32, encoding: Encoding) -> Result<Vec<u8>> {
    let lvl = compression_level(encoding, level)?;
    let io_failed = |e: std::io::Error| {
        CompressionError::CodecState(format!("{} encoder: {}", encoding, e))
    };
    match encoding {
        Encoding::Raw => {
            let mut enc = DeflateEncoder::new(Vec::new(), lvl);
            enc.write_all(data).map_err(io_failed)?;
            enc.finish().map_err(io_failed)
        }
        Encoding::Zlib => {
            let mut enc = ZlibEncoder::new(Vec::new(), lvl);
            enc.write_all(data).map_err(io_failed)?;
            enc.finish().map_err(io_failed)
        }
        Encoding::Gzip => {
            let mut enc = GzEncoder::new(Vec::new(), lvl);
            enc.write_all(data).map_err(io_failed)?;
            enc.finish().map_err(io_failed)
        }
    }
}
