//! compression/types.rs
//! Container formats and the incremental codec contract.
use std::fmt;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::compression::constants::window_bits;
use crate::types::{CompressionError, Result};

/// Container format wrapped around the deflate stream.
/// Discriminants follow the zlib window-bits convention.
#[repr(i16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[serde(alias = "deflate_raw")]
    Raw  = window_bits::RAW,
    #[serde(alias = "deflate")]
    Zlib = window_bits::ZLIB,
    Gzip = window_bits::GZIP,
}

impl Encoding {
    pub fn from_window_bits(raw: i16) -> Result<Self> {
        Encoding::try_from_primitive(raw).map_err(|_| CompressionError::UnknownEncoding { raw })
    }

    pub fn window_bits(self) -> i16 {
        self as i16
    }

    pub fn name(self) -> &'static str {
        match self {
            Encoding::Raw  => "raw deflate",
            Encoding::Zlib => "zlib",
            Encoding::Gzip => "gzip",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Incremental encoder bound to one format and level.
/// `finish` must be called exactly once, even for empty input.
pub trait Compressor: Send {
    /// Feed one chunk; emitted bytes are appended to `out`.
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<()>;
    /// Flush pending state and emit the format trailer.
    fn finish(&mut self, out: &mut Vec<u8>) -> Result<()>;
    fn encoding(&self) -> Encoding;
}

/// Incremental decoder bound to one format.
pub trait Decompressor: Send {
    /// Feed one chunk; decoded bytes are appended to `out`.
    fn decompress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<()>;
    /// Flush remaining output and verify the stream reached its end.
    fn finish(&mut self, out: &mut Vec<u8>) -> Result<()>;
    fn encoding(&self) -> Encoding;
}
