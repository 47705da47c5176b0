//! compression/registry.rs
//! Context factory: one incremental codec per (encoding, level).

use tracing::trace;

use crate::compression::codecs::{deflate, inflate};
use crate::compression::types::{Compressor, Decompressor, Encoding};
use crate::types::Result;

pub fn create_compressor(encoding: Encoding, level: i32) -> Result<Box<dyn Compressor + Send>> {
    trace!(%encoding, level, "init deflate context");
    deflate::DeflateCompressor::new(encoding, level)
}

pub fn create_decompressor(encoding: Encoding, max_length: Option<usize>) -> Result<Box<dyn Decompressor + Send>> {
    trace!(%encoding, ?max_length, "init inflate context");
    Ok(inflate::new_decompressor(encoding, max_length))
}
