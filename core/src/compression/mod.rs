//! compression/mod.rs
//! Incremental deflate/inflate layer.
//!
//! - Every container format (raw, zlib, gzip) gets its framing from flate2;
//!   no header or checksum is assembled by hand.
//! - Registry resolves an encoding and level to a boxed context.
//! - `stream` drives a context across fixed-size chunks.

pub mod constants;
pub mod types;
pub mod registry;
pub mod codecs;
pub mod stream;

pub use constants::*;
pub use types::*;
pub use registry::*;
