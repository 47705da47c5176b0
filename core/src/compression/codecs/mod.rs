//! compression/codecs/mod.rs
//! Incremental deflate/inflate contexts over flate2.

pub mod deflate;
pub mod inflate;

pub use deflate::*;
pub use inflate::*;
