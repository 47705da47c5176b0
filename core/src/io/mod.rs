//! io/mod.rs
//! Normalized input and output for the drivers.
//!
//! - `content` turns every accepted input into one owned `Source`.
//! - `sink` delivers produced bytes to memory, a local path, or a disk.
//!
//! Handles are owned values; dropping them closes the underlying file or
//! backend stream exactly once on every exit path.

pub mod content;
pub mod sink;

pub use content::{normalize, Content, Detachable, ExternalStream, Origin, Source};
pub use sink::{Delivery, Destination};
