//! flatepipe-core
//!
//! Streaming deflate, zlib and gzip compression over strings, files,
//! readers and storage disks.
//! Pure Rust, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod options;
pub mod config;
pub mod ratio;

// Codec layer
pub mod compression;
pub mod telemetry;

// Inputs, outputs and backends
pub mod io;
pub mod storage;

// Public surface
pub mod driver;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::types::Encoding;
    pub use crate::config::{CompressionSettings, DriverKind};
    pub use crate::driver::{
        compress, compress_on_disk, compression_driver, decompress, decompress_on_disk, decompression_driver,
        CompressionDriver, DecompressionDriver, Download,
    };
    pub use crate::io::{Content, Detachable};
    pub use crate::options::Options;
    pub use crate::storage::{Disks, LocalDisk, MemoryDisk, StorageBackend};
    pub use crate::telemetry::StreamSnapshot;
    pub use crate::types::{CompressionError, Result};
}
