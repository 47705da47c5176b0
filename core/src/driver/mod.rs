//! Public driver surface.
//!
//! `compress::{GzipDriver, ZlibDriver}` and `decompress::{GzipDriver, ZlibDriver}`
//! share names; reach them through their module or through the factories
//! below.

pub mod base;
pub mod compress;
pub mod decompress;
pub mod download;
pub mod transfer;

pub use base::{basename, Direction, DriverBase};
pub use compress::CompressionDriver;
pub use decompress::DecompressionDriver;
pub use download::{attachment_headers, Download, Producer};
pub use transfer::{compress_on_disk, decompress_on_disk};

use tracing::debug;

use crate::config::{CompressionSettings, DriverKind};
use crate::options::Options;
use crate::storage::Disks;
use crate::types::Result;

/// Build the compression driver for `kind` from its settings entry.
pub fn compression_driver(kind: DriverKind, settings: &CompressionSettings, disks: Disks) -> Box<dyn CompressionDriver> {
    let config = settings.driver(kind).clone();
    debug!(driver = %kind, ?config, "compression driver");
    match kind {
        DriverKind::Gzip => Box::new(compress::GzipDriver::with_disks(config, disks)),
        DriverKind::Zlib => Box::new(compress::ZlibDriver::with_disks(config, disks)),
    }
}

/// Build the decompression driver for `kind`. Reads the same settings
/// entry as the compression side.
pub fn decompression_driver(
    kind: DriverKind,
    settings: &CompressionSettings,
    disks: Disks,
) -> Box<dyn DecompressionDriver> {
    let config = settings.driver(kind).clone();
    debug!(driver = %kind, ?config, "decompression driver");
    match kind {
        DriverKind::Gzip => Box::new(decompress::GzipDriver::with_disks(config, disks)),
        DriverKind::Zlib => Box::new(decompress::ZlibDriver::with_disks(config, disks)),
    }
}

/// Compress `data` with the default settings of `kind`.
pub fn compress(kind: DriverKind, data: &[u8]) -> Result<Vec<u8>> {
    compression_driver(kind, &CompressionSettings::default(), Disks::new()).string(data.into(), &Options::new())
}

/// Decompress `data` with the default settings of `kind`.
pub fn decompress(kind: DriverKind, data: &[u8]) -> Result<Vec<u8>> {
    decompression_driver(kind, &CompressionSettings::default(), Disks::new()).string(data.into(), &Options::new())
}
