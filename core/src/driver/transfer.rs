//! In-place transfers on a storage backend: compress or decompress one path
//! into another on the same disk.
//!
//! A missing source is an error. Codec or backend failures after the source
//! was found are logged and reported as `Ok(None)`.

use tracing::{info, warn};

use crate::driver::base::{Direction, DriverBase};
use crate::driver::compress::CompressionDriver;
use crate::driver::decompress::DecompressionDriver;
use crate::options::Options;
use crate::storage::StorageBackend;
use crate::types::{CompressionError, Result};

/// Compress `source` to `destination` (default `source.<ext>`).
/// Returns the destination path on success.
pub fn compress_on_disk(
    backend: &dyn StorageBackend,
    source: &str,
    destination: Option<&str>,
    delete_source: bool,
    driver: &dyn CompressionDriver,
) -> Result<Option<String>> {
    let destination = match destination {
        Some(d) => d.to_owned(),
        None => format!("{}.{}", source, driver.file_extension()),
    };
    transfer(backend, source, destination, delete_source, driver.base(), Direction::Compress)
}

/// Decompress `source` to `destination` (default `source` without its
/// `.<ext>` suffix). Returns the destination path on success.
pub fn decompress_on_disk(
    backend: &dyn StorageBackend,
    source: &str,
    destination: Option<&str>,
    delete_source: bool,
    driver: &dyn DecompressionDriver,
) -> Result<Option<String>> {
    let destination = match destination {
        Some(d) => d.to_owned(),
        None => strip_extension(source, driver.file_extension()).to_owned(),
    };
    transfer(backend, source, destination, delete_source, driver.base(), Direction::Decompress)
}

fn strip_extension<'a>(path: &'a str, ext: &str) -> &'a str {
    path.strip_suffix(ext)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(path)
}

fn transfer(
    backend: &dyn StorageBackend,
    source: &str,
    destination: String,
    delete_source: bool,
    base: &DriverBase,
    direction: Direction,
) -> Result<Option<String>> {
    if !backend.exists(source) {
        return Err(CompressionError::SourceNotFound { path: source.to_owned() });
    }
    // The backend is given explicitly; any configured disk is irrelevant here.
    let mut opts = base.parse_options(&Options::new());
    opts.disk = None;

    let stored = (|| -> Result<bool> {
        let mut reader = backend.read_stream(source)?;
        let mut processed = base.resource_from(direction, &mut reader, &opts)?;
        drop(reader);
        Ok(backend.write_stream(&destination, &mut processed)?)
    })();

    match stored {
        Ok(true) => {}
        Ok(false) => {
            warn!(driver = %base.kind(), source, destination = %destination, "transfer refused by backend");
            return Ok(None);
        }
        Err(e) => {
            warn!(driver = %base.kind(), source, destination = %destination, error = %e, ?direction, "transfer failed");
            return Ok(None);
        }
    }

    if delete_source && source != destination {
        if let Err(e) = backend.delete(source) {
            warn!(source, error = %e, "source delete failed after transfer");
            return Ok(None);
        }
    }
    info!(driver = %base.kind(), source, destination = %destination, ?direction, "transfer complete");
    Ok(Some(destination))
}

#[cfg(test)]
mod tests {
    use super::strip_extension;

    #[test]
    fn strips_only_matching_suffix() {
        assert_eq!(strip_extension("logs/a.txt.gz", "gz"), "logs/a.txt");
        assert_eq!(strip_extension("a.txtgz", "gz"), "a.txtgz");
        assert_eq!(strip_extension("a.zz", "gz"), "a.zz");
        assert_eq!(strip_extension(".gz", "gz"), ".gz");
    }
}
