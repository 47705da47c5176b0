//! Output sink dispatcher: deliver produced bytes to memory, a local path,
//! or a storage backend path.
//!
//! Writes replace existing content. A local copy that fails part-way is not
//! rolled back; the partial file stays behind.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::compression::stream::read_chunk;
use crate::constants::CHUNK_SIZE;
use crate::options::EffectiveOptions;
use crate::storage::Disks;
use crate::types::{CompressionError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Hand the bytes back to the caller.
    Memory,
    Local(PathBuf),
    Disk { disk: String, path: String },
}

impl Destination {
    /// `path` on the configured disk, or on the local filesystem.
    pub fn resolve(path: &str, options: &EffectiveOptions) -> Self {
        match &options.disk {
            Some(disk) => Destination::Disk { disk: disk.clone(), path: path.to_owned() },
            None => Destination::Local(PathBuf::from(path)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Memory(Vec<u8>),
    Stored { bytes: u64 },
    /// The backend declined the write.
    Refused,
}

impl Delivery {
    pub fn is_success(&self) -> bool {
        !matches!(self, Delivery::Refused)
    }
}

/// Counts bytes pulled through a reader.
struct Counted<'a> {
    inner: &'a mut dyn Read,
    count: u64,
}

impl Read for Counted<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

fn create_local(path: &PathBuf) -> Result<File> {
    File::create(path).map_err(|source| CompressionError::OutputOpenFailed { path: path.clone(), source })
}

/// Copy `produced` into `out` chunk by chunk, keeping read and write failures apart.
fn copy_chunks(produced: &mut dyn Read, out: &mut dyn Write) -> Result<u64> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = read_chunk(produced, &mut buf)?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n]).map_err(CompressionError::StreamWriteFailed)?;
        total += n as u64;
    }
    out.flush().map_err(CompressionError::StreamWriteFailed)?;
    Ok(total)
}

/// Drain `produced` into `destination`.
pub fn put(destination: &Destination, produced: &mut dyn Read, disks: &Disks) -> Result<Delivery> {
    let delivery = match destination {
        Destination::Memory => {
            let mut buf = Vec::new();
            produced.read_to_end(&mut buf).map_err(CompressionError::StreamReadFailed)?;
            Delivery::Memory(buf)
        }
        Destination::Local(path) => {
            let mut file = create_local(path)?;
            let bytes = copy_chunks(produced, &mut file)?;
            Delivery::Stored { bytes }
        }
        Destination::Disk { disk, path } => {
            let backend = disks.disk(disk)?;
            let mut counted = Counted { inner: produced, count: 0 };
            if backend.write_stream(path, &mut counted)? {
                Delivery::Stored { bytes: counted.count }
            } else {
                Delivery::Refused
            }
        }
    };
    debug!(?destination, success = delivery.is_success(), "sink put");
    Ok(delivery)
}

/// Write an already materialized buffer to `destination`.
pub fn put_bytes(destination: &Destination, data: &[u8], disks: &Disks) -> Result<Delivery> {
    let delivery = match destination {
        Destination::Memory => Delivery::Memory(data.to_vec()),
        Destination::Local(path) => {
            let mut file = create_local(path)?;
            file.write_all(data).map_err(CompressionError::StreamWriteFailed)?;
            Delivery::Stored { bytes: data.len() as u64 }
        }
        Destination::Disk { disk, path } => {
            if disks.disk(disk)?.put(path, data)? {
                Delivery::Stored { bytes: data.len() as u64 }
            } else {
                Delivery::Refused
            }
        }
    };
    debug!(?destination, bytes = data.len(), "sink put bytes");
    Ok(delivery)
}
