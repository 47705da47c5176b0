//! storage/mod.rs
//! Named storage backends ("disks") consulted when `Options::disk` is set.
//!
//! The core only needs `exists`, `read_stream` and `write_stream`; the
//! whole-blob calls back the one-shot put path and in-place transfers.

pub mod local;
pub mod memory;

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

use thiserror::Error;

pub use local::LocalDisk;
pub use memory::MemoryDisk;

use crate::types::{CompressionError, Result};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found on disk: {path}")]
    NotFound { path: String },

    #[error("path escapes disk root: {path}")]
    InvalidPath { path: String },

    #[error("storage I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

pub trait StorageBackend: Send + Sync {
    fn exists(&self, path: &str) -> bool;

    fn read_stream(&self, path: &str) -> StorageResult<Box<dyn Read + Send>>;

    /// Drain `contents` into `path`, replacing any existing file.
    /// `Ok(false)` reports a refused write.
    fn write_stream(&self, path: &str, contents: &mut dyn Read) -> StorageResult<bool>;

    fn get(&self, path: &str) -> StorageResult<Vec<u8>>;

    fn put(&self, path: &str, contents: &[u8]) -> StorageResult<bool>;

    fn delete(&self, path: &str) -> StorageResult<bool>;
}

/// Name → backend lookup. Cheap to clone.
#[derive(Clone, Default)]
pub struct Disks {
    disks: HashMap<String, Arc<dyn StorageBackend>>,
}

impl Disks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, backend: Arc<dyn StorageBackend>) -> Self {
        self.insert(name, backend);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, backend: Arc<dyn StorageBackend>) {
        self.disks.insert(name.into(), backend);
    }

    pub fn disk(&self, name: &str) -> Result<Arc<dyn StorageBackend>> {
        self.disks
            .get(name)
            .cloned()
            .ok_or_else(|| CompressionError::UnknownDisk { name: name.to_owned() })
    }
}

impl fmt::Debug for Disks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.disks.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Disks").field("names", &names).finish()
    }
}
