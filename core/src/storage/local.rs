//! Disk rooted at a local directory.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use crate::storage::{StorageBackend, StorageError, StorageResult};

#[derive(Debug, Clone)]
pub struct LocalDisk {
    root: PathBuf,
}

impl LocalDisk {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `path` under the root, refusing `..` and absolute escapes.
    fn full_path(&self, path: &str) -> StorageResult<PathBuf> {
        let rel = Path::new(path.trim_start_matches('/'));
        if rel.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir)) {
            return Err(StorageError::InvalidPath { path: path.to_owned() });
        }
        Ok(self.root.join(rel))
    }

    fn io_err(path: &str, source: io::Error) -> StorageError {
        if source.kind() == io::ErrorKind::NotFound {
            StorageError::NotFound { path: path.to_owned() }
        } else {
            StorageError::Io { path: path.to_owned(), source }
        }
    }

    fn create(&self, path: &str) -> StorageResult<File> {
        let full = self.full_path(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::io_err(path, e))?;
        }
        File::create(&full).map_err(|e| Self::io_err(path, e))
    }
}

impl StorageBackend for LocalDisk {
    fn exists(&self, path: &str) -> bool {
        self.full_path(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn read_stream(&self, path: &str) -> StorageResult<Box<dyn Read + Send>> {
        let full = self.full_path(path)?;
        let file = File::open(full).map_err(|e| Self::io_err(path, e))?;
        Ok(Box::new(file))
    }

    fn write_stream(&self, path: &str, contents: &mut dyn Read) -> StorageResult<bool> {
        let mut file = self.create(path)?;
        io::copy(contents, &mut file).map_err(|e| Self::io_err(path, e))?;
        Ok(true)
    }

    fn get(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full = self.full_path(path)?;
        fs::read(full).map_err(|e| Self::io_err(path, e))
    }

    fn put(&self, path: &str, contents: &[u8]) -> StorageResult<bool> {
        let full = self.full_path(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::io_err(path, e))?;
        }
        fs::write(full, contents).map_err(|e| Self::io_err(path, e))?;
        Ok(true)
    }

    fn delete(&self, path: &str) -> StorageResult<bool> {
        let full = self.full_path(path)?;
        match fs::remove_file(full) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Self::io_err(path, e)),
        }
    }
}
