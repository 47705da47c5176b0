//! In-process disk. Files live in a map keyed by normalized path.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::sync::{Mutex, MutexGuard};

use crate::storage::{StorageBackend, StorageError, StorageResult};

#[derive(Debug, Default)]
pub struct MemoryDisk {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

fn key(path: &str) -> String {
    path.trim_start_matches('/').to_owned()
}

impl MemoryDisk {
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn paths(&self) -> Vec<String> {
        self.files().keys().cloned().collect()
    }
}

impl StorageBackend for MemoryDisk {
    fn exists(&self, path: &str) -> bool {
        self.files().contains_key(&key(path))
    }

    fn read_stream(&self, path: &str) -> StorageResult<Box<dyn Read + Send>> {
        let data = self.get(path)?;
        Ok(Box::new(Cursor::new(data)))
    }

    fn write_stream(&self, path: &str, contents: &mut dyn Read) -> StorageResult<bool> {
        let mut data = Vec::new();
        contents
            .read_to_end(&mut data)
            .map_err(|source| StorageError::Io { path: path.to_owned(), source })?;
        self.files().insert(key(path), data);
        Ok(true)
    }

    fn get(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.files()
            .get(&key(path))
            .cloned()
            .ok_or_else(|| StorageError::NotFound { path: path.to_owned() })
    }

    fn put(&self, path: &str, contents: &[u8]) -> StorageResult<bool> {
        self.files().insert(key(path), contents.to_vec());
        Ok(true)
    }

    fn delete(&self, path: &str) -> StorageResult<bool> {
        Ok(self.files().remove(&key(path)).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_overwrite_delete() {
        let disk = MemoryDisk::new();
        assert!(!disk.exists("a.txt"));
        disk.put("a.txt", b"one").unwrap();
        disk.put("/a.txt", b"two").unwrap();
        assert_eq!(disk.get("a.txt").unwrap(), b"two");
        assert!(disk.delete("a.txt").unwrap());
        assert!(!disk.delete("a.txt").unwrap());
        assert!(matches!(disk.get("a.txt"), Err(StorageError::NotFound { .. })));
    }

    #[test]
    fn write_stream_drains_reader() {
        let disk = MemoryDisk::new();
        let mut src = Cursor::new(vec![5u8; 10_000]);
        assert!(disk.write_stream("dir/blob", &mut src).unwrap());
        let mut back = Vec::new();
        disk.read_stream("dir/blob").unwrap().read_to_end(&mut back).unwrap();
        assert_eq!(back, vec![5u8; 10_000]);
        assert_eq!(disk.paths(), vec!["dir/blob".to_owned()]);
    }
}
