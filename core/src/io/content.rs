//! Content normalizer: any accepted input becomes one owned readable handle.
//!
//! Resolution order:
//! 1. an open reader is used as-is;
//! 2. a wrapped external stream is detached into its native reader;
//! 3. text names an existing path on the configured disk (or the local
//!    filesystem when no disk is set) and is opened, otherwise it is literal
//!    content served from memory;
//! 4. anything else is `InvalidContent`.
//!
//! Handles opened here are owned by the returned `Source` and closed when it
//! drops, on success and error paths alike.

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::trace;

use crate::options::EffectiveOptions;
use crate::storage::Disks;
use crate::types::{CompressionError, Result};

/// A stream owned by some outer wrapper that can hand over its handle.
pub trait ExternalStream: Send {
    /// Take the underlying reader out of the wrapper. `None` once detached.
    fn detach(&mut self) -> Option<Box<dyn Read + Send>>;
}

/// Wrapper holding a reader until it is detached.
pub struct Detachable<R> {
    inner: Option<R>,
}

impl<R: Read + Send + 'static> Detachable<R> {
    pub fn new(inner: R) -> Self {
        Self { inner: Some(inner) }
    }

    pub fn is_detached(&self) -> bool {
        self.inner.is_none()
    }
}

impl<R: Read + Send + 'static> ExternalStream for Detachable<R> {
    fn detach(&mut self) -> Option<Box<dyn Read + Send>> {
        self.inner.take().map(|r| Box::new(r) as Box<dyn Read + Send>)
    }
}

/// Every input representation a driver accepts.
pub enum Content {
    /// Literal bytes. Never probed as a path.
    Bytes(Bytes),
    /// A path when one exists on the resolved backend, literal content otherwise.
    Text(String),
    /// A file on the local filesystem.
    File(PathBuf),
    /// An already-open readable handle.
    Reader(Box<dyn Read + Send>),
    /// A stream owned by an outer wrapper; detaching moves it into the pipeline.
    Wrapped(Box<dyn ExternalStream>),
    /// Structured data. Not a byte source.
    Structured(serde_json::Value),
}

impl Content {
    pub fn kind(&self) -> &'static str {
        match self {
            Content::Bytes(_) => "bytes",
            Content::Text(_) => "text",
            Content::File(_) => "file",
            Content::Reader(_) => "reader",
            Content::Wrapped(_) => "wrapped stream",
            Content::Structured(_) => "structured value",
        }
    }

    pub fn reader<R: Read + Send + 'static>(r: R) -> Self {
        Content::Reader(Box::new(r))
    }

    pub fn wrapped<S: ExternalStream + 'static>(s: S) -> Self {
        Content::Wrapped(Box::new(s))
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Content::Text(s) => f.debug_tuple("Text").field(&s.len()).finish(),
            Content::File(p) => f.debug_tuple("File").field(p).finish(),
            Content::Structured(v) => f.debug_tuple("Structured").field(v).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content::Text(s.to_owned())
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Content::Text(s)
    }
}

impl From<&[u8]> for Content {
    fn from(b: &[u8]) -> Self {
        Content::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<Vec<u8>> for Content {
    fn from(b: Vec<u8>) -> Self {
        Content::Bytes(Bytes::from(b))
    }
}

impl From<Bytes> for Content {
    fn from(b: Bytes) -> Self {
        Content::Bytes(b)
    }
}

impl From<PathBuf> for Content {
    fn from(p: PathBuf) -> Self {
        Content::File(p)
    }
}

impl From<&Path> for Content {
    fn from(p: &Path) -> Self {
        Content::File(p.to_path_buf())
    }
}

impl From<File> for Content {
    fn from(f: File) -> Self {
        Content::Reader(Box::new(f))
    }
}

impl From<serde_json::Value> for Content {
    fn from(v: serde_json::Value) -> Self {
        Content::Structured(v)
    }
}

/// Where a normalized handle came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Memory,
    LocalFile(PathBuf),
    Disk { disk: String, path: String },
    Handle,
    Detached,
}

/// Uniform readable handle produced by `normalize`.
pub struct Source {
    origin: Origin,
    reader: Box<dyn Read + Send>,
}

impl Source {
    pub fn new(origin: Origin, reader: Box<dyn Read + Send>) -> Self {
        Self { origin, reader }
    }

    pub fn memory(data: Bytes) -> Self {
        Self::new(Origin::Memory, Box::new(Cursor::new(data)))
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source").field("origin", &self.origin).finish()
    }
}

/// Whether `path` names an existing file on the backend the options select.
pub fn path_exists(path: &str, options: &EffectiveOptions, disks: &Disks) -> Result<bool> {
    match options.disk.as_deref() {
        Some(name) => Ok(disks.disk(name)?.exists(path)),
        None => Ok(Path::new(path).is_file()),
    }
}

/// Open an existing source path on the backend the options select.
pub fn open_path(path: &str, options: &EffectiveOptions, disks: &Disks) -> Result<Source> {
    match options.disk.as_deref() {
        Some(name) => {
            let reader = disks.disk(name)?.read_stream(path)?;
            Ok(Source::new(Origin::Disk { disk: name.to_owned(), path: path.to_owned() }, reader))
        }
        None => open_local(Path::new(path)),
    }
}

fn open_local(path: &Path) -> Result<Source> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CompressionError::SourceNotFound { path: path.display().to_string() },
        _ => CompressionError::StreamReadFailed(e),
    })?;
    Ok(Source::new(Origin::LocalFile(path.to_path_buf()), Box::new(file)))
}

/// Resolve any `Content` into a `Source`.
pub fn normalize(content: Content, options: &EffectiveOptions, disks: &Disks) -> Result<Source> {
    let source = match content {
        Content::Reader(r) => Source::new(Origin::Handle, r),
        Content::Wrapped(mut w) => match w.detach() {
            Some(r) => Source::new(Origin::Detached, r),
            None => return Err(CompressionError::InvalidContent("stream already detached".into())),
        },
        Content::Text(s) => {
            if path_exists(&s, options, disks)? {
                open_path(&s, options, disks)?
            } else {
                Source::memory(Bytes::from(s))
            }
        }
        Content::Bytes(b) => Source::memory(b),
        Content::File(p) => open_local(&p)?,
        Content::Structured(_) => {
            return Err(CompressionError::InvalidContent("invalid resource provided: structured value".into()))
        }
    };
    trace!(origin = ?source.origin(), "normalized content");
    Ok(source)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::compression::types::Encoding;
    use crate::storage::{MemoryDisk, StorageBackend};

    fn opts(disk: Option<&str>) -> EffectiveOptions {
        EffectiveOptions { level: -1, encoding: Encoding::Gzip, disk: disk.map(str::to_owned), max_length: None }
    }

    fn read_all(mut s: Source) -> Vec<u8> {
        let mut v = Vec::new();
        s.read_to_end(&mut v).unwrap();
        v
    }

    #[test]
    fn text_that_is_not_a_path_is_literal() {
        let s = normalize("definitely/not/a/file.txt".into(), &opts(None), &Disks::new()).unwrap();
        assert_eq!(s.origin(), &Origin::Memory);
        assert_eq!(read_all(s), b"definitely/not/a/file.txt");
    }

    #[test]
    fn text_naming_local_file_is_opened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, b"from disk").unwrap();
        let s = normalize(path.to_str().unwrap().into(), &opts(None), &Disks::new()).unwrap();
        assert!(matches!(s.origin(), Origin::LocalFile(_)));
        assert_eq!(read_all(s), b"from disk");
    }

    #[test]
    fn text_is_probed_on_configured_disk() {
        let mem = Arc::new(MemoryDisk::new());
        mem.put("docs/a.txt", b"on the disk").unwrap();
        let disks = Disks::new().with("mem", mem);
        let s = normalize("docs/a.txt".into(), &opts(Some("mem")), &disks).unwrap();
        assert!(matches!(s.origin(), Origin::Disk { .. }));
        assert_eq!(read_all(s), b"on the disk");

        let s = normalize("docs/missing.txt".into(), &opts(Some("mem")), &disks).unwrap();
        assert_eq!(read_all(s), b"docs/missing.txt");
    }

    #[test]
    fn unknown_disk_fails() {
        let err = normalize("x".into(), &opts(Some("nope")), &Disks::new()).unwrap_err();
        assert!(matches!(err, CompressionError::UnknownDisk { .. }));
    }

    #[test]
    fn wrapped_stream_detaches_once() {
        let mut wrapper = Detachable::new(Cursor::new(b"wrapped".to_vec()));
        let r = wrapper.detach().unwrap();
        assert!(wrapper.is_detached());
        assert_eq!(read_all(Source::new(Origin::Detached, r)), b"wrapped");

        let err = normalize(Content::wrapped(wrapper), &opts(None), &Disks::new()).unwrap_err();
        assert!(matches!(err, CompressionError::InvalidContent(_)));
    }

    #[test]
    fn structured_value_is_invalid() {
        let v = serde_json::json!({"not": "bytes"});
        let err = normalize(v.into(), &opts(None), &Disks::new()).unwrap_err();
        assert!(matches!(err, CompressionError::InvalidContent(_)));
    }

    #[test]
    fn missing_local_file_is_source_not_found() {
        let err = normalize(Content::File("/no/such/file.bin".into()), &opts(None), &Disks::new()).unwrap_err();
        assert!(matches!(err, CompressionError::SourceNotFound { .. }));
    }
}
