use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;

/// Unified error for every driver, codec, and sink operation.
/// - Nothing is recovered inside the codec loop; each failure aborts the call.
/// - Messages aim to be stable and contextual for logs.
#[derive(Debug, Error)]
pub enum CompressionError {
    /// Content representation the normalizer cannot turn into a byte stream.
    #[error("invalid content: {0}")]
    InvalidContent(String),

    /// Referenced path absent on the resolved backend.
    #[error("source does not exist: {path}")]
    SourceNotFound { path: String },

    /// Incremental context could not be created for the given format/level.
    #[error("codec {codec} init failed: {msg}")]
    CodecInitFailed { codec: String, msg: String },

    /// Chunk fed after finalization, or finalization repeated.
    #[error("codec state error: {0}")]
    CodecState(String),

    #[error("failed to read from input stream: {0}")]
    StreamReadFailed(#[source] io::Error),

    #[error("failed to write to output stream: {0}")]
    StreamWriteFailed(#[source] io::Error),

    /// Malformed input to decompression (magic, checksum, truncation, size cap).
    #[error("this is not valid {codec} data: {msg}")]
    InvalidCompressedData { codec: String, msg: String },

    #[error("failed to open output {}: {source}", path.display())]
    OutputOpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Destination `put` given a value matching none of the content tags.
    #[error("unsupported content type: {kind}")]
    UnsupportedContentKind { kind: String },

    #[error("unknown disk: {name}")]
    UnknownDisk { name: String },

    #[error("unknown encoding: {raw}")]
    UnknownEncoding { raw: i16 },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CompressionError>;

impl CompressionError {
    pub(crate) fn invalid_data(codec: &str, msg: impl Into<String>) -> Self {
        CompressionError::InvalidCompressedData { codec: codec.into(), msg: msg.into() }
    }

    pub(crate) fn init_failed(codec: &str, msg: impl Into<String>) -> Self {
        CompressionError::CodecInitFailed { codec: codec.into(), msg: msg.into() }
    }
}
