//! Behaviour shared by every driver: option parsing, source resolution,
//! the streaming run, and delivery to sinks.

use std::io::{Cursor, Read, Write};

use bytes::Bytes;
use tracing::{debug, info};

use crate::compression::codecs::{compress_bytes, decompress_bytes};
use crate::compression::registry::{create_compressor, create_decompressor};
use crate::compression::stream::{compress_stream, decompress_stream};
use crate::config::DriverKind;
use crate::driver::download::{attachment_headers, Download};
use crate::io::content::{normalize, open_path, path_exists, Content, Source};
use crate::io::sink::{self, Delivery, Destination};
use crate::options::{resolve, with_fallbacks, EffectiveOptions, Options};
use crate::storage::Disks;
use crate::telemetry::StreamSnapshot;
use crate::types::{CompressionError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Compress,
    Decompress,
}

/// Content split for `put`: literal bytes take the one-shot path,
/// everything else is streamed.
pub enum Prepared {
    Literal(Bytes),
    Stream(Source),
}

#[derive(Clone, Debug)]
pub struct DriverBase {
    kind: DriverKind,
    config: Options,
    disks: Disks,
}

impl DriverBase {
    pub fn new(kind: DriverKind, config: Options, disks: Disks) -> Self {
        Self { kind, config, disks }
    }

    pub fn kind(&self) -> DriverKind {
        self.kind
    }

    pub fn disks(&self) -> &Disks {
        &self.disks
    }

    /// Default dictionary with hard-coded fallbacks applied.
    pub fn config(&self) -> Options {
        with_fallbacks(&self.config, self.kind.default_encoding())
    }

    pub fn parse_options(&self, call: &Options) -> EffectiveOptions {
        resolve(call, &self.config, self.kind.default_encoding())
    }

    /// Run one incremental codec over `src` into `w`.
    pub fn run(
        &self,
        direction: Direction,
        src: &mut dyn Read,
        w: &mut dyn Write,
        opts: &EffectiveOptions,
    ) -> Result<StreamSnapshot> {
        match direction {
            Direction::Compress => compress_stream(src, w, create_compressor(opts.encoding, opts.level)?),
            Direction::Decompress => decompress_stream(src, w, create_decompressor(opts.encoding, opts.max_length)?),
        }
    }

    pub fn one_shot(&self, direction: Direction, data: &[u8], opts: &EffectiveOptions) -> Result<Vec<u8>> {
        match direction {
            Direction::Compress => compress_bytes(data, opts.level, opts.encoding),
            Direction::Decompress => decompress_bytes(data, opts.encoding, opts.max_length),
        }
    }

    /// Normalize `content`, stream it through the codec into a transient
    /// buffer, and return the buffer rewound.
    pub fn resource(&self, direction: Direction, content: Content, opts: &EffectiveOptions) -> Result<Cursor<Vec<u8>>> {
        let mut source = normalize(content, opts, &self.disks)?;
        self.resource_from(direction, &mut source, opts)
    }

    pub fn resource_from(
        &self,
        direction: Direction,
        source: &mut dyn Read,
        opts: &EffectiveOptions,
    ) -> Result<Cursor<Vec<u8>>> {
        let mut out = Cursor::new(Vec::new());
        self.run(direction, source, &mut out, opts)?;
        out.set_position(0);
        Ok(out)
    }

    /// Stream `content` through the codec straight into `w`.
    pub fn stream_into(
        &self,
        direction: Direction,
        content: Content,
        w: &mut dyn Write,
        opts: &EffectiveOptions,
    ) -> Result<StreamSnapshot> {
        let mut source = normalize(content, opts, &self.disks)?;
        self.run(direction, &mut source, w, opts)
    }

    /// Classify `content` for `put`. Unsupported kinds fail before anything
    /// is opened or written.
    pub fn prepare(&self, content: Content, opts: &EffectiveOptions) -> Result<Prepared> {
        match content {
            structured @ Content::Structured(_) => Err(CompressionError::UnsupportedContentKind {
                kind: structured.kind().to_owned(),
            }),
            Content::Bytes(b) => Ok(Prepared::Literal(b)),
            Content::Text(s) => {
                if path_exists(&s, opts, &self.disks)? {
                    Ok(Prepared::Stream(open_path(&s, opts, &self.disks)?))
                } else {
                    Ok(Prepared::Literal(Bytes::from(s)))
                }
            }
            other => Ok(Prepared::Stream(normalize(other, opts, &self.disks)?)),
        }
    }

    pub fn put_literal(&self, path: &str, processed: &[u8], opts: &EffectiveOptions) -> Result<bool> {
        let dest = Destination::resolve(path, opts);
        let delivery = sink::put_bytes(&dest, processed, &self.disks)?;
        self.report_put(path, &delivery);
        Ok(delivery.is_success())
    }

    pub fn put_stream(
        &self,
        direction: Direction,
        path: &str,
        mut source: Source,
        opts: &EffectiveOptions,
    ) -> Result<bool> {
        let dest = Destination::resolve(path, opts);
        let mut processed = self.resource_from(direction, &mut source, opts)?;
        // Close the source before the destination is opened; they may be the same file.
        drop(source);
        let delivery = sink::put(&dest, &mut processed, &self.disks)?;
        self.report_put(path, &delivery);
        Ok(delivery.is_success())
    }

    fn report_put(&self, path: &str, delivery: &Delivery) {
        match delivery {
            Delivery::Stored { bytes } => info!(driver = %self.kind, path, bytes, "put complete"),
            Delivery::Refused => info!(driver = %self.kind, path, "put refused by backend"),
            Delivery::Memory(_) => debug!(driver = %self.kind, path, "put to memory"),
        }
    }

    /// Fail with `SourceNotFound` unless `path` exists on the resolved backend.
    pub fn ensure_exists(&self, path: &str, opts: &EffectiveOptions) -> Result<()> {
        if path_exists(path, opts, &self.disks)? {
            Ok(())
        } else {
            Err(CompressionError::SourceNotFound { path: path.to_owned() })
        }
    }

    /// Build a download whose producer opens `path`, runs the codec and
    /// writes into the response body. Existence is checked up front so a
    /// missing file never yields a started response.
    pub fn download(
        &self,
        direction: Direction,
        path: &str,
        filename: String,
        headers: &[(String, String)],
        opts: EffectiveOptions,
    ) -> Result<Download> {
        self.ensure_exists(path, &opts)?;
        let headers = attachment_headers(&filename, headers);
        let base = self.clone();
        let path = path.to_owned();

        info!(driver = %self.kind, path = %path, filename = %filename, "download prepared");
        Ok(Download::new(filename, headers, move |body: &mut dyn Write| {
            let mut source = open_path(&path, &opts, &base.disks)?;
            base.run(direction, &mut source, body, &opts)
        }))
    }
}

/// Last path segment, as used for download names.
pub fn basename(path: &str) -> &str {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::basename;

    #[test]
    fn basename_strips_directories() {
        assert_eq!(basename("a/b/c.txt"), "c.txt");
        assert_eq!(basename("c.txt"), "c.txt");
        assert_eq!(basename("dir/sub/"), "sub");
        assert_eq!(basename("C:\\logs\\app.log"), "app.log");
    }
}
