//! Decompression drivers. Mirrors the compression side; only the codec
//! direction and the download naming differ.

use std::io::{Cursor, Write};

use crate::compression::codecs::decompress_bytes;
use crate::compression::types::Encoding;
use crate::config::DriverKind;
use crate::driver::base::{basename, Direction, DriverBase, Prepared};
use crate::driver::download::Download;
use crate::io::content::Content;
use crate::options::{EffectiveOptions, Options};
use crate::storage::Disks;
use crate::telemetry::StreamSnapshot;
use crate::types::Result;

pub trait DecompressionDriver: Send + Sync {
    fn base(&self) -> &DriverBase;

    fn supported_algorithms(&self) -> &'static [Encoding];

    fn kind(&self) -> DriverKind {
        self.base().kind()
    }

    fn file_extension(&self) -> &'static str {
        self.kind().extension()
    }

    fn config(&self) -> Options {
        self.base().config()
    }

    /// One-shot decode of a complete stream.
    fn decompress_string(&self, data: &[u8], opts: &EffectiveOptions) -> Result<Vec<u8>> {
        decompress_bytes(data, opts.encoding, opts.max_length)
    }

    fn string(&self, content: Content, options: &Options) -> Result<Vec<u8>> {
        let opts = self.base().parse_options(options);
        match content {
            Content::Text(s) => self.decompress_string(s.as_bytes(), &opts),
            Content::Bytes(b) => self.decompress_string(&b, &opts),
            other => Ok(self.base().resource(Direction::Decompress, other, &opts)?.into_inner()),
        }
    }

    fn resource(&self, content: Content, options: &Options) -> Result<Cursor<Vec<u8>>> {
        let opts = self.base().parse_options(options);
        self.base().resource(Direction::Decompress, content, &opts)
    }

    fn stream(&self, content: Content, w: &mut dyn Write, options: &Options) -> Result<StreamSnapshot> {
        let opts = self.base().parse_options(options);
        self.base().stream_into(Direction::Decompress, content, w, &opts)
    }

    /// Decompress `content` and write the plain bytes to `path`.
    fn put(&self, path: &str, content: Content, options: &Options) -> Result<bool> {
        let base = self.base();
        let opts = base.parse_options(options);
        match base.prepare(content, &opts)? {
            Prepared::Literal(data) => {
                let plain = self.decompress_string(&data, &opts)?;
                base.put_literal(path, &plain, &opts)
            }
            Prepared::Stream(source) => base.put_stream(Direction::Decompress, path, source, &opts),
        }
    }

    /// Prepare a download of `path` decompressed on the fly, named after
    /// the basename unless `name` is given.
    fn download(
        &self,
        path: &str,
        name: Option<&str>,
        headers: &[(String, String)],
        options: &Options,
    ) -> Result<Download> {
        let opts = self.base().parse_options(options);
        let filename = name.unwrap_or_else(|| basename(path)).to_owned();
        self.base().download(Direction::Decompress, path, filename, headers, opts)
    }
}

#[derive(Debug, Clone)]
pub struct GzipDriver {
    base: DriverBase,
}

impl GzipDriver {
    pub fn new(config: Options) -> Self {
        Self::with_disks(config, Disks::new())
    }

    pub fn with_disks(config: Options, disks: Disks) -> Self {
        Self { base: DriverBase::new(DriverKind::Gzip, config, disks) }
    }
}

impl DecompressionDriver for GzipDriver {
    fn base(&self) -> &DriverBase {
        &self.base
    }

    fn supported_algorithms(&self) -> &'static [Encoding] {
        &[Encoding::Gzip]
    }
}

#[derive(Debug, Clone)]
pub struct ZlibDriver {
    base: DriverBase,
}

impl ZlibDriver {
    pub fn new(config: Options) -> Self {
        Self::with_disks(config, Disks::new())
    }

    pub fn with_disks(config: Options, disks: Disks) -> Self {
        Self { base: DriverBase::new(DriverKind::Zlib, config, disks) }
    }
}

impl DecompressionDriver for ZlibDriver {
    fn base(&self) -> &DriverBase {
        &self.base
    }

    fn supported_algorithms(&self) -> &'static [Encoding] {
        &[Encoding::Raw, Encoding::Gzip, Encoding::Zlib]
    }
}
