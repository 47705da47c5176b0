//! Compression drivers.
//!
//! Both drivers share every operation through provided trait methods; they
//! differ only in their default framing, extension and advertised formats.

use std::io::{Cursor, Write};

use crate::compression::codecs::compress_bytes;
use crate::compression::types::Encoding;
use crate::config::DriverKind;
use crate::driver::base::{basename, Direction, DriverBase, Prepared};
use crate::driver::download::Download;
use crate::io::content::Content;
use crate::options::Options;
use crate::ratio::ratio;
use crate::storage::Disks;
use crate::telemetry::StreamSnapshot;
use crate::types::Result;

pub trait CompressionDriver: Send + Sync {
    fn base(&self) -> &DriverBase;

    fn supported_algorithms(&self) -> &'static [Encoding];

    fn kind(&self) -> DriverKind {
        self.base().kind()
    }

    fn file_extension(&self) -> &'static str {
        self.kind().extension()
    }

    /// Driver defaults with hard-coded fallbacks applied.
    fn config(&self) -> Options {
        self.base().config()
    }

    /// One-shot encode; framing and trailer come from the primitive.
    fn compress_string(&self, data: &[u8], level: i32, encoding: Encoding) -> Result<Vec<u8>> {
        compress_bytes(data, level, encoding)
    }

    /// Compress `content` and return the whole result. Literal text and bytes
    /// are encoded in one shot and never probed as paths.
    fn string(&self, content: Content, options: &Options) -> Result<Vec<u8>> {
        let opts = self.base().parse_options(options);
        match content {
            Content::Text(s) => self.compress_string(s.as_bytes(), opts.level, opts.encoding),
            Content::Bytes(b) => self.compress_string(&b, opts.level, opts.encoding),
            other => Ok(self.base().resource(Direction::Compress, other, &opts)?.into_inner()),
        }
    }

    /// Compress `content` into a transient buffer, rewound for reading.
    fn resource(&self, content: Content, options: &Options) -> Result<Cursor<Vec<u8>>> {
        let opts = self.base().parse_options(options);
        self.base().resource(Direction::Compress, content, &opts)
    }

    /// Compress `content` straight into `w`.
    fn stream(&self, content: Content, w: &mut dyn Write, options: &Options) -> Result<StreamSnapshot> {
        let opts = self.base().parse_options(options);
        self.base().stream_into(Direction::Compress, content, w, &opts)
    }

    /// Compress `content` and write it to `path` on the configured disk or
    /// the local filesystem. `Ok(false)` when the backend refuses the write.
    fn put(&self, path: &str, content: Content, options: &Options) -> Result<bool> {
        let base = self.base();
        let opts = base.parse_options(options);
        match base.prepare(content, &opts)? {
            Prepared::Literal(data) => {
                let packed = self.compress_string(&data, opts.level, opts.encoding)?;
                base.put_literal(path, &packed, &opts)
            }
            Prepared::Stream(source) => base.put_stream(Direction::Compress, path, source, &opts),
        }
    }

    /// Prepare a download of `path` compressed on the fly. The default name
    /// is the basename plus this driver's extension.
    fn download(
        &self,
        path: &str,
        name: Option<&str>,
        headers: &[(String, String)],
        options: &Options,
    ) -> Result<Download> {
        let opts = self.base().parse_options(options);
        let filename = match name {
            Some(n) => n.to_owned(),
            None => format!("{}.{}", basename(path), self.file_extension()),
        };
        self.base().download(Direction::Compress, path, filename, headers, opts)
    }

    fn ratio(&self, original: &[u8], compressed: &[u8]) -> f64 {
        ratio(original.len(), compressed.len())
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

impl CompressionDriver for GzipDriver {
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

impl CompressionDriver for ZlibDriver {
    fn base(&self) -> &DriverBase {
        &self.base
    }

    fn supported_algorithms(&self) -> &'static [Encoding] {
        &[Encoding::Raw, Encoding::Gzip, Encoding::Zlib]
    }
}
