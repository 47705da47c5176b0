#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};
    use std::sync::Arc;

    use flatepipe_core::{
        compression::{codecs::decompress_bytes, Encoding},
        driver::{compress, decompress, CompressionDriver, DecompressionDriver},
        io::{Content, Detachable},
        options::Options,
        storage::{Disks, MemoryDisk, StorageBackend, StorageError, StorageResult},
        types::CompressionError,
    };

    fn gzip() -> compress::GzipDriver {
        compress::GzipDriver::new(Options::new())
    }

    fn gunzip() -> decompress::GzipDriver {
        decompress::GzipDriver::new(Options::new())
    }

    /// Serves `seed` for reads; writes are declined, or fail when `broken`.
    struct ReadOnlyDisk {
        seed: MemoryDisk,
        broken: bool,
    }

    impl ReadOnlyDisk {
        fn new(broken: bool) -> Self {
            let seed = MemoryDisk::new();
            seed.put("in/source.txt", b"source on a read-only disk").unwrap();
            Self { seed, broken }
        }

        fn decline(&self, path: &str) -> StorageResult<bool> {
            if self.broken {
                return Err(StorageError::Io {
                    path: path.to_owned(),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                });
            }
            Ok(false)
        }
    }

    impl StorageBackend for ReadOnlyDisk {
        fn exists(&self, path: &str) -> bool {
            self.seed.exists(path)
        }

        fn read_stream(&self, path: &str) -> StorageResult<Box<dyn Read + Send>> {
            self.seed.read_stream(path)
        }

        fn write_stream(&self, path: &str, contents: &mut dyn Read) -> StorageResult<bool> {
            std::io::copy(contents, &mut std::io::sink()).map_err(|source| StorageError::Io {
                path: path.to_owned(),
                source,
            })?;
            self.decline(path)
        }

        fn get(&self, path: &str) -> StorageResult<Vec<u8>> {
            self.seed.get(path)
        }

        fn put(&self, path: &str, _contents: &[u8]) -> StorageResult<bool> {
            self.decline(path)
        }

        fn delete(&self, path: &str) -> StorageResult<bool> {
            self.decline(path)
        }
    }

    #[test]
    fn hello_world_gzip_level_six() {
        let packed = gzip().string("Hello, World!".into(), &Options::new().level(6)).unwrap();
        assert_ne!(packed, b"Hello, World!");
        assert_eq!(&packed[..3], &[0x1f, 0x8b, 0x08]);
        let plain = gunzip().string(packed.into(), &Options::new()).unwrap();
        assert_eq!(plain, b"Hello, World!");
    }

    #[test]
    fn literal_text_is_not_probed_by_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exists.txt");
        std::fs::write(&path, b"file body").unwrap();
        let name = path.to_str().unwrap().to_owned();

        let packed = gzip().string(name.clone().into(), &Options::new()).unwrap();
        assert_eq!(gunzip().string(packed.into(), &Options::new()).unwrap(), name.as_bytes());
    }

    #[test]
    fn foreign_text_is_rejected_by_both_decompressors() {
        let zlib = decompress::ZlibDriver::new(Options::new());
        for err in [
            gunzip().string("this is plainly not compressed".into(), &Options::new()).unwrap_err(),
            zlib.string("this is plainly not compressed".into(), &Options::new()).unwrap_err(),
        ] {
            assert!(matches!(err, CompressionError::InvalidCompressedData { .. }), "{err}");
        }
    }

    #[test]
    fn call_options_override_driver_defaults() {
        let driver = compress::ZlibDriver::new(Options::new().level(1).encoding(Encoding::Raw));
        let data = vec![b'z'; 10_000];

        let raw = driver.string(data.clone().into(), &Options::new()).unwrap();
        assert_eq!(decompress_bytes(&raw, Encoding::Raw, None).unwrap(), data);

        let gz = driver.string(data.clone().into(), &Options::new().encoding(Encoding::Gzip)).unwrap();
        assert_eq!(&gz[..2], &[0x1f, 0x8b]);

        let cfg = driver.config();
        assert_eq!(cfg.level, Some(1));
        assert_eq!(cfg.encoding, Some(Encoding::Raw));
        assert_eq!(cfg.disk, None);
    }

    #[test]
    fn driver_surface_reports_formats() {
        let gz = gzip();
        let zz = compress::ZlibDriver::new(Options::new());
        assert_eq!(gz.file_extension(), "gz");
        assert_eq!(zz.file_extension(), "zz");
        assert_eq!(gz.supported_algorithms(), &[Encoding::Gzip]);
        assert_eq!(zz.supported_algorithms(), &[Encoding::Raw, Encoding::Gzip, Encoding::Zlib]);
        assert_eq!(gz.config().encoding, Some(Encoding::Gzip));
        assert_eq!(zz.config().level, Some(-1));
        assert_eq!(gz.ratio(b"", b"anything"), 0.0);
        assert!((gz.ratio(&[0u8; 100], &[0u8; 25]) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn resource_is_rewound_and_complete() {
        let data = vec![7u8; 30_000];
        let mut handle = gzip().resource(Content::reader(Cursor::new(data.clone())), &Options::new()).unwrap();
        assert_eq!(handle.position(), 0);
        let mut packed = Vec::new();
        handle.read_to_end(&mut packed).unwrap();

        let mut plain = gunzip().resource(packed.into(), &Options::new()).unwrap();
        let mut back = Vec::new();
        plain.read_to_end(&mut back).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn resource_from_file_and_wrapped_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.log");
        std::fs::write(&path, b"line one\nline two\n").unwrap();

        let from_file = gzip().string(Content::File(path.clone()), &Options::new()).unwrap();
        let from_text = gzip().string(path.to_str().unwrap().into(), &Options::new()).unwrap();
        assert_eq!(gunzip().string(from_file.into(), &Options::new()).unwrap(), b"line one\nline two\n");
        // Text via string() is literal content, not the file.
        assert_eq!(gunzip().string(from_text.into(), &Options::new()).unwrap(), path.to_str().unwrap().as_bytes());

        let wrapped = Content::wrapped(Detachable::new(Cursor::new(b"wrapped body".to_vec())));
        let packed = gzip().string(wrapped, &Options::new()).unwrap();
        assert_eq!(gunzip().string(packed.into(), &Options::new()).unwrap(), b"wrapped body");
    }

    #[test]
    fn stream_reports_counts() {
        let data = vec![b'q'; 20_000];
        let mut out = Vec::new();
        let snap = gzip().stream(data.clone().into(), &mut out, &Options::new().level(9)).unwrap();
        assert_eq!(snap.bytes_in, 20_000);
        assert_eq!(snap.bytes_out, out.len() as u64);
        assert!(snap.ratio > 0.9);
    }

    #[test]
    fn max_length_caps_decompression() {
        let packed = gzip().string(vec![0u8; 5000].into(), &Options::new()).unwrap();
        let err = gunzip().string(packed.clone().into(), &Options::new().max_length(4999)).unwrap_err();
        assert!(matches!(err, CompressionError::InvalidCompressedData { .. }));
        let err = gunzip()
            .resource(Content::reader(Cursor::new(packed.clone())), &Options::new().max_length(100))
            .unwrap_err();
        assert!(matches!(err, CompressionError::InvalidCompressedData { .. }));
        assert_eq!(gunzip().string(packed.into(), &Options::new().max_length(0)).unwrap().len(), 5000);
    }

    #[test]
    fn put_literal_and_file_to_local_paths() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("literal.gz");
        assert!(gzip().put(out.to_str().unwrap(), "not a path at all".into(), &Options::new()).unwrap());
        let packed = std::fs::read(&out).unwrap();
        assert_eq!(decompress_bytes(&packed, Encoding::Gzip, None).unwrap(), b"not a path at all");

        let src = dir.path().join("source.txt");
        std::fs::write(&src, vec![b'a'; 50_000]).unwrap();
        let dest = dir.path().join("source.txt.gz");
        assert!(gzip().put(dest.to_str().unwrap(), src.to_str().unwrap().into(), &Options::new()).unwrap());
        let packed = std::fs::read(&dest).unwrap();
        assert_eq!(decompress_bytes(&packed, Encoding::Gzip, None).unwrap(), vec![b'a'; 50_000]);

        let back = dir.path().join("back.txt");
        assert!(gunzip().put(back.to_str().unwrap(), dest.to_str().unwrap().into(), &Options::new()).unwrap());
        assert_eq!(std::fs::read(&back).unwrap(), vec![b'a'; 50_000]);
    }

    #[test]
    fn put_in_place_over_the_source_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("same.txt");
        std::fs::write(&path, b"rewrite me in place").unwrap();
        let p = path.to_str().unwrap();
        assert!(gzip().put(p, p.into(), &Options::new()).unwrap());
        let packed = std::fs::read(&path).unwrap();
        assert_eq!(decompress_bytes(&packed, Encoding::Gzip, None).unwrap(), b"rewrite me in place");
    }

    #[test]
    fn put_structured_value_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never.gz");
        let err = gzip()
            .put(out.to_str().unwrap(), serde_json::json!({"a": 1}).into(), &Options::new())
            .unwrap_err();
        assert!(matches!(err, CompressionError::UnsupportedContentKind { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn put_to_unopenable_local_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("no-such-dir").join("x.gz");
        let err = gzip().put(out.to_str().unwrap(), "payload".into(), &Options::new()).unwrap_err();
        assert!(matches!(err, CompressionError::OutputOpenFailed { .. }));
    }

    #[test]
    fn disk_option_routes_reads_and_writes() {
        let mem = Arc::new(MemoryDisk::new());
        mem.put("in/report.csv", b"a,b,c\n1,2,3\n").unwrap();
        let disks = Disks::new().with("mem", mem.clone());
        let driver = compress::GzipDriver::with_disks(Options::new(), disks.clone());

        // Bare string shorthand selects the disk.
        assert!(driver.put("out/report.csv.gz", "in/report.csv".into(), &Options::from("mem")).unwrap());
        let packed = mem.get("out/report.csv.gz").unwrap();
        assert_eq!(decompress_bytes(&packed, Encoding::Gzip, None).unwrap(), b"a,b,c\n1,2,3\n");

        // Text missing on the disk is literal content.
        assert!(driver.put("out/literal.gz", "in/missing.csv".into(), &Options::from("mem")).unwrap());
        let packed = mem.get("out/literal.gz").unwrap();
        assert_eq!(decompress_bytes(&packed, Encoding::Gzip, None).unwrap(), b"in/missing.csv");

        let reader = decompress::GzipDriver::with_disks(Options::new().disk("mem"), disks);
        assert_eq!(reader.string(Content::reader(Cursor::new(mem.get("out/report.csv.gz").unwrap())), &Options::new()).unwrap(), b"a,b,c\n1,2,3\n");
    }

    #[test]
    fn unknown_disk_is_reported() {
        let err = gzip().put("x.gz", "x".into(), &Options::from("nowhere")).unwrap_err();
        assert!(matches!(err, CompressionError::UnknownDisk { .. }));
    }

    #[test]
    fn zlib_driver_output_fails_under_gzip_driver() {
        let packed = compress::ZlibDriver::new(Options::new()).string("cross".into(), &Options::new()).unwrap();
        let err = gunzip().string(packed.clone().into(), &Options::new()).unwrap_err();
        assert!(matches!(err, CompressionError::InvalidCompressedData { .. }));
        let plain = decompress::ZlibDriver::new(Options::new()).string(packed.into(), &Options::new()).unwrap();
        assert_eq!(plain, b"cross");
    }

    #[test]
    fn invalid_level_from_call_fails_init() {
        let err = gzip().string("x".into(), &Options::new().level(11)).unwrap_err();
        assert!(matches!(err, CompressionError::CodecInitFailed { .. }));
        let err = gzip()
            .stream(Content::reader(Cursor::new(b"x".to_vec())), &mut Vec::<u8>::new(), &Options::new().level(-5))
            .unwrap_err();
        assert!(matches!(err, CompressionError::CodecInitFailed { .. }));
    }

    #[test]
    fn refused_backend_write_is_false() {
        let driver = compress::GzipDriver::with_disks(Options::new(), Disks::new().with("ro", Arc::new(ReadOnlyDisk::new(false))));
        let ro = Options::from("ro");
        assert!(!driver.put("out/literal.gz", "literal payload".into(), &ro).unwrap());
        assert!(!driver.put("out/source.txt.gz", "in/source.txt".into(), &ro).unwrap());
        assert!(!driver
            .put("out/reader.gz", Content::reader(Cursor::new(vec![b'r'; 20_000])), &ro)
            .unwrap());
    }

    #[test]
    fn backend_write_error_propagates() {
        let driver = compress::GzipDriver::with_disks(Options::new(), Disks::new().with("ro", Arc::new(ReadOnlyDisk::new(true))));
        let ro = Options::from("ro");
        for content in [
            Content::from("literal payload"),
            Content::from("in/source.txt"),
            Content::reader(Cursor::new(vec![b'r'; 20_000])),
        ] {
            let err = driver.put("out/x.gz", content, &ro).unwrap_err();
            assert!(matches!(err, CompressionError::Storage(StorageError::Io { .. })), "{err}");
        }
    }
}
