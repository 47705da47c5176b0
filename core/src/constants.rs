/// Bytes pulled from the input per codec step.
pub const CHUNK_SIZE: usize = 8192;

/// File extensions used for default destination naming.
pub mod extensions {
    pub const GZIP: &str = "gz";
    pub const ZLIB: &str = "zz";
}

/// Response defaults for download descriptors.
pub const DOWNLOAD_STATUS: u16 = 200;
pub const DOWNLOAD_CONTENT_TYPE: &str = "application/octet-stream";

/// Environment overrides read by `CompressionSettings::apply_env`.
pub mod env_keys {
    pub const DRIVER: &str = "COMPRESSION_DRIVER";
    pub const GZIP_LEVEL: &str = "GZIP_LEVEL";
    pub const ZLIB_LEVEL: &str = "ZLIB_LEVEL";
}
