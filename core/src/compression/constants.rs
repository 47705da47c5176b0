//! compression/constants.rs
//! Stable format identifiers and level bounds.

/// zlib window-bits values identifying each container format.
pub mod window_bits {
    pub const RAW: i16 = -15;
    pub const ZLIB: i16 = 15;
    pub const GZIP: i16 = 31;
}

/// Level used when neither the call nor the driver config sets one.
/// Maps to the codec's own default (6 for deflate).
pub const DEFAULT_LEVEL: i32 = -1;
pub const MIN_LEVEL: i32 = -1;
pub const MAX_LEVEL: i32 = 9;

/// gzip: ID1, ID2, CM=deflate.
pub const GZIP_MAGIC: [u8; 3] = [0x1f, 0x8b, 0x08];
/// zlib: low nibble of CMF.
pub const ZLIB_CM_DEFLATE: u8 = 0x08;

/// Spare output capacity reserved before each inflate step.
pub const INFLATE_RESERVE: usize = 32 * 1024;
