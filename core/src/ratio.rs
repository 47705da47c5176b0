//! Compression ratio as a space saving: `1 - compressed / original`.

/// `0.0` when `original_len` is zero. Negative when the output grew,
/// which happens at level 0 or on dense input and is a valid result.
pub fn ratio(original_len: usize, compressed_len: usize) -> f64 {
    if original_len == 0 {
        return 0.0;
    }
    1.0 - (compressed_len as f64 / original_len as f64)
}
