//! Compression handler trait definition

use crate::tiff::errors::TiffResult;

/// Strategy trait for decoding one compression scheme
pub trait CompressionHandler: Send + Sync {
    /// Decompress one strip
    ///
    /// `expected_len` is the decoded size the page layout calls for; it is a
    /// capacity hint, the returned buffer may be shorter or longer.
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// Get the compression code
    fn code(&self) -> u64;
}
