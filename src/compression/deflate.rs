//! Handler for Deflate compressed data

use std::io::Read;
use flate2::read::ZlibDecoder;
use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// Upper bound on the buffer reserved before inflating a strip
const MAX_PREALLOCATION: usize = 64 << 20;

/// Deflate (zlib stream) handler, for both the Adobe code (8) and the
/// pre-standard code (32946)
pub struct DeflateHandler {
    code: u16,
}

impl DeflateHandler {
    /// Handler answering to the given compression code
    pub fn new(code: u16) -> Self {
        DeflateHandler { code }
    }
}

impl Default for DeflateHandler {
    fn default() -> Self {
        Self::new(compression::DEFLATE)
    }
}

impl CompressionHandler for DeflateHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        // A corrupt layout can claim any length; only trust it up to a point.
        let mut decompressed_data = Vec::with_capacity(expected_len.min(MAX_PREALLOCATION));
        decoder.read_to_end(&mut decompressed_data)
            .map_err(|e| TiffError::GenericError(format!("Deflate decompression error: {}", e)))?;
        Ok(decompressed_data)
    }

    fn name(&self) -> &'static str {
        "Deflate"
    }

    fn code(&self) -> u64 {
        self.code as u64
    }
}
