//! Handler for ZSTD compressed data

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;
use log::{debug, warn};

/// ZSTD compression handler (compression code 50000)
pub struct ZstdHandler;

impl CompressionHandler for ZstdHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        debug!("ZSTD decompressing {} bytes (expecting {})", data.len(), expected_len);
        if data.is_empty() {
            return Ok(Vec::new());
        }

        zstd::decode_all(data).map_err(|e| {
            warn!("ZSTD decompression error: {}", e);
            TiffError::GenericError(format!("ZSTD decompression error: {}", e))
        })
    }

    fn name(&self) -> &'static str {
        "ZSTD"
    }

    fn code(&self) -> u64 {
        compression::ZSTD as u64
    }
}
