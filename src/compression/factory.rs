//! Factory for creating compression handlers

use crate::tiff::constants::compression;
use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;
use super::uncompressed::UncompressedHandler;
use super::deflate::DeflateHandler;
use super::zstd::ZstdHandler;

/// Factory for creating compression handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a compression handler for the given compression code
    pub fn create_handler(code: u64) -> TiffResult<Box<dyn CompressionHandler>> {
        match u16::try_from(code) {
            Ok(compression::NONE) => Ok(Box::new(UncompressedHandler)),
            Ok(c @ (compression::DEFLATE | compression::DEFLATE_LEGACY)) => Ok(Box::new(DeflateHandler::new(c))),
            Ok(compression::ZSTD) => Ok(Box::new(ZstdHandler)),
            _ => Err(TiffError::UnsupportedCompression(code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    #[test]
    fn known_codes_resolve_to_handlers() {
        assert_eq!(CompressionFactory::create_handler(1).unwrap().name(), "Uncompressed");
        assert_eq!(CompressionFactory::create_handler(8).unwrap().code(), 8);
        assert_eq!(CompressionFactory::create_handler(32946).unwrap().code(), 32946);
        assert_eq!(CompressionFactory::create_handler(50000).unwrap().name(), "ZSTD");
    }

    #[test]
    fn unsupported_codes_are_rejected() {
        for code in [5u64, 7, 32773, 70000] {
            match CompressionFactory::create_handler(code) {
                Err(TiffError::UnsupportedCompression(c)) => assert_eq!(c, code),
                other => panic!("expected unsupported compression, got {:?}", other.map(|h| h.name())),
            }
        }
    }

    #[test]
    fn deflate_handler_inflates_zlib_streams() {
        let rows: Vec<u8> = (0..64).collect();
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&rows).unwrap();
        let packed = encoder.finish().unwrap();

        let handler = CompressionFactory::create_handler(8).unwrap();
        assert_eq!(handler.decompress(&packed, rows.len()).unwrap(), rows);
    }

    #[test]
    fn deflate_handler_reports_corrupt_data() {
        let handler = CompressionFactory::create_handler(8).unwrap();
        assert!(handler.decompress(&[1, 2, 3, 4], 16).is_err());
    }

    #[test]
    fn zstd_handler_decodes_frames() {
        let rows = vec![7u8; 300];
        let packed = zstd::encode_all(rows.as_slice(), 3).unwrap();

        let handler = CompressionFactory::create_handler(50000).unwrap();
        assert_eq!(handler.decompress(&packed, rows.len()).unwrap(), rows);
        assert!(handler.decompress(&[], 0).unwrap().is_empty());
    }
}
