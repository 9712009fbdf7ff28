//! TIFF format constants
//!
//! Numeric codes from the TIFF 6.0 and BigTIFF specifications, named so the
//! decoder and the volume pipeline never carry magic numbers.

/// TIFF header constants
pub mod header {
    /// Standard TIFF version number (42)
    pub const TIFF_VERSION: u16 = 42;

    /// BigTIFF version number (43)
    pub const BIG_TIFF_VERSION: u16 = 43;

    /// "II" byte order marker for little-endian
    pub const LITTLE_ENDIAN_MARKER: [u8; 2] = [0x49, 0x49];

    /// "MM" byte order marker for big-endian
    pub const BIG_ENDIAN_MARKER: [u8; 2] = [0x4D, 0x4D];

    /// BigTIFF offset size (8 bytes)
    pub const BIGTIFF_OFFSET_SIZE: u16 = 8;
}

/// Field types as defined in the TIFF spec
pub mod field_types {
    pub const BYTE: u16 = 1;       // 8-bit unsigned integer
    pub const ASCII: u16 = 2;      // 8-bit byte containing ASCII character
    pub const SHORT: u16 = 3;      // 16-bit unsigned integer
    pub const LONG: u16 = 4;       // 32-bit unsigned integer
    pub const RATIONAL: u16 = 5;   // Two LONGs: numerator and denominator
    pub const SBYTE: u16 = 6;      // 8-bit signed integer
    pub const UNDEFINED: u16 = 7;  // 8-bit byte with unspecified format
    pub const SSHORT: u16 = 8;     // 16-bit signed integer
    pub const SLONG: u16 = 9;      // 32-bit signed integer
    pub const SRATIONAL: u16 = 10; // Two SLONGs: numerator and denominator
    pub const FLOAT: u16 = 11;     // Single precision IEEE floating point
    pub const DOUBLE: u16 = 12;    // Double precision IEEE floating point
    pub const IFD: u16 = 13;       // 32-bit IFD offset
    pub const LONG8: u16 = 16;     // BigTIFF 64-bit unsigned integer
    pub const SLONG8: u16 = 17;    // BigTIFF 64-bit signed integer
    pub const IFD8: u16 = 18;      // BigTIFF 64-bit IFD offset
}

/// Standard TIFF tags
pub mod tags {
    pub const NEW_SUBFILE_TYPE: u16 = 254;
    pub const IMAGE_WIDTH: u16 = 256;
    pub const IMAGE_LENGTH: u16 = 257;             // TIFF calls the height "length"
    pub const BITS_PER_SAMPLE: u16 = 258;
    pub const COMPRESSION: u16 = 259;
    pub const PHOTOMETRIC_INTERPRETATION: u16 = 262;
    pub const STRIP_OFFSETS: u16 = 273;
    pub const SAMPLES_PER_PIXEL: u16 = 277;
    pub const ROWS_PER_STRIP: u16 = 278;
    pub const STRIP_BYTE_COUNTS: u16 = 279;
    pub const PLANAR_CONFIGURATION: u16 = 284;
    pub const TRANSFER_FUNCTION: u16 = 301;
    pub const PREDICTOR: u16 = 317;
    pub const COLOR_MAP: u16 = 320;
    pub const TILE_WIDTH: u16 = 322;
    pub const TILE_LENGTH: u16 = 323;
    pub const TILE_OFFSETS: u16 = 324;
    pub const SAMPLE_FORMAT: u16 = 339;
}

/// Compression types
pub mod compression {
    pub const NONE: u16 = 1;              // No compression
    pub const LZW: u16 = 5;               // LZW compression
    pub const JPEG: u16 = 7;              // JPEG compression
    pub const DEFLATE: u16 = 8;           // Adobe Deflate (zlib)
    pub const PACKBITS: u16 = 32773;      // PackBits compression
    pub const DEFLATE_LEGACY: u16 = 32946; // Pre-standard Deflate code
    pub const ZSTD: u16 = 50000;          // Zstandard compression
}

/// Photometric interpretation values
pub mod photometric {
    pub const WHITE_IS_ZERO: u16 = 0;
    pub const BLACK_IS_ZERO: u16 = 1;
    pub const RGB: u16 = 2;
    pub const PALETTE: u16 = 3;
    pub const TRANSPARENCY_MASK: u16 = 4;
    pub const CMYK: u16 = 5;
    pub const YCBCR: u16 = 6;
    pub const CIELAB: u16 = 8;
}

/// Planar configuration values
pub mod planar_config {
    pub const CHUNKY: u16 = 1;            // Components stored interleaved (RGBRGBRGB)
    pub const PLANAR: u16 = 2;            // Components stored separately (RRR...GGG...BBB)
}

/// Sample format values
pub mod sample_format {
    pub const UNSIGNED: u16 = 1;          // Unsigned integer data
    pub const SIGNED: u16 = 2;            // Signed integer data
    pub const IEEEFP: u16 = 3;            // IEEE floating point data
    pub const VOID: u16 = 4;              // Undefined data format
    pub const COMPLEX_INT: u16 = 5;       // Complex integer data
    pub const COMPLEX_IEEEFP: u16 = 6;    // Complex floating point data

    /// Human-readable label for a sample format code
    pub fn label(code: u16) -> &'static str {
        match code {
            UNSIGNED => "unsigned integer",
            SIGNED => "integer",
            IEEEFP => "floating point",
            VOID => "void",
            COMPLEX_INT => "complex integer",
            COMPLEX_IEEEFP => "complex floating point",
            _ => "unknown!",
        }
    }
}

/// Predictor values
pub mod predictor {
    pub const NONE: u16 = 1;
    pub const HORIZONTAL_DIFFERENCING: u16 = 2;
    pub const FLOATING_POINT: u16 = 3;
}

#[cfg(test)]
mod tests {
    use super::sample_format;

    #[test]
    fn sample_format_labels_cover_the_table() {
        assert_eq!(sample_format::label(sample_format::UNSIGNED), "unsigned integer");
        assert_eq!(sample_format::label(sample_format::SIGNED), "integer");
        assert_eq!(sample_format::label(sample_format::VOID), "void");
        assert_eq!(sample_format::label(sample_format::COMPLEX_IEEEFP), "complex floating point");
        assert_eq!(sample_format::label(0), "unknown!");
        assert_eq!(sample_format::label(7), "unknown!");
    }
}
