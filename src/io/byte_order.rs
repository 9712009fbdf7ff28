//! Byte order handling for TIFF files
//!
//! TIFF files declare their byte order in the first two bytes of the
//! header. Everything after that (directory entries, tag arrays, and for
//! predicted data the samples themselves) must be decoded in that order.

use byteorder::{BigEndian, ByteOrder as _, LittleEndian, ReadBytesExt};
use std::io::Result;

use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};

/// Represents the byte order of a TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    /// Detects the byte order from the TIFF header marker
    pub fn detect(reader: &mut dyn SeekableReader) -> TiffResult<Self> {
        let mut marker = [0u8; 2];
        reader.read_exact(&mut marker)?;
        match marker {
            header::LITTLE_ENDIAN_MARKER => Ok(ByteOrder::LittleEndian),
            header::BIG_ENDIAN_MARKER => Ok(ByteOrder::BigEndian),
            _ => Err(TiffError::InvalidByteOrder(u16::from_le_bytes(marker))),
        }
    }

    /// Returns a string representation of this byte order
    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Creates the stream reading strategy for this byte order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }

    /// Decodes a u16 from the start of a byte slice
    pub fn u16_from(&self, bytes: &[u8]) -> u16 {
        match self {
            ByteOrder::LittleEndian => LittleEndian::read_u16(bytes),
            ByteOrder::BigEndian => BigEndian::read_u16(bytes),
        }
    }

    /// Encodes a u16 into the start of a byte slice
    pub fn u16_into(&self, value: u16, bytes: &mut [u8]) {
        match self {
            ByteOrder::LittleEndian => LittleEndian::write_u16(bytes, value),
            ByteOrder::BigEndian => BigEndian::write_u16(bytes, value),
        }
    }

    /// Decodes a u32 from the start of a byte slice
    pub fn u32_from(&self, bytes: &[u8]) -> u32 {
        match self {
            ByteOrder::LittleEndian => LittleEndian::read_u32(bytes),
            ByteOrder::BigEndian => BigEndian::read_u32(bytes),
        }
    }

    /// Encodes a u32 into the start of a byte slice
    pub fn u32_into(&self, value: u32, bytes: &mut [u8]) {
        match self {
            ByteOrder::LittleEndian => LittleEndian::write_u32(bytes, value),
            ByteOrder::BigEndian => BigEndian::write_u32(bytes, value),
        }
    }
}

/// Trait for byte order handling strategies
pub trait ByteOrderHandler: Send + Sync {
    /// The byte order this handler decodes
    fn byte_order(&self) -> ByteOrder;

    /// Read a u16 value
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;

    /// Read a u32 value
    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32>;

    /// Read a u64 value
    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64>;

    /// Read a rational value (two u32 values as numerator/denominator)
    fn read_rational(&self, reader: &mut dyn SeekableReader) -> Result<(u32, u32)>;
}

/// Little-endian byte order handler
pub struct LittleEndianHandler;

impl ByteOrderHandler for LittleEndianHandler {
    fn byte_order(&self) -> ByteOrder {
        ByteOrder::LittleEndian
    }

    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<LittleEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<LittleEndian>()
    }

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
        reader.read_u64::<LittleEndian>()
    }

    fn read_rational(&self, reader: &mut dyn SeekableReader) -> Result<(u32, u32)> {
        let numerator = reader.read_u32::<LittleEndian>()?;
        let denominator = reader.read_u32::<LittleEndian>()?;
        Ok((numerator, denominator))
    }
}

/// Big-endian byte order handler
pub struct BigEndianHandler;

impl ByteOrderHandler for BigEndianHandler {
    fn byte_order(&self) -> ByteOrder {
        ByteOrder::BigEndian
    }

    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
        reader.read_u16::<BigEndian>()
    }

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
        reader.read_u32::<BigEndian>()
    }

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
        reader.read_u64::<BigEndian>()
    }

    fn read_rational(&self, reader: &mut dyn SeekableReader) -> Result<(u32, u32)> {
        let numerator = reader.read_u32::<BigEndian>()?;
        let denominator = reader.read_u32::<BigEndian>()?;
        Ok((numerator, denominator))
    }
}
