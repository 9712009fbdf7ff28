//! TIFF file reader implementation
//!
//! Parses the header and the whole directory chain of a TIFF or BigTIFF
//! file up front. Tag arrays and strip data stay on disk and are read on
//! demand through the same reader.

use log::{debug, info, warn};
use std::collections::HashSet;
use std::io::{Cursor, SeekFrom};

use byteorder::ReadBytesExt;

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{field_types, header};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFDEntry, IFD};
use crate::tiff::types::TIFF;
use crate::tiff::validation;

/// Upper bound on chain length; microscopy stacks run to tens of thousands
/// of pages, anything beyond this is treated as a corrupt chain.
const MAX_DIRECTORIES: usize = 1 << 20;

/// Reader for TIFF and BigTIFF files
pub struct TiffReader {
    /// Current byte order handler
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    /// Whether currently reading BigTIFF format
    is_big_tiff: bool,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    /// Creates a new TIFF reader
    pub fn new() -> Self {
        TiffReader {
            byte_order_handler: None,
            is_big_tiff: false,
        }
    }

    fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler.as_deref()
            .ok_or_else(|| TiffError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Reads the header and every IFD of a TIFF file
    ///
    /// 1. Detect byte order (little/big endian)
    /// 2. Check for TIFF or BigTIFF format
    /// 3. Walk the IFD chain
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TIFF> {
        reader.seek(SeekFrom::Start(0))?;

        let byte_order = ByteOrder::detect(reader)?;
        debug!("Detected byte order: {}", byte_order.name());
        self.byte_order_handler = Some(byte_order.create_handler());

        let handler = self.handler()?;
        let version = handler.read_u16(reader)?;
        let is_big_tiff = match version {
            header::BIG_TIFF_VERSION => {
                debug!("Detected BigTIFF format");
                validation::validate_bigtiff_header(reader, handler)?;
                true
            },
            header::TIFF_VERSION => {
                debug!("Detected standard TIFF format");
                false
            },
            _ => return Err(TiffError::UnsupportedVersion(version)),
        };
        self.is_big_tiff = is_big_tiff;

        let first_ifd_offset = self.read_offset(reader)?;
        debug!("First IFD offset: {}", first_ifd_offset);

        let file_size = validation::get_file_size(reader)?;
        let header_size = if is_big_tiff { 16 } else { 8 };
        validation::validate_ifd_offset(first_ifd_offset, file_size, header_size)?;

        let mut tiff = TIFF::new(is_big_tiff, byte_order);
        tiff.ifds = self.read_ifd_chain(reader, first_ifd_offset, file_size)?;
        if tiff.ifds.is_empty() {
            return Err(TiffError::InvalidHeader);
        }

        info!("Read {} IFDs from TIFF file", tiff.ifds.len());
        Ok(tiff)
    }

    /// Reads a 4-byte (TIFF) or 8-byte (BigTIFF) offset
    fn read_offset(&self, reader: &mut dyn SeekableReader) -> TiffResult<u64> {
        let handler = self.handler()?;
        if self.is_big_tiff {
            Ok(handler.read_u64(reader)?)
        } else {
            Ok(handler.read_u32(reader)? as u64)
        }
    }

    /// Walks the IFD chain starting from the given offset
    ///
    /// A broken link ends the chain with a warning; the pages read so far
    /// are kept. Only a failure on the very first IFD is an error.
    fn read_ifd_chain(
        &self,
        reader: &mut dyn SeekableReader,
        first_ifd_offset: u64,
        file_size: u64,
    ) -> TiffResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut visited = HashSet::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 {
            if ifds.len() >= MAX_DIRECTORIES {
                warn!("IFD chain longer than {} directories, stopping", MAX_DIRECTORIES);
                break;
            }
            if !visited.insert(ifd_offset) {
                warn!("IFD chain loops back to offset {}, stopping", ifd_offset);
                break;
            }
            if ifd_offset >= file_size {
                warn!("IFD offset {} exceeds file size {}, stopping IFD chain", ifd_offset, file_size);
                break;
            }

            let ifd = match self.read_ifd(reader, ifd_offset, ifds.len()) {
                Ok(ifd) => ifd,
                Err(e) if ifds.is_empty() => return Err(e),
                Err(e) => {
                    warn!("Error reading IFD {}: {}", ifds.len(), e);
                    break;
                }
            };

            // The next-IFD pointer directly follows the last entry.
            let next_ifd_offset = match self.read_offset(reader) {
                Ok(offset) => offset,
                Err(e) => {
                    warn!("Error reading next IFD offset: {}", e);
                    ifds.push(ifd);
                    break;
                }
            };
            debug!("Next IFD offset: {}", next_ifd_offset);

            ifds.push(ifd);
            ifd_offset = next_ifd_offset;
        }

        Ok(ifds)
    }

    /// Reads one IFD: an entry count followed by the entries
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> TiffResult<IFD> {
        reader.seek(SeekFrom::Start(offset))?;

        let handler = self.handler()?;
        let entry_count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u16(reader)? as u64
        };
        debug!("IFD #{} at offset {} has {} entries", number, offset, entry_count);

        let mut entries = Vec::with_capacity(entry_count.min(1 << 12) as usize);
        for _ in 0..entry_count {
            entries.push(self.read_ifd_entry(reader)?);
        }

        // The next-IFD pointer follows the entries; come back to it after
        // visiting the out-of-line arrays.
        let end_of_entries = reader.stream_position()?;
        let file_size = validation::get_file_size(reader)?;
        for entry in entries.iter_mut().filter(|e| !e.is_inline() && e.count > 0) {
            match self.read_first_value(reader, entry, file_size) {
                Ok(value) => entry.first_value = Some(value),
                Err(e) => warn!("IFD #{}: cannot read first value of tag {}: {}", number, entry.tag, e),
            }
        }
        reader.seek(SeekFrom::Start(end_of_entries))?;

        let mut ifd = IFD::new(number, offset);
        for entry in entries {
            ifd.add_entry(entry);
        }

        Ok(ifd)
    }

    /// Reads the first value of an out-of-line entry from its array
    fn read_first_value(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry, file_size: u64) -> TiffResult<u64> {
        let size = IFDEntry::field_type_size(entry.field_type)
            .ok_or(TiffError::UnsupportedFieldType(entry.field_type))?;
        validation::validate_data_range(entry.value_offset, size as u64, file_size, "Tag data")?;

        reader.seek(SeekFrom::Start(entry.value_offset))?;
        Self::read_value(reader, entry.field_type, self.handler()?)
    }

    /// Reads a single IFD entry, decoding the value field when it is inline
    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> TiffResult<IFDEntry> {
        let handler = self.handler()?;

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        let mut value_field = vec![0u8; if self.is_big_tiff { 8 } else { 4 }];
        reader.read_exact(&mut value_field)?;

        let inline_capacity = value_field.len() as u64;
        let mut field_reader = Cursor::new(value_field.as_slice());

        match IFDEntry::field_type_size(field_type) {
            Some(size) if size as u64 * count <= inline_capacity => {
                let first_value = if count > 0 {
                    Self::read_value(&mut field_reader, field_type, handler)?
                } else {
                    0
                };
                let used = size * count as usize;
                Ok(IFDEntry::inline(tag, field_type, count, first_value, value_field[..used].to_vec()))
            },
            _ => {
                let offset = self.read_offset(&mut field_reader)?;
                Ok(IFDEntry::new(tag, field_type, count, offset))
            }
        }
    }

    /// Reads one value of the given field type, widened to u64
    ///
    /// Signed and floating point values keep their bit pattern.
    fn read_value(
        reader: &mut dyn SeekableReader,
        field_type: u16,
        handler: &dyn ByteOrderHandler,
    ) -> TiffResult<u64> {
        let value = match field_type {
            field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => {
                reader.read_u8()? as u64
            },
            field_types::SHORT | field_types::SSHORT => handler.read_u16(reader)? as u64,
            field_types::LONG | field_types::SLONG | field_types::FLOAT | field_types::IFD => {
                handler.read_u32(reader)? as u64
            },
            field_types::RATIONAL | field_types::SRATIONAL => {
                let (num, den) = handler.read_rational(reader)?;
                ((num as u64) << 32) | (den as u64)
            },
            field_types::DOUBLE | field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => {
                handler.read_u64(reader)?
            },
            _ => return Err(TiffError::UnsupportedFieldType(field_type)),
        };

        Ok(value)
    }

    /// Reads all values of a tag, widened to u64
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> TiffResult<Vec<u64>> {
        let entry = ifd.get_entry(tag)
            .ok_or(TiffError::TagNotFound(tag))?;
        self.read_entry_values(reader, entry)
    }

    /// Reads all values of an entry, from the entry itself or from the file
    pub fn read_entry_values(&self, reader: &mut dyn SeekableReader, entry: &IFDEntry) -> TiffResult<Vec<u64>> {
        let handler = self.handler()?;
        let mut values = Vec::with_capacity(entry.count.min(1 << 16) as usize);

        match &entry.inline_data {
            Some(data) => {
                let mut inline_reader = Cursor::new(data.as_slice());
                for _ in 0..entry.count {
                    values.push(Self::read_value(&mut inline_reader, entry.field_type, handler)?);
                }
            },
            None => {
                let size = entry.data_size()
                    .ok_or(TiffError::UnsupportedFieldType(entry.field_type))?;
                let file_size = validation::get_file_size(reader)?;
                validation::validate_data_range(entry.value_offset, size, file_size, "Tag data")?;

                reader.seek(SeekFrom::Start(entry.value_offset))?;
                for _ in 0..entry.count {
                    values.push(Self::read_value(reader, entry.field_type, handler)?);
                }
            }
        }

        Ok(values)
    }

    /// Returns whether the current file is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Byte order of the current file, once the header has been read
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order_handler.as_ref().map(|handler| handler.byte_order())
    }
}
