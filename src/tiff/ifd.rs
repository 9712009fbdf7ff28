//! Image File Directory (IFD) structures and methods
//!
//! Every page of a TIFF stack is described by one IFD: a list of tag
//! entries giving its dimensions, sample layout, compression and the
//! location of its strips.

use std::collections::HashMap;
use log::{debug, trace};

use crate::tiff::constants::{field_types, planar_config, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::tag_names;

/// Largest decoded scanline accepted; anything bigger is a corrupt page
pub const MAX_SCANLINE_SIZE: u64 = 1 << 30;

/// Represents an Image File Directory (IFD) in a TIFF file
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in this IFD, in file order
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based)
    pub number: usize,
    /// Offset to this IFD in the file
    pub offset: u64,
    tag_map: HashMap<u16, usize>,
}

/// Represents an entry in an Image File Directory (IFD)
///
/// When the values fit in the entry's value field they are kept verbatim
/// in `inline_data` (still in file byte order) and `value_offset` holds the
/// first value already decoded. Otherwise `value_offset` is the file offset
/// of the value array and `first_value` is filled in by the reader once the
/// array has been located.
#[derive(Debug, Clone)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// First value (inline) or offset to values
    pub value_offset: u64,
    /// Raw bytes of inline values
    pub inline_data: Option<Vec<u8>>,
    /// First value, decoded
    pub first_value: Option<u64>,
}

impl IFDEntry {
    /// Creates an entry whose values live elsewhere in the file
    pub fn new(tag: u16, field_type: u16, count: u64, value_offset: u64) -> Self {
        trace!("IFD entry: tag={} ({}), type={}, count={}, offset={}",
               tag, tag_names::get_tag_name(tag), field_type, count, value_offset);

        Self {
            tag,
            field_type,
            count,
            value_offset,
            inline_data: None,
            first_value: None,
        }
    }

    /// Creates an entry whose values are stored inside the entry itself
    pub fn inline(tag: u16, field_type: u16, count: u64, first_value: u64, data: Vec<u8>) -> Self {
        trace!("IFD entry: tag={} ({}), type={}, count={}, inline value={}",
               tag, tag_names::get_tag_name(tag), field_type, count, first_value);

        Self {
            tag,
            field_type,
            count,
            value_offset: first_value,
            inline_data: Some(data),
            first_value: Some(first_value),
        }
    }

    /// Size in bytes of a single value of the given field type
    pub fn field_type_size(field_type: u16) -> Option<usize> {
        match field_type {
            field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => Some(1),
            field_types::SHORT | field_types::SSHORT => Some(2),
            field_types::LONG | field_types::SLONG | field_types::FLOAT | field_types::IFD => Some(4),
            field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => Some(8),
            field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => Some(8),
            _ => None,
        }
    }

    /// Total size in bytes of this entry's values, if the field type is known
    pub fn data_size(&self) -> Option<u64> {
        Self::field_type_size(self.field_type).map(|size| size as u64 * self.count)
    }

    /// Whether the values are stored inline in the entry
    pub fn is_inline(&self) -> bool {
        self.inline_data.is_some()
    }
}

impl IFD {
    /// Creates a new, empty IFD
    pub fn new(number: usize, offset: u64) -> Self {
        debug!("Creating IFD #{} at offset {}", number, offset);

        Self {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry, replacing the lookup for a duplicated tag
    pub fn add_entry(&mut self, entry: IFDEntry) {
        self.tag_map.insert(entry.tag, self.entries.len());
        self.entries.push(entry);
    }

    /// Gets the first value of a tag
    ///
    /// `None` when the tag is absent or its out-of-line value could not be
    /// read.
    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        let value = self.get_entry(tag).and_then(|entry| entry.first_value);

        if let Some(val) = value {
            trace!("Found tag {} ({}) in IFD #{}: {}", tag, tag_names::get_tag_name(tag), self.number, val);
        }

        value
    }

    /// Checks if this IFD has a specific tag
    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    /// Gets an IFD entry by tag
    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).map(|&index| &self.entries[index])
    }

    /// Gets the dimensions of the image described by this IFD
    pub fn get_dimensions(&self) -> Option<(u64, u64)> {
        let width = self.get_tag_value(tags::IMAGE_WIDTH)?;
        let height = self.get_tag_value(tags::IMAGE_LENGTH)?;
        Some((width, height))
    }

    /// Returns number of samples per pixel (default 1 if not specified)
    pub fn get_samples_per_pixel(&self) -> u64 {
        self.get_tag_value(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }

    /// Returns bits per sample (default 1 if not specified)
    ///
    /// Only the first value is used; stacks with differing per-channel
    /// depths are not supported.
    pub fn get_bits_per_sample(&self) -> u64 {
        self.get_tag_value(tags::BITS_PER_SAMPLE).unwrap_or(1)
    }

    /// Returns the planar configuration (default chunky)
    pub fn get_planar_configuration(&self) -> u16 {
        self.get_tag_value(tags::PLANAR_CONFIGURATION)
            .map(|v| v as u16)
            .unwrap_or(planar_config::CHUNKY)
    }

    /// Whether the image data is organised in tiles rather than strips
    pub fn is_tiled(&self) -> bool {
        self.has_tag(tags::TILE_WIDTH) || self.has_tag(tags::TILE_OFFSETS)
    }

    /// Size in bytes of one decoded scanline
    ///
    /// Contiguous data packs every sample of a row; separate planes hold one
    /// sample per pixel, so their scanline covers a single plane. Sizes that
    /// overflow or exceed [`MAX_SCANLINE_SIZE`] are rejected.
    pub fn scanline_size(&self) -> TiffResult<u64> {
        let width = self.get_tag_value(tags::IMAGE_WIDTH).unwrap_or(0);
        let bits = self.get_bits_per_sample();
        let samples = match self.get_planar_configuration() {
            planar_config::PLANAR => 1,
            _ => self.get_samples_per_pixel(),
        };

        let size = width.checked_mul(samples)
            .and_then(|n| n.checked_mul(bits))
            .map(|row_bits| row_bits.div_ceil(8))
            .filter(|&size| size <= MAX_SCANLINE_SIZE);

        size.ok_or_else(|| TiffError::UnsupportedLayout(format!(
            "IFD #{} scanline of {} x {} samples x {} bits is too large",
            self.number, width, samples, bits)))
    }

    /// Gets the number of entries in this IFD
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_ifd(width: u64, bits: u64) -> IFD {
        let mut ifd = IFD::new(0, 8);
        ifd.add_entry(IFDEntry::inline(tags::IMAGE_WIDTH, field_types::LONG, 1, width, vec![0; 4]));
        ifd.add_entry(IFDEntry::inline(tags::IMAGE_LENGTH, field_types::LONG, 1, 10, vec![0; 4]));
        ifd.add_entry(IFDEntry::inline(tags::BITS_PER_SAMPLE, field_types::SHORT, 1, bits, vec![0; 2]));
        ifd
    }

    #[test]
    fn scanline_size_rounds_packed_bits_up() {
        assert_eq!(gray_ifd(4, 8).scanline_size().unwrap(), 4);
        assert_eq!(gray_ifd(4, 16).scanline_size().unwrap(), 8);
        assert_eq!(gray_ifd(9, 1).scanline_size().unwrap(), 2);
    }

    #[test]
    fn scanline_size_depends_on_planar_configuration() {
        let mut ifd = gray_ifd(5, 8);
        ifd.add_entry(IFDEntry::inline(tags::SAMPLES_PER_PIXEL, field_types::SHORT, 1, 3, vec![0; 2]));
        assert_eq!(ifd.scanline_size().unwrap(), 15);

        ifd.add_entry(IFDEntry::inline(tags::PLANAR_CONFIGURATION, field_types::SHORT, 1, 2, vec![0; 2]));
        assert_eq!(ifd.scanline_size().unwrap(), 5);
    }

    #[test]
    fn defaults_apply_to_missing_tags() {
        let ifd = IFD::new(0, 8);
        assert_eq!(ifd.get_samples_per_pixel(), 1);
        assert_eq!(ifd.get_bits_per_sample(), 1);
        assert_eq!(ifd.get_dimensions(), None);
        assert!(!ifd.is_tiled());
    }

    #[test]
    fn duplicated_tag_resolves_to_last_entry() {
        let mut ifd = gray_ifd(4, 8);
        ifd.add_entry(IFDEntry::inline(tags::IMAGE_WIDTH, field_types::LONG, 1, 7, vec![0; 4]));
        assert_eq!(ifd.get_dimensions(), Some((7, 10)));
        assert_eq!(ifd.entry_count(), 4);
    }

    #[test]
    fn out_of_line_entries_report_their_first_value_not_the_offset() {
        let mut ifd = gray_ifd(4, 8);
        let mut bits = IFDEntry::new(tags::BITS_PER_SAMPLE, field_types::SHORT, 3, 4096);
        bits.first_value = Some(8);
        ifd.add_entry(bits);
        ifd.add_entry(IFDEntry::inline(tags::SAMPLES_PER_PIXEL, field_types::SHORT, 1, 3, vec![0; 2]));

        assert_eq!(ifd.get_bits_per_sample(), 8);
        assert_eq!(ifd.scanline_size().unwrap(), 12);
    }

    #[test]
    fn unresolved_out_of_line_value_falls_back_to_default() {
        let mut ifd = IFD::new(0, 8);
        ifd.add_entry(IFDEntry::new(tags::BITS_PER_SAMPLE, field_types::SHORT, 3, 4096));
        assert_eq!(ifd.get_tag_value(tags::BITS_PER_SAMPLE), None);
        assert_eq!(ifd.get_bits_per_sample(), 1);
    }

    #[test]
    fn oversized_scanlines_are_rejected() {
        let mut ifd = gray_ifd(u64::MAX / 2, 64);
        assert!(matches!(ifd.scanline_size(), Err(TiffError::UnsupportedLayout(_))));

        ifd = gray_ifd(u32::MAX as u64, 64);
        ifd.add_entry(IFDEntry::inline(tags::SAMPLES_PER_PIXEL, field_types::SHORT, 1, 4, vec![0; 2]));
        assert!(matches!(ifd.scanline_size(), Err(TiffError::UnsupportedLayout(_))));
    }
}
