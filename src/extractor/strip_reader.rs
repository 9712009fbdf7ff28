//! Scanline access to stripped TIFF pages
//!
//! Stripped TIFFs store a page as horizontal bands of `RowsPerStrip` rows,
//! each compressed independently. Reading a scanline means locating its
//! strip, decoding the strip, and slicing the row out of it. The last
//! decoded strip is kept so a top-to-bottom walk decodes every strip once.

use log::{debug, trace};
use std::io::SeekFrom;

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{planar_config, predictor as pred_consts, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::validation;
use crate::tiff::TiffReader;

use super::predictor;

/// Reads decoded scanlines from one stripped page
pub struct StripReader {
    ifd_number: usize,
    height: u64,
    rows_per_strip: u64,
    scanline_size: usize,
    components: usize,
    bits_per_sample: u64,
    predictor: u64,
    byte_order: ByteOrder,
    strip_offsets: Vec<u64>,
    strip_byte_counts: Vec<u64>,
    compression_handler: Box<dyn CompressionHandler>,
    cached_strip: Option<(usize, Vec<u8>)>,
}

impl StripReader {
    /// Prepares scanline access for the page described by `ifd`
    ///
    /// Fails for tiled pages, unsupported compression or predictor, and
    /// pages without strip tags.
    pub fn new(reader: &mut dyn SeekableReader, ifd: &IFD, tiff_reader: &TiffReader) -> TiffResult<Self> {
        if ifd.is_tiled() {
            return Err(TiffError::UnsupportedLayout(format!(
                "IFD #{} is tiled; only strip-organised pages can be read by scanline", ifd.number)));
        }

        let (_, height) = ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;

        // 0 and the 2^32-1 default both mean "one strip for the whole page".
        let rows_per_strip = match ifd.get_tag_value(tags::ROWS_PER_STRIP) {
            Some(rps) if rps > 0 && rps < height => rps,
            _ => height.max(1),
        };

        let compression = ifd.get_tag_value(tags::COMPRESSION).unwrap_or(1);
        let compression_handler = CompressionFactory::create_handler(compression)?;

        let bits_per_sample = ifd.get_bits_per_sample();
        let predictor_code = ifd.get_tag_value(tags::PREDICTOR).unwrap_or(pred_consts::NONE as u64);
        predictor::validate(predictor_code, bits_per_sample)?;

        let scanline_size = ifd.scanline_size()? as usize;

        let components = match ifd.get_planar_configuration() {
            planar_config::PLANAR => 1,
            _ => ifd.get_samples_per_pixel() as usize,
        };

        let strip_offsets = tiff_reader.read_tag_values(reader, ifd, tags::STRIP_OFFSETS)?;
        let strip_byte_counts = tiff_reader.read_tag_values(reader, ifd, tags::STRIP_BYTE_COUNTS)?;
        if strip_offsets.len() != strip_byte_counts.len() {
            return Err(TiffError::GenericError(format!(
                "IFD #{} has {} strip offsets but {} strip byte counts",
                ifd.number, strip_offsets.len(), strip_byte_counts.len())));
        }

        let byte_order = tiff_reader.byte_order()
            .ok_or_else(|| TiffError::GenericError("Byte order not yet determined".to_string()))?;

        debug!("IFD #{}: {} strips of {} rows, compression {}",
               ifd.number, strip_offsets.len(), rows_per_strip, compression_handler.name());

        Ok(StripReader {
            ifd_number: ifd.number,
            height,
            rows_per_strip,
            scanline_size,
            components: components.max(1),
            bits_per_sample,
            predictor: predictor_code,
            byte_order,
            strip_offsets,
            strip_byte_counts,
            compression_handler,
            cached_strip: None,
        })
    }

    /// Size in bytes of one decoded scanline
    pub fn scanline_size(&self) -> usize {
        self.scanline_size
    }

    /// Decodes row `row` into the first `scanline_size` bytes of `buf`
    pub fn read_scanline(&mut self, reader: &mut dyn SeekableReader, row: u64, buf: &mut [u8]) -> TiffResult<()> {
        if row >= self.height {
            return Err(TiffError::GenericError(format!(
                "Row {} out of range for IFD #{} (height {})", row, self.ifd_number, self.height)));
        }
        if buf.len() < self.scanline_size {
            return Err(TiffError::GenericError(format!(
                "Scanline buffer of {} bytes is smaller than the {}-byte scanline",
                buf.len(), self.scanline_size)));
        }

        let strip_index = (row / self.rows_per_strip) as usize;
        let row_in_strip = (row % self.rows_per_strip) as usize;
        let scanline_size = self.scanline_size;
        let ifd_number = self.ifd_number;

        let strip = self.strip(reader, strip_index)?;
        let start = row_in_strip * scanline_size;
        let end = start + scanline_size;
        if end > strip.len() {
            return Err(TiffError::GenericError(format!(
                "Strip {} of IFD #{} decoded to {} bytes, row {} needs {}",
                strip_index, ifd_number, strip.len(), row, end)));
        }

        buf[..scanline_size].copy_from_slice(&strip[start..end]);
        Ok(())
    }

    /// Returns the decoded strip, decoding it unless it is already cached
    fn strip(&mut self, reader: &mut dyn SeekableReader, strip_index: usize) -> TiffResult<&[u8]> {
        let cached = matches!(&self.cached_strip, Some((index, _)) if *index == strip_index);
        if !cached {
            let data = self.decode_strip(reader, strip_index)?;
            self.cached_strip = Some((strip_index, data));
        }

        match &self.cached_strip {
            Some((_, data)) => Ok(data),
            None => Err(TiffError::GenericError("Strip cache is empty".to_string())),
        }
    }

    fn decode_strip(&self, reader: &mut dyn SeekableReader, strip_index: usize) -> TiffResult<Vec<u8>> {
        let (offset, byte_count) = match (self.strip_offsets.get(strip_index), self.strip_byte_counts.get(strip_index)) {
            (Some(&offset), Some(&count)) => (offset, count),
            _ => return Err(TiffError::GenericError(format!(
                "Strip {} missing from IFD #{} ({} strips)",
                strip_index, self.ifd_number, self.strip_offsets.len()))),
        };

        let file_size = validation::get_file_size(reader)?;
        validation::validate_data_range(offset, byte_count, file_size, "Strip")?;

        trace!("Reading strip {} at offset {} with {} bytes", strip_index, offset, byte_count);
        reader.seek(SeekFrom::Start(offset))?;
        let mut compressed_data = vec![0u8; byte_count as usize];
        reader.read_exact(&mut compressed_data)?;

        let first_row = strip_index as u64 * self.rows_per_strip;
        let rows = self.rows_per_strip.min(self.height - first_row.min(self.height)) as usize;
        let expected_len = rows.checked_mul(self.scanline_size).ok_or_else(|| TiffError::UnsupportedLayout(
            format!("Strip {} of IFD #{} is too large to decode", strip_index, self.ifd_number)))?;
        let mut strip_data = self.compression_handler.decompress(&compressed_data, expected_len)?;

        if self.predictor == pred_consts::HORIZONTAL_DIFFERENCING as u64 {
            predictor::apply_horizontal(
                &mut strip_data, self.scanline_size, self.components, self.bits_per_sample, self.byte_order);
        }

        Ok(strip_data)
    }
}
