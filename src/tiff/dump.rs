//! Directory dump for diagnostics
//!
//! Prints one IFD the way `tiffinfo` would: the structural fields first,
//! then every remaining tag, then the colormap and transfer-function
//! curves in full.

use std::io::Write;

use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{planar_config, sample_format, tags};
use crate::tiff::errors::TiffResult;
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::tiff::tag_names;

/// Tags rendered by the structural summary rather than the generic listing
const SUMMARY_TAGS: [u16; 10] = [
    tags::IMAGE_WIDTH,
    tags::IMAGE_LENGTH,
    tags::BITS_PER_SAMPLE,
    tags::SAMPLE_FORMAT,
    tags::COMPRESSION,
    tags::PHOTOMETRIC_INTERPRETATION,
    tags::SAMPLES_PER_PIXEL,
    tags::ROWS_PER_STRIP,
    tags::PLANAR_CONFIGURATION,
    tags::COLOR_MAP,
];

/// Writes the dump of `ifd` to `out`
pub fn write_directory(
    out: &mut dyn Write,
    ifd: &IFD,
    tiff_reader: &TiffReader,
    reader: &mut dyn SeekableReader,
) -> TiffResult<()> {
    writeln!(out, "TIFF Directory at offset {:#x} ({})", ifd.offset, ifd.offset)?;

    if let Some((width, height)) = ifd.get_dimensions() {
        writeln!(out, "  Image Width: {} Image Length: {}", width, height)?;
    }
    writeln!(out, "  Bits/Sample: {}", ifd.get_bits_per_sample())?;
    if let Some(code) = ifd.get_tag_value(tags::SAMPLE_FORMAT) {
        writeln!(out, "  Sample Format: {}", sample_format::label(code as u16))?;
    }
    if let Some(code) = ifd.get_tag_value(tags::COMPRESSION) {
        writeln!(out, "  Compression Scheme: {}", tag_names::get_compression_name(code))?;
    }
    if let Some(code) = ifd.get_tag_value(tags::PHOTOMETRIC_INTERPRETATION) {
        writeln!(out, "  Photometric Interpretation: {}", tag_names::get_photometric_name(code))?;
    }
    writeln!(out, "  Samples/Pixel: {}", ifd.get_samples_per_pixel())?;
    if let Some(rows) = ifd.get_tag_value(tags::ROWS_PER_STRIP) {
        writeln!(out, "  Rows/Strip: {}", rows)?;
    }
    let planar = match ifd.get_planar_configuration() {
        planar_config::PLANAR => "separate image planes",
        _ => "single image plane",
    };
    writeln!(out, "  Planar Configuration: {}", planar)?;

    for entry in ifd.entries.iter().filter(|e| !SUMMARY_TAGS.contains(&e.tag)) {
        if entry.tag == tags::TRANSFER_FUNCTION {
            continue;
        }
        writeln!(out, "  {} ({}): {}[{}] = {}",
                 tag_names::get_tag_name(entry.tag), entry.tag,
                 tag_names::get_field_type_name(entry.field_type), entry.count,
                 entry.value_offset)?;
    }

    if ifd.has_tag(tags::COLOR_MAP) {
        let map = tiff_reader.read_tag_values(reader, ifd, tags::COLOR_MAP)?;
        let entries = map.len() / 3;
        writeln!(out, "  Color Map:")?;
        for i in 0..entries {
            writeln!(out, "   {:5}: {:5} {:5} {:5}", i, map[i], map[entries + i], map[2 * entries + i])?;
        }
    }

    if ifd.has_tag(tags::TRANSFER_FUNCTION) {
        let curves = tiff_reader.read_tag_values(reader, ifd, tags::TRANSFER_FUNCTION)?;
        let levels = 1usize << ifd.get_bits_per_sample().min(16);
        writeln!(out, "  Transfer Function:")?;
        let mut tables = curves.chunks(levels);
        let first = tables.next().unwrap_or(&[]);
        let rest: Vec<&[u64]> = tables.collect();
        for (i, value) in first.iter().enumerate() {
            let mut line = format!("    {:2}: {:5}", i, value);
            for table in &rest {
                if let Some(value) = table.get(i) {
                    line.push_str(&format!(" {:5}", value));
                }
            }
            writeln!(out, "{}", line)?;
        }
    }

    Ok(())
}
