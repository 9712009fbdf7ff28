//! Per-stack sample metadata, read from page 0

use log::{info, warn};

use crate::tiff::{tags, TiffResult};

use super::descriptor::{SampleFormat, VolumeDescriptor};
use super::prober::ProbeReport;
use super::source::VolumeSource;

/// Sample layout of page 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleMetadata {
    pub bits_per_sample: u16,
    pub components_per_pixel: u16,
    pub sample_format: SampleFormat,
    /// Set when the page carries no SampleFormat tag
    pub format_defaulted: bool,
}

impl SampleMetadata {
    /// Combines the sample layout with probed dimensions
    pub fn describe(&self, probe: &ProbeReport) -> VolumeDescriptor {
        VolumeDescriptor {
            width: probe.width,
            height: probe.height,
            depth: probe.depth,
            bits_per_sample: self.bits_per_sample,
            components_per_pixel: self.components_per_pixel,
            sample_format: self.sample_format,
        }
    }
}

/// Reads bits per sample, samples per pixel and sample format from page 0
///
/// Absent fields take their TIFF defaults; a missing sample format is
/// assumed to be unsigned integer.
pub fn read_sample_metadata<S: VolumeSource + ?Sized>(source: &mut S) -> TiffResult<SampleMetadata> {
    source.set_directory(0)?;

    let bits_per_sample = source.get_field(tags::BITS_PER_SAMPLE)?.unwrap_or(1) as u16;
    let components_per_pixel = source.get_field(tags::SAMPLES_PER_PIXEL)?.unwrap_or(1) as u16;

    let (sample_format, format_defaulted) = match source.get_field(tags::SAMPLE_FORMAT)? {
        Some(code) => (SampleFormat::from_code(code as u16), false),
        None => {
            warn!("Sample format not defined in file.  Assuming uint.");
            (SampleFormat::UnsignedInt, true)
        }
    };

    Ok(SampleMetadata { bits_per_sample, components_per_pixel, sample_format, format_defaulted })
}

/// Logs the volume summary lines
pub fn log_summary(volume: &VolumeDescriptor) {
    info!("{}x{}x{} tiff.", volume.width, volume.height, volume.depth);
    info!("{} bits per sample.", volume.bits_per_sample);
    info!("{}-component data.", volume.components_per_pixel);
    info!("data type: {}", volume.sample_format);
}
