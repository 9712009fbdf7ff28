//! Raw volume output
//!
//! Pages are written in directory order, rows top to bottom, each row as
//! exactly one scanline of the page it came from. There is no header and no
//! padding between pages.

use log::{debug, info, warn};
use std::io::{BufWriter, Write};

use crate::tiff::{tags, TiffError, TiffResult};
use crate::utils::progress::ProgressTracker;

use super::descriptor::VolumeDescriptor;
use super::options::ExportOptions;
use super::source::VolumeSource;

/// Summary of a finished copy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub pages: usize,
    pub bytes_written: u64,
    /// Rows emitted as zeros because their page was shorter than page 0
    pub padded_rows: u64,
}

/// Copies every scanline of a stack into a flat byte stream
pub struct RawCopier {
    show_progress: bool,
}

impl RawCopier {
    pub fn new(options: &ExportOptions) -> Self {
        RawCopier { show_progress: options.show_progress }
    }

    /// Streams all pages of `source` into `out`
    ///
    /// Every page contributes `volume.height` rows. `output_name` names the
    /// destination in write errors. Decoder failures abort the copy.
    pub fn copy<S, W>(
        &self,
        source: &mut S,
        volume: &VolumeDescriptor,
        out: W,
        output_name: &str,
    ) -> TiffResult<CopyReport>
    where
        S: VolumeSource + ?Sized,
        W: Write,
    {
        let mut writer = BufWriter::with_capacity(1024 * 1024, out);
        let mut report = CopyReport::default();
        let progress = if self.show_progress {
            Some(ProgressTracker::new(volume.depth as u64, "Copying pages"))
        } else {
            None
        };

        source.set_directory(0)?;
        loop {
            let page = report.pages;
            let scanline_size = source.scanline_size()? as usize;
            let page_height = source.get_field(tags::IMAGE_LENGTH)?.unwrap_or(0);
            let mut scanline = Vec::new();
            scanline.try_reserve_exact(scanline_size).map_err(|e| TiffError::GenericError(format!(
                "Cannot allocate a {}-byte scanline for page {}: {}", scanline_size, page, e)))?;
            scanline.resize(scanline_size, 0);

            debug!("Copying page {}: {} rows of {} bytes", page, volume.height, scanline_size);
            if page_height < volume.height as u64 {
                warn!("Page {} has {} rows, padding to {} with zeros", page, page_height, volume.height);
            }

            for row in 0..volume.height as u64 {
                if row < page_height {
                    if scanline_size > 0 {
                        source.read_scanline(&mut scanline, row)?;
                    }
                } else {
                    scanline.fill(0);
                    report.padded_rows += 1;
                }
                writer.write_all(&scanline).map_err(|e| TiffError::output(output_name, e))?;
                report.bytes_written += scanline_size as u64;
            }

            report.pages += 1;
            if let Some(progress) = &progress {
                progress.increment(1);
            }
            if !source.read_directory() {
                break;
            }
        }

        writer.flush().map_err(|e| TiffError::output(output_name, e))?;
        if let Some(progress) = &progress {
            progress.finish();
        }

        info!("Wrote {} bytes from {} pages to {}", report.bytes_written, report.pages, output_name);
        Ok(report)
    }
}
