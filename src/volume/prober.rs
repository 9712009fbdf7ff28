//! Stack dimension probing
//!
//! Page 0 is canonical for width and height. Every page is visited once to
//! count the depth; pages whose size differs from page 0 are reported but
//! do not stop the walk.

use log::{debug, error, warn};

use crate::tiff::{tags, TiffResult};

use super::source::VolumeSource;

/// Dimensions of a stack as seen by one walk over its pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub width: u32,
    pub height: u32,
    pub depth: usize,
    /// Indices of pages whose width or height differs from page 0
    pub mismatched_pages: Vec<usize>,
}

impl ProbeReport {
    pub fn is_consistent(&self) -> bool {
        self.mismatched_pages.is_empty()
    }
}

/// Walks every page of `source` and leaves it positioned at page 0
pub fn probe_dimensions<S: VolumeSource + ?Sized>(source: &mut S) -> TiffResult<ProbeReport> {
    source.set_directory(0)?;

    let width = read_dimension(source, tags::IMAGE_WIDTH, "width")?;
    let height = read_dimension(source, tags::IMAGE_LENGTH, "length")?;

    let mut depth = 0usize;
    let mut mismatched_pages = Vec::new();
    loop {
        let page_width = source.get_field(tags::IMAGE_WIDTH)?.unwrap_or(0) as u32;
        let page_height = source.get_field(tags::IMAGE_LENGTH)?.unwrap_or(0) as u32;

        let mut mismatch = false;
        if page_width != width {
            warn!("TIFF x dimension changes in stack!");
            mismatch = true;
        }
        if page_height != height {
            warn!("TIFF y dimension changes in stack!");
            mismatch = true;
        }
        if mismatch {
            debug!("Page {} is {}x{}, page 0 is {}x{}", depth, page_width, page_height, width, height);
            mismatched_pages.push(depth);
        }

        depth += 1;
        if !source.read_directory() {
            break;
        }
    }

    source.set_directory(0)?;

    Ok(ProbeReport { width, height, depth, mismatched_pages })
}

fn read_dimension<S: VolumeSource + ?Sized>(source: &mut S, tag: u16, name: &str) -> TiffResult<u32> {
    match source.get_field(tag)? {
        Some(value) => Ok(value as u32),
        None => {
            error!("Image {} not defined in file", name);
            Ok(0)
        }
    }
}
