//! Core TIFF data structures

use crate::io::byte_order::ByteOrder;
use crate::tiff::ifd::IFD;

/// A parsed TIFF container: its directory chain and encoding parameters
#[derive(Debug)]
pub struct TIFF {
    /// Image File Directories in chain order, one per page
    pub ifds: Vec<IFD>,
    /// Whether this is a BigTIFF format
    pub is_big_tiff: bool,
    /// Byte order declared in the header
    pub byte_order: ByteOrder,
}

impl TIFF {
    /// Creates a new TIFF structure with no directories
    pub fn new(is_big_tiff: bool, byte_order: ByteOrder) -> Self {
        TIFF {
            ifds: Vec::new(),
            is_big_tiff,
            byte_order,
        }
    }

    /// Returns the main (first) IFD if available
    pub fn main_ifd(&self) -> Option<&IFD> {
        self.ifds.first()
    }

    /// Returns the number of IFDs in the TIFF file
    pub fn ifd_count(&self) -> usize {
        self.ifds.len()
    }
}
