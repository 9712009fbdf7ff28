//! Page-cursor access the export pipeline reads through

use std::io::Write;

use crate::io::seekable::SeekableReader;
use crate::tiff::{TiffHandle, TiffResult};

/// A stack of pages addressed one directory at a time
///
/// The pipeline only ever moves the cursor, reads scalar fields and pulls
/// decoded scanlines, so anything that can do that can be exported.
pub trait VolumeSource {
    /// Selects page `index`
    fn set_directory(&mut self, index: usize) -> TiffResult<()>;

    /// Advances to the next page, `false` when there is none
    fn read_directory(&mut self) -> bool;

    /// First value of a field on the current page, `None` when absent
    fn get_field(&mut self, tag: u16) -> TiffResult<Option<u64>>;

    /// Size in bytes of one scanline of the current page
    fn scanline_size(&self) -> TiffResult<u64>;

    /// Decodes `row` of the current page into the front of `buf`
    fn read_scanline(&mut self, buf: &mut [u8], row: u64) -> TiffResult<()>;

    /// Writes a diagnostic dump of the current page
    fn print_directory(&mut self, _out: &mut dyn Write) -> TiffResult<()> {
        Ok(())
    }
}

impl<R: SeekableReader> VolumeSource for TiffHandle<R> {
    fn set_directory(&mut self, index: usize) -> TiffResult<()> {
        TiffHandle::set_directory(self, index)
    }

    fn read_directory(&mut self) -> bool {
        TiffHandle::read_directory(self)
    }

    fn get_field(&mut self, tag: u16) -> TiffResult<Option<u64>> {
        TiffHandle::get_field(self, tag)
    }

    fn scanline_size(&self) -> TiffResult<u64> {
        TiffHandle::scanline_size(self)
    }

    fn read_scanline(&mut self, buf: &mut [u8], row: u64) -> TiffResult<()> {
        TiffHandle::read_scanline(self, buf, row)
    }

    fn print_directory(&mut self, out: &mut dyn Write) -> TiffResult<()> {
        TiffHandle::print_directory(self, out)
    }
}
