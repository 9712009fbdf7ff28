//! Directory-cursor access to an open TIFF stack
//!
//! A [`TiffHandle`] owns the input for the whole run. It parses the
//! directory chain once when opened and then behaves like a cursor: one
//! directory (page) is current, its fields can be queried and its
//! scanlines decoded, and the cursor can be moved or advanced.

use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, Write};

use crate::extractor::StripReader;
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::tiff::dump;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::tiff::types::TIFF;

/// An open TIFF container positioned at one of its directories
///
/// Dropping the handle releases the underlying file.
pub struct TiffHandle<R: SeekableReader = BufReader<File>> {
    name: String,
    reader: R,
    tiff_reader: TiffReader,
    tiff: TIFF,
    current: usize,
    strip_reader: Option<StripReader>,
}

impl TiffHandle<BufReader<File>> {
    /// Opens `path` as a TIFF container positioned at directory 0
    ///
    /// Any failure (missing file, not a TIFF, no readable directory) is
    /// reported as [`TiffError::CannotOpenInput`] naming the path.
    pub fn open(path: &str) -> TiffResult<Self> {
        info!("Opening TIFF file: {}", path);

        let wrap = |reason: TiffError| TiffError::CannotOpenInput {
            path: path.to_string(),
            reason: Box::new(reason),
        };

        let file = File::open(path).map_err(|e| wrap(e.into()))?;
        Self::from_reader(BufReader::with_capacity(1024 * 1024, file), path).map_err(wrap)
    }
}

impl<R: SeekableReader> TiffHandle<R> {
    /// Parses a TIFF container from any seekable source
    ///
    /// `name` identifies the source in diagnostics.
    pub fn from_reader(mut reader: R, name: &str) -> TiffResult<Self> {
        let mut tiff_reader = TiffReader::new();
        let tiff = tiff_reader.read(&mut reader)?;

        Ok(TiffHandle {
            name: name.to_string(),
            reader,
            tiff_reader,
            tiff,
            current: 0,
            strip_reader: None,
        })
    }

    /// Name of the source this handle was opened from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of directories in the chain
    pub fn directory_count(&self) -> usize {
        self.tiff.ifd_count()
    }

    /// Index of the current directory
    pub fn current_directory(&self) -> usize {
        self.current
    }

    /// Whether the container is a BigTIFF
    pub fn is_big_tiff(&self) -> bool {
        self.tiff.is_big_tiff
    }

    /// Byte order declared by the container
    pub fn byte_order(&self) -> ByteOrder {
        self.tiff.byte_order
    }

    /// The current directory's IFD
    pub fn current_ifd(&self) -> &IFD {
        &self.tiff.ifds[self.current]
    }

    /// Selects a directory by index
    pub fn set_directory(&mut self, index: usize) -> TiffResult<()> {
        if index >= self.tiff.ifd_count() {
            return Err(TiffError::DirectoryOutOfRange { index, count: self.tiff.ifd_count() });
        }

        if index != self.current {
            debug!("Switching from directory {} to {}", self.current, index);
            self.current = index;
            self.strip_reader = None;
        }
        Ok(())
    }

    /// Advances to the next directory
    ///
    /// Returns `false`, leaving the cursor where it is, when the current
    /// directory is the last one.
    pub fn read_directory(&mut self) -> bool {
        let next = self.current + 1;
        if next >= self.tiff.ifd_count() {
            return false;
        }

        self.current = next;
        self.strip_reader = None;
        true
    }

    /// Reads the first value of a field in the current directory
    ///
    /// Returns `Ok(None)` when the field is absent.
    pub fn get_field(&mut self, tag: u16) -> TiffResult<Option<u64>> {
        let ifd = &self.tiff.ifds[self.current];
        let entry = match ifd.get_entry(tag) {
            Some(entry) => entry,
            None => return Ok(None),
        };

        if let Some(value) = entry.first_value {
            return Ok(Some(value));
        }

        let values = self.tiff_reader.read_entry_values(&mut self.reader, entry)?;
        Ok(values.first().copied())
    }

    /// Reads every value of a field in the current directory
    pub fn get_field_values(&mut self, tag: u16) -> TiffResult<Option<Vec<u64>>> {
        let ifd = &self.tiff.ifds[self.current];
        match ifd.get_entry(tag) {
            Some(entry) => Ok(Some(self.tiff_reader.read_entry_values(&mut self.reader, entry)?)),
            None => Ok(None),
        }
    }

    /// Byte size of one scanline of the current directory
    pub fn scanline_size(&self) -> TiffResult<u64> {
        self.current_ifd().scanline_size()
    }

    /// Decodes `row` of the current directory into the front of `buf`
    pub fn read_scanline(&mut self, buf: &mut [u8], row: u64) -> TiffResult<()> {
        if self.strip_reader.is_none() {
            let ifd = &self.tiff.ifds[self.current];
            self.strip_reader = Some(StripReader::new(&mut self.reader, ifd, &self.tiff_reader)?);
        }

        match self.strip_reader.as_mut() {
            Some(strip_reader) => strip_reader.read_scanline(&mut self.reader, row, buf),
            None => Err(TiffError::GenericError("Strip reader not initialised".to_string())),
        }
    }

    /// Writes a human-readable dump of the current directory
    pub fn print_directory(&mut self, out: &mut dyn Write) -> TiffResult<()> {
        let ifd = &self.tiff.ifds[self.current];
        dump::write_directory(out, ifd, &self.tiff_reader, &mut self.reader)
    }
}

impl<R: SeekableReader> Drop for TiffHandle<R> {
    fn drop(&mut self) {
        info!("Closing tiff {}", self.name);
    }
}
