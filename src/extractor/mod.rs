//! Pixel data extraction from TIFF pages
//!
//! Scanline-oriented access to stripped pages, including strip
//! decompression and predictor decoding.

mod strip_reader;
pub(crate) mod predictor;

pub use strip_reader::StripReader;
