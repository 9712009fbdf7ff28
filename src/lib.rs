pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod extractor;
pub mod volume;
pub mod commands;

pub use tiff::{TiffError, TiffHandle, TiffReader, TiffResult};
pub use volume::{ExportOptions, SampleFormat, VolumeDescriptor};
