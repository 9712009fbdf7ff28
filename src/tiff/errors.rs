//! Custom error types for TIFF decoding and volume export

use std::fmt;
use std::io;

/// Errors raised while decoding a TIFF stack or writing its volume
#[derive(Debug)]
pub enum TiffError {
    /// I/O error
    IoError(io::Error),
    /// Invalid TIFF header
    InvalidHeader,
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Invalid BigTIFF header
    InvalidBigTIFFHeader,
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// Tag not found
    TagNotFound(u16),
    /// Unsupported field type
    UnsupportedFieldType(u16),
    /// Unsupported compression method
    UnsupportedCompression(u64),
    /// Page without ImageWidth or ImageLength
    MissingDimensions,
    /// Unsupported predictor for the sample layout
    UnsupportedPredictor { predictor: u64, bits_per_sample: u64 },
    /// Image organisation the scanline reader cannot handle
    UnsupportedLayout(String),
    /// Directory index past the end of the chain
    DirectoryOutOfRange { index: usize, count: usize },
    /// The input could not be opened as a TIFF container
    CannotOpenInput { path: String, reason: Box<TiffError> },
    /// An output file could not be created or written
    CannotWriteOutput { path: String, source: io::Error },
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::IoError(e) => write!(f, "I/O error: {}", e),
            TiffError::InvalidHeader => write!(f, "Invalid TIFF header"),
            TiffError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            TiffError::InvalidBigTIFFHeader => write!(f, "Invalid BigTIFF header"),
            TiffError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            TiffError::TagNotFound(tag) => write!(f, "Tag not found: {}", tag),
            TiffError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            TiffError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            TiffError::MissingDimensions => write!(f, "Image dimensions not found"),
            TiffError::UnsupportedPredictor { predictor, bits_per_sample } => write!(
                f, "Unsupported predictor {} for {}-bit samples", predictor, bits_per_sample),
            TiffError::UnsupportedLayout(msg) => write!(f, "Unsupported image layout: {}", msg),
            TiffError::DirectoryOutOfRange { index, count } => write!(
                f, "Directory {} out of range ({} directories)", index, count),
            TiffError::CannotOpenInput { path, reason } => write!(f, "cannot open tiff '{}': {}", path, reason),
            TiffError::CannotWriteOutput { path, source } => write!(f, "cannot write '{}': {}", path, source),
            TiffError::GenericError(msg) => write!(f, "TIFF error: {}", msg),
        }
    }
}

impl std::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TiffError::IoError(e) => Some(e),
            TiffError::CannotOpenInput { reason, .. } => Some(reason.as_ref()),
            TiffError::CannotWriteOutput { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        TiffError::IoError(error)
    }
}

/// Result type for TIFF operations
pub type TiffResult<T> = Result<T, TiffError>;

impl From<String> for TiffError {
    fn from(msg: String) -> Self {
        TiffError::GenericError(msg)
    }
}

impl TiffError {
    /// Wraps an I/O failure on an output file with the offending path
    pub fn output(path: &str, source: io::Error) -> Self {
        TiffError::CannotWriteOutput { path: path.to_string(), source }
    }
}
