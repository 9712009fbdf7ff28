//! TIFF decoding layer
//!
//! Reads TIFF and BigTIFF containers: header and directory chain parsing,
//! tag value access, and a directory cursor ([`TiffHandle`]) that decodes
//! scanlines page by page.

pub mod errors;
pub mod ifd;
pub(crate) mod types;
pub mod reader;
pub mod handle;
pub mod constants;
pub(crate) mod validation;
pub mod tag_names;
mod dump;
#[cfg(test)]
mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use errors::{TiffError, TiffResult};
pub use handle::TiffHandle;
pub use ifd::{IFD, IFDEntry};
pub use reader::TiffReader;
pub use types::TIFF;
pub use constants::{sample_format, tags};
