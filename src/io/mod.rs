//! Low-level I/O for the TIFF decoding layer
//!
//! Readers that can seek, and the byte order strategies used to decode
//! multi-byte values from them.

pub mod seekable;
pub mod byte_order;
