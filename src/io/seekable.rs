//! Seekable input abstraction
//!
//! The decoder jumps between directory chains, tag arrays and strip data,
//! so every source it reads from must support random access.

use std::io::{Read, Seek};

/// Any source the TIFF decoder can read from: a buffered file on disk or
/// an in-memory cursor in tests.
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
