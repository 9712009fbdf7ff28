//! Strip decompression for TIFF pages
//!
//! Each supported compression scheme is a strategy behind
//! [`CompressionHandler`]; the factory maps a page's Compression tag to one.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod zstd;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::DeflateHandler;
pub use factory::CompressionFactory;
pub use zstd::ZstdHandler;
