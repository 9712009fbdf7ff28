//! TIFF stack to raw volume export
//!
//! The pipeline probes the stack's dimensions, reads the sample layout
//! from page 0, copies every scanline into a raw file and optionally
//! describes the result with a detached NRRD header.

mod copier;
mod descriptor;
mod header;
mod metadata;
mod options;
mod prober;
mod source;

pub use copier::{CopyReport, RawCopier};
pub use descriptor::{nrrd_type, SampleFormat, VolumeDescriptor};
pub use header::{render_header, write_header};
pub use metadata::{log_summary, read_sample_metadata, SampleMetadata};
pub use options::ExportOptions;
pub use prober::{probe_dimensions, ProbeReport};
pub use source::VolumeSource;
