//! Volume shape and sample type

use std::fmt;

use crate::tiff::sample_format;

/// Numeric domain of a sample, as declared by the SampleFormat tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleFormat {
    #[default]
    UnsignedInt,
    SignedInt,
    Float,
    Void,
    ComplexInt,
    ComplexFloat,
    /// A code outside the TIFF 6.0 table
    Unknown(u16),
}

impl SampleFormat {
    pub fn from_code(code: u16) -> Self {
        match code {
            sample_format::UNSIGNED => SampleFormat::UnsignedInt,
            sample_format::SIGNED => SampleFormat::SignedInt,
            sample_format::IEEEFP => SampleFormat::Float,
            sample_format::VOID => SampleFormat::Void,
            sample_format::COMPLEX_INT => SampleFormat::ComplexInt,
            sample_format::COMPLEX_IEEEFP => SampleFormat::ComplexFloat,
            other => SampleFormat::Unknown(other),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            SampleFormat::UnsignedInt => sample_format::UNSIGNED,
            SampleFormat::SignedInt => sample_format::SIGNED,
            SampleFormat::Float => sample_format::IEEEFP,
            SampleFormat::Void => sample_format::VOID,
            SampleFormat::ComplexInt => sample_format::COMPLEX_INT,
            SampleFormat::ComplexFloat => sample_format::COMPLEX_IEEEFP,
            SampleFormat::Unknown(code) => *code,
        }
    }

    /// Human-readable label used in diagnostics
    pub fn label(&self) -> &'static str {
        sample_format::label(self.code())
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.label(), self.code())
    }
}

/// Shape and sample layout of a TIFF stack viewed as a volume
///
/// Width and height come from page 0; depth is the number of pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeDescriptor {
    pub width: u32,
    pub height: u32,
    pub depth: usize,
    pub bits_per_sample: u16,
    pub components_per_pixel: u16,
    pub sample_format: SampleFormat,
}

impl VolumeDescriptor {
    /// NRRD type name for this volume's samples
    pub fn nrrd_type(&self) -> &'static str {
        nrrd_type(self.bits_per_sample, self.sample_format)
    }
}

/// Maps a sample width and format to an NRRD type name
///
/// Combinations NRRD has no scalar type for map to `"unknown"`.
pub fn nrrd_type(bits_per_sample: u16, format: SampleFormat) -> &'static str {
    match (format, bits_per_sample) {
        (SampleFormat::UnsignedInt, 8) => "uint8",
        (SampleFormat::UnsignedInt, 16) => "uint16",
        (SampleFormat::UnsignedInt, 32) => "uint32",
        (SampleFormat::UnsignedInt, 64) => "uint64",
        (SampleFormat::SignedInt, 8) => "int8",
        (SampleFormat::SignedInt, 16) => "int16",
        (SampleFormat::SignedInt, 32) => "int32",
        (SampleFormat::SignedInt, 64) => "int64",
        (SampleFormat::Float, 32) => "float",
        (SampleFormat::Float, 64) => "double",
        _ => "unknown",
    }
}
