//! Shared fixtures for integration tests
//!
//! [`StackBuilder`] writes small multi-page classic TIFFs in either byte
//! order, optionally deflate-compressed and split into several strips.

#![allow(dead_code)]

use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::Path;

const SHORT: u16 = 3;
const LONG: u16 = 4;

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One page of a fixture stack
#[derive(Clone)]
pub struct Page {
    pub width: u32,
    pub height: u32,
    pub bits_per_sample: u16,
    pub samples_per_pixel: u16,
    pub sample_format: Option<u16>,
    /// Decoded pixel bytes, row-major, `scanline_size * height` long
    pub data: Vec<u8>,
}

impl Page {
    /// An 8-bit gray page with a different byte at every position
    pub fn gray8(width: u32, height: u32, seed: u8) -> Self {
        let data = (0..width * height)
            .map(|i| seed.wrapping_mul(31).wrapping_add(i as u8))
            .collect();
        Page { width, height, bits_per_sample: 8, samples_per_pixel: 1, sample_format: None, data }
    }

    /// An 8-bit RGB page with interleaved samples, all distinct per row
    pub fn rgb8(width: u32, height: u32, seed: u8) -> Self {
        let data = (0..width * height * 3)
            .map(|i| seed.wrapping_mul(17).wrapping_add((i * 7) as u8))
            .collect();
        Page { width, height, bits_per_sample: 8, samples_per_pixel: 3, sample_format: None, data }
    }

    /// A 16-bit gray page; `data` holds samples in the fixture's byte order
    pub fn gray16(width: u32, height: u32, samples: &[u16], big_endian: bool) -> Self {
        let mut data = vec![0u8; samples.len() * 2];
        if big_endian {
            BigEndian::write_u16_into(samples, &mut data);
        } else {
            LittleEndian::write_u16_into(samples, &mut data);
        }
        Page { width, height, bits_per_sample: 16, samples_per_pixel: 1, sample_format: None, data }
    }

    pub fn with_sample_format(mut self, code: u16) -> Self {
        self.sample_format = Some(code);
        self
    }

    pub fn scanline_size(&self) -> usize {
        (self.width as usize * self.samples_per_pixel as usize * self.bits_per_sample as usize).div_ceil(8)
    }
}

enum Values {
    Short(Vec<u16>),
    Long(Vec<u32>),
}

impl Values {
    fn field_type(&self) -> u16 {
        match self {
            Values::Short(_) => SHORT,
            Values::Long(_) => LONG,
        }
    }

    fn count(&self) -> u32 {
        match self {
            Values::Short(v) => v.len() as u32,
            Values::Long(v) => v.len() as u32,
        }
    }

    fn write<B: ByteOrder>(&self, out: &mut Vec<u8>) {
        match self {
            Values::Short(v) => v.iter().for_each(|&x| out.write_u16::<B>(x).unwrap()),
            Values::Long(v) => v.iter().for_each(|&x| out.write_u32::<B>(x).unwrap()),
        }
    }

    fn byte_len(&self) -> usize {
        match self {
            Values::Short(v) => v.len() * 2,
            Values::Long(v) => v.len() * 4,
        }
    }
}

/// Builder for multi-page TIFF fixtures
pub struct StackBuilder {
    big_endian: bool,
    compression: u16,
    rows_per_strip: Option<u32>,
    predictor: bool,
    pages: Vec<Page>,
}

impl StackBuilder {
    pub fn new() -> Self {
        StackBuilder { big_endian: false, compression: 1, rows_per_strip: None, predictor: false, pages: Vec::new() }
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    pub fn deflate(mut self) -> Self {
        self.compression = 8;
        self
    }

    /// Declares a compression code without compressing the strips
    pub fn compression_code(mut self, code: u16) -> Self {
        self.compression = code;
        self
    }

    /// Applies horizontal differencing to 8-bit pages before compression
    pub fn horizontal_predictor(mut self) -> Self {
        self.predictor = true;
        self
    }

    pub fn rows_per_strip(mut self, rows: u32) -> Self {
        self.rows_per_strip = Some(rows);
        self
    }

    pub fn page(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }

    pub fn pages(mut self, pages: impl IntoIterator<Item = Page>) -> Self {
        self.pages.extend(pages);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        if self.big_endian {
            self.build_with::<BigEndian>(*b"MM")
        } else {
            self.build_with::<LittleEndian>(*b"II")
        }
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.build()).unwrap();
    }

    fn encode_strip(&self, page: &Page, rows: &[u8]) -> Vec<u8> {
        let mut rows = rows.to_vec();
        if self.predictor && page.bits_per_sample == 8 {
            let stride = page.samples_per_pixel as usize;
            for row in rows.chunks_mut(page.scanline_size()) {
                for i in (stride..row.len()).rev() {
                    row[i] = row[i].wrapping_sub(row[i - stride]);
                }
            }
        }

        if self.compression == 8 {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&rows).unwrap();
            encoder.finish().unwrap()
        } else {
            rows
        }
    }

    fn build_with<B: ByteOrder>(&self, marker: [u8; 2]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&marker);
        out.write_u16::<B>(42).unwrap();
        out.write_u32::<B>(0).unwrap();
        let mut next_pointer = 4usize;

        for page in &self.pages {
            let rows_per_strip = self.rows_per_strip.unwrap_or(page.height).max(1);
            let strip_len = rows_per_strip as usize * page.scanline_size();

            let mut offsets = Vec::new();
            let mut counts = Vec::new();
            for rows in page.data.chunks(strip_len.max(1)) {
                let encoded = self.encode_strip(page, rows);
                offsets.push(out.len() as u32);
                counts.push(encoded.len() as u32);
                out.extend_from_slice(&encoded);
            }

            let mut entries: Vec<(u16, Values)> = vec![
                (256, Values::Long(vec![page.width])),
                (257, Values::Long(vec![page.height])),
                (258, Values::Short(vec![page.bits_per_sample; page.samples_per_pixel as usize])),
                (259, Values::Short(vec![self.compression])),
                (262, Values::Short(vec![if page.samples_per_pixel >= 3 { 2 } else { 1 }])),
                (273, Values::Long(offsets)),
                (277, Values::Short(vec![page.samples_per_pixel])),
                (278, Values::Long(vec![rows_per_strip])),
                (279, Values::Long(counts)),
            ];
            if self.predictor {
                entries.push((317, Values::Short(vec![2])));
            }
            if let Some(code) = page.sample_format {
                entries.push((339, Values::Short(vec![code])));
            }

            // Arrays too large for the value field go before the IFD.
            let mut value_fields = Vec::new();
            for (_, values) in &entries {
                if values.byte_len() > 4 {
                    if out.len() % 2 == 1 {
                        out.push(0);
                    }
                    let offset = out.len() as u32;
                    values.write::<B>(&mut out);
                    let mut field = Vec::new();
                    field.write_u32::<B>(offset).unwrap();
                    value_fields.push(field);
                } else {
                    let mut field = Vec::new();
                    values.write::<B>(&mut field);
                    field.resize(4, 0);
                    value_fields.push(field);
                }
            }

            if out.len() % 2 == 1 {
                out.push(0);
            }
            let ifd_offset = out.len() as u32;
            B::write_u32(&mut out[next_pointer..next_pointer + 4], ifd_offset);

            out.write_u16::<B>(entries.len() as u16).unwrap();
            for ((tag, values), field) in entries.iter().zip(&value_fields) {
                out.write_u16::<B>(*tag).unwrap();
                out.write_u16::<B>(values.field_type()).unwrap();
                out.write_u32::<B>(values.count()).unwrap();
                out.extend_from_slice(field);
            }
            next_pointer = out.len();
            out.write_u32::<B>(0).unwrap();
        }

        out
    }
}
