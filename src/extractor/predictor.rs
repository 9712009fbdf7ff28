//! Undoing the horizontal differencing predictor
//!
//! With Predictor=2 each sample is stored as the difference from the same
//! component of the previous pixel in the row. Decoding is a running sum
//! per component, done in the sample width and the file's byte order.

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::predictor;
use crate::tiff::errors::{TiffError, TiffResult};

/// Checks that a predictor can be undone for the given sample width
pub fn validate(predictor_code: u64, bits_per_sample: u64) -> TiffResult<()> {
    match (u16::try_from(predictor_code), bits_per_sample) {
        (Ok(predictor::NONE), _) => Ok(()),
        (Ok(predictor::HORIZONTAL_DIFFERENCING), 8 | 16 | 32) => Ok(()),
        _ => Err(TiffError::UnsupportedPredictor { predictor: predictor_code, bits_per_sample }),
    }
}

/// Accumulates horizontally differenced samples in place, row by row
///
/// `row_len` is the scanline size in bytes and `components` the number of
/// interleaved samples per pixel in a row.
pub fn apply_horizontal(
    data: &mut [u8],
    row_len: usize,
    components: usize,
    bits_per_sample: u64,
    byte_order: ByteOrder,
) {
    if row_len == 0 {
        return;
    }

    for row in data.chunks_mut(row_len) {
        match bits_per_sample {
            8 => {
                for i in components..row.len() {
                    row[i] = row[i].wrapping_add(row[i - components]);
                }
            },
            16 => {
                let stride = components * 2;
                let mut i = stride;
                while i + 2 <= row.len() {
                    let prev = byte_order.u16_from(&row[i - stride..]);
                    let cur = byte_order.u16_from(&row[i..]);
                    byte_order.u16_into(cur.wrapping_add(prev), &mut row[i..]);
                    i += 2;
                }
            },
            32 => {
                let stride = components * 4;
                let mut i = stride;
                while i + 4 <= row.len() {
                    let prev = byte_order.u32_from(&row[i - stride..]);
                    let cur = byte_order.u32_from(&row[i..]);
                    byte_order.u32_into(cur.wrapping_add(prev), &mut row[i..]);
                    i += 4;
                }
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_bit_rows_accumulate_independently() {
        let mut data = vec![10, 1, 1, 1, 20, 2, 2, 2];
        apply_horizontal(&mut data, 4, 1, 8, ByteOrder::LittleEndian);
        assert_eq!(data, vec![10, 11, 12, 13, 20, 22, 24, 26]);
    }

    #[test]
    fn eight_bit_components_accumulate_per_channel() {
        let mut data = vec![1, 100, 1, 1, 1, 1];
        apply_horizontal(&mut data, 6, 2, 8, ByteOrder::LittleEndian);
        assert_eq!(data, vec![1, 100, 2, 101, 3, 102]);
    }

    #[test]
    fn sixteen_bit_samples_respect_byte_order() {
        let mut le = vec![0x00, 0x01, 0x01, 0x00, 0xFF, 0xFF];
        apply_horizontal(&mut le, 6, 1, 16, ByteOrder::LittleEndian);
        assert_eq!(le, vec![0x00, 0x01, 0x01, 0x01, 0x00, 0x01]);

        let mut be = vec![0x01, 0x00, 0x00, 0x01];
        apply_horizontal(&mut be, 4, 1, 16, ByteOrder::BigEndian);
        assert_eq!(be, vec![0x01, 0x00, 0x01, 0x01]);
    }

    #[test]
    fn thirty_two_bit_samples_wrap() {
        let mut data = Vec::new();
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        data.extend_from_slice(&2u32.to_le_bytes());
        apply_horizontal(&mut data, 8, 1, 32, ByteOrder::LittleEndian);
        assert_eq!(u32::from_le_bytes(data[4..8].try_into().unwrap()), 1);
    }

    #[test]
    fn validation_rejects_floating_point_and_odd_widths() {
        assert!(validate(1, 12).is_ok());
        assert!(validate(2, 16).is_ok());
        assert!(validate(2, 12).is_err());
        assert!(validate(3, 32).is_err());
    }
}
