//! Tests for the byte order module

use std::io::Cursor;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};

#[test]
fn test_byte_order_detection_little_endian() {
    let mut cursor = Cursor::new(b"II".to_vec());
    assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), ByteOrder::LittleEndian);
}

#[test]
fn test_byte_order_detection_big_endian() {
    let mut cursor = Cursor::new(b"MM".to_vec());
    assert_eq!(ByteOrder::detect(&mut cursor).unwrap(), ByteOrder::BigEndian);
}

#[test]
fn test_byte_order_detection_invalid() {
    let mut cursor = Cursor::new(b"P5".to_vec());
    assert!(ByteOrder::detect(&mut cursor).is_err());
}

#[test]
fn test_handlers_report_their_order() {
    assert_eq!(ByteOrder::LittleEndian.create_handler().byte_order(), ByteOrder::LittleEndian);
    assert_eq!(ByteOrder::BigEndian.create_handler().byte_order(), ByteOrder::BigEndian);
}

#[test]
fn test_little_endian_handler() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap();
    buffer.write_u32::<LittleEndian>(0x12345678).unwrap();
    buffer.write_u64::<LittleEndian>(0x1234567890ABCDEF).unwrap();
    buffer.write_u32::<LittleEndian>(72).unwrap();
    buffer.write_u32::<LittleEndian>(1).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = LittleEndianHandler;

    assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
    assert_eq!(handler.read_u64(&mut cursor).unwrap(), 0x1234567890ABCDEF);
    assert_eq!(handler.read_rational(&mut cursor).unwrap(), (72, 1));
}

#[test]
fn test_big_endian_handler() {
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x1234).unwrap();
    buffer.write_u32::<BigEndian>(0x12345678).unwrap();
    buffer.write_u64::<BigEndian>(0x1234567890ABCDEF).unwrap();
    let mut cursor = Cursor::new(buffer);

    let handler = BigEndianHandler;

    assert_eq!(handler.read_u16(&mut cursor).unwrap(), 0x1234);
    assert_eq!(handler.read_u32(&mut cursor).unwrap(), 0x12345678);
    assert_eq!(handler.read_u64(&mut cursor).unwrap(), 0x1234567890ABCDEF);
}

#[test]
fn test_slice_codecs_round_trip_per_order() {
    let mut bytes = [0u8; 4];
    ByteOrder::BigEndian.u16_into(0x0102, &mut bytes);
    assert_eq!(&bytes[..2], &[0x01, 0x02]);
    assert_eq!(ByteOrder::LittleEndian.u16_from(&bytes), 0x0201);

    ByteOrder::LittleEndian.u32_into(0x01020304, &mut bytes);
    assert_eq!(bytes, [0x04, 0x03, 0x02, 0x01]);
    assert_eq!(ByteOrder::BigEndian.u32_from(&bytes), 0x04030201);
}
