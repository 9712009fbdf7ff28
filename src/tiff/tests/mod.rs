//! Unit tests for the TIFF decoding layer

mod byte_order_tests;
