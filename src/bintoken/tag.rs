//! Wire tag byte constants.

// Null and boolean
pub const NULL: u8 = 0x80;
pub const TRUE: u8 = 0x81;
pub const FALSE: u8 = 0x82;

// Signed integers, little-endian two's complement
pub const INT8: u8 = 0x90;
pub const INT16: u8 = 0x91;
pub const INT32: u8 = 0x92;
pub const INT64: u8 = 0x93;

// Unsigned integers, little-endian
pub const UINT8: u8 = 0x94;
pub const UINT16: u8 = 0x95;
pub const UINT32: u8 = 0x96;
pub const UINT64: u8 = 0x97;

// IEEE-754 binary32/binary64/binary128, little-endian
pub const FLOAT32: u8 = 0x98;
pub const FLOAT64: u8 = 0x99;
pub const FLOAT128: u8 = 0x9A;

// Length-prefixed payloads. The low two bits select the prefix width:
// 0 = 8-bit, 1 = 16-bit, 2 = 32-bit, 3 = 64-bit.
pub const STRING8: u8 = 0xA0;
pub const STRING64: u8 = 0xA3;
pub const BINARY8: u8 = 0xA4;
pub const BINARY64: u8 = 0xA7;

// Structural
pub const BEGIN_RECORD: u8 = 0xB0;
pub const END_RECORD: u8 = 0xB1;
pub const BEGIN_ARRAY: u8 = 0xB2;
pub const END_ARRAY: u8 = 0xB3;
pub const BEGIN_ASSOC_ARRAY: u8 = 0xB4;
pub const END_ASSOC_ARRAY: u8 = 0xB5;

// Packed scalar arrays, four prefix widths per element type.
// Prefix holds the payload length in bytes.
pub const ARRAY_INT8: u8 = 0xC0;
pub const ARRAY_INT16: u8 = 0xC4;
pub const ARRAY_INT32: u8 = 0xC8;
pub const ARRAY_INT64: u8 = 0xCC;
pub const ARRAY_FLOAT32: u8 = 0xD0;
pub const ARRAY_FLOAT64: u8 = 0xD4;
pub const ARRAY_LAST: u8 = 0xD7;

pub(crate) const WIDTH_MASK: u8 = 0x03;
