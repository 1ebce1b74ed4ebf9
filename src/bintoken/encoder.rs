//! Push encoder into a [`Buffer`].

use super::float128;
use super::token::{Code, Element, Width};
use crate::buffer::Buffer;
use crate::ErrorKind;

/// Writes single tokens. Structural balance is checked one layer up by
/// [`Writer`](super::Writer).
///
/// Every call returns the number of bytes written, or
/// [`ErrorKind::BufferFull`] when the buffer refuses to grow. Nothing is
/// written on failure.
///
/// # Examples
///
/// ```rust
/// use bintoken::bintoken::Encoder;
///
/// let mut encoder = Encoder::new(Vec::new());
/// assert_eq!(encoder.value(&300u16), Ok(3));
/// assert_eq!(encoder.value("hi"), Ok(4));
/// assert_eq!(encoder.into_inner(), vec![0x95, 0x2C, 0x01, 0xA0, 0x02, b'h', b'i']);
/// ```
#[derive(Debug)]
pub struct Encoder<B> {
    buffer: B,
}

impl<B: Buffer> Encoder<B> {
    pub fn new(buffer: B) -> Self {
        Encoder { buffer }
    }

    pub fn into_inner(self) -> B {
        self.buffer
    }

    pub fn get_ref(&self) -> &B {
        &self.buffer
    }

    pub fn value<T: Encode + ?Sized>(&mut self, value: &T) -> Result<usize, ErrorKind> {
        value.encode(self)
    }

    /// Writes a token without payload: null, booleans and structural codes.
    pub fn code(&mut self, code: Code) -> Result<usize, ErrorKind> {
        match (code.tag(), code.fixed_size()) {
            (Some(byte), Some(0)) => {
                self.reserve(1)?;
                self.buffer.write_byte(byte);
                Ok(1)
            }
            _ => Err(ErrorKind::UnexpectedToken),
        }
    }

    /// Writes an `f64` as an extended (binary128) real.
    pub fn extended(&mut self, value: f64) -> Result<usize, ErrorKind> {
        self.fixed(Code::Float128, &float128::from_f64(value).to_le_bytes())
    }

    /// Writes a run of structural codes with a single reservation, so either
    /// all of them land in the buffer or none do.
    pub(crate) fn codes(&mut self, codes: &[Code]) -> Result<usize, ErrorKind> {
        let mut bytes = Vec::with_capacity(codes.len());
        for code in codes {
            match (code.tag(), code.fixed_size()) {
                (Some(byte), Some(0)) => bytes.push(byte),
                _ => return Err(ErrorKind::UnexpectedToken),
            }
        }
        self.reserve(bytes.len())?;
        self.buffer.write_bytes(&bytes);
        Ok(bytes.len())
    }

    fn reserve(&mut self, n: usize) -> Result<(), ErrorKind> {
        if self.buffer.grow(n) {
            Ok(())
        } else {
            Err(ErrorKind::BufferFull)
        }
    }

    fn fixed(&mut self, code: Code, payload: &[u8]) -> Result<usize, ErrorKind> {
        let tag = code.tag().ok_or(ErrorKind::UnexpectedToken)?;
        self.reserve(1 + payload.len())?;
        self.buffer.write_byte(tag);
        self.buffer.write_bytes(payload);
        Ok(1 + payload.len())
    }

    /// Writes the tag and the narrowest length prefix for `len` payload bytes.
    fn header(&mut self, code: impl FnOnce(Width) -> Code, len: usize) -> Result<usize, ErrorKind> {
        let width = Width::for_len(len);
        let tag = code(width).tag().ok_or(ErrorKind::UnexpectedToken)?;
        let total = 1 + width.size() + len;
        self.reserve(total)?;
        self.buffer.write_byte(tag);
        let len = len as u64;
        match width {
            Width::W8 => self.buffer.write_byte(len as u8),
            Width::W16 => self.buffer.write_bytes(&(len as u16).to_le_bytes()),
            Width::W32 => self.buffer.write_bytes(&(len as u32).to_le_bytes()),
            Width::W64 => self.buffer.write_bytes(&len.to_le_bytes()),
        }
        Ok(total)
    }

    fn prefixed(&mut self, code: impl FnOnce(Width) -> Code, payload: &[u8]) -> Result<usize, ErrorKind> {
        let total = self.header(code, payload.len())?;
        self.buffer.write_bytes(payload);
        Ok(total)
    }
}

/// Types that can be written as a single token.
pub trait Encode {
    fn encode<B: Buffer>(&self, encoder: &mut Encoder<B>) -> Result<usize, ErrorKind>;

    /// Whether this value encodes as the `null` token.
    fn is_null(&self) -> bool {
        false
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode<B: Buffer>(&self, encoder: &mut Encoder<B>) -> Result<usize, ErrorKind> {
        (**self).encode(encoder)
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

impl Encode for () {
    fn encode<B: Buffer>(&self, encoder: &mut Encoder<B>) -> Result<usize, ErrorKind> {
        encoder.code(Code::Null)
    }

    fn is_null(&self) -> bool {
        true
    }
}

impl Encode for bool {
    fn encode<B: Buffer>(&self, encoder: &mut Encoder<B>) -> Result<usize, ErrorKind> {
        encoder.code(if *self { Code::True } else { Code::False })
    }
}

macro_rules! encode_fixed {
    ($($t:ty => $code:ident),*) => {$(
        impl Encode for $t {
            fn encode<B: Buffer>(&self, encoder: &mut Encoder<B>) -> Result<usize, ErrorKind> {
                encoder.fixed(Code::$code, &self.to_le_bytes())
            }
        }
    )*};
}

encode_fixed!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64
);

impl Encode for str {
    fn encode<B: Buffer>(&self, encoder: &mut Encoder<B>) -> Result<usize, ErrorKind> {
        encoder.prefixed(Code::String, self.as_bytes())
    }
}

impl Encode for String {
    fn encode<B: Buffer>(&self, encoder: &mut Encoder<B>) -> Result<usize, ErrorKind> {
        self.as_str().encode(encoder)
    }
}

impl Encode for char {
    fn encode<B: Buffer>(&self, encoder: &mut Encoder<B>) -> Result<usize, ErrorKind> {
        let mut scratch = [0u8; 4];
        self.encode_utf8(&mut scratch).encode(encoder)
    }
}

impl Encode for [u8] {
    fn encode<B: Buffer>(&self, encoder: &mut Encoder<B>) -> Result<usize, ErrorKind> {
        encoder.prefixed(Code::Binary, self)
    }
}

macro_rules! encode_array {
    ($($t:ty => $element:ident),*) => {$(
        impl Encode for [$t] {
            fn encode<B: Buffer>(&self, encoder: &mut Encoder<B>) -> Result<usize, ErrorKind> {
                let len = self.len() * std::mem::size_of::<$t>();
                let total = encoder.header(|width| Code::Array(Element::$element, width), len)?;
                for item in self {
                    encoder.buffer.write_bytes(&item.to_le_bytes());
                }
                Ok(total)
            }
        }
    )*};
}

encode_array!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64
);

impl<T> Encode for Vec<T>
where
    [T]: Encode,
{
    fn encode<B: Buffer>(&self, encoder: &mut Encoder<B>) -> Result<usize, ErrorKind> {
        self.as_slice().encode(encoder)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode<B: Buffer>(&self, encoder: &mut Encoder<B>) -> Result<usize, ErrorKind> {
        match self {
            Some(value) => value.encode(encoder),
            None => encoder.code(Code::Null),
        }
    }

    fn is_null(&self) -> bool {
        self.as_ref().map_or(true, Encode::is_null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::SliceBuffer;

    fn encode<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
        let mut encoder = Encoder::new(Vec::new());
        encoder.value(value).unwrap();
        encoder.into_inner()
    }

    #[test]
    fn test_scalars_are_little_endian() {
        assert_eq!(encode(&true), vec![0x81]);
        assert_eq!(encode(&false), vec![0x82]);
        assert_eq!(encode(&()), vec![0x80]);
        assert_eq!(encode(&-1i8), vec![0x90, 0xFF]);
        assert_eq!(encode(&0x0102_0304i32), vec![0x92, 0x04, 0x03, 0x02, 0x01]);
        assert_eq!(encode(&u64::MAX), [vec![0x97], vec![0xFF; 8]].concat());
        assert_eq!(encode(&1.0f32), vec![0x98, 0x00, 0x00, 0x80, 0x3F]);
    }

    #[test]
    fn test_length_prefix_is_compacted() {
        let short = "a".repeat(255);
        let bytes = encode(short.as_str());
        assert_eq!(&bytes[..2], &[0xA0, 0xFF]);
        assert_eq!(bytes.len(), 2 + 255);

        let medium = "a".repeat(256);
        let bytes = encode(medium.as_str());
        assert_eq!(&bytes[..3], &[0xA1, 0x00, 0x01]);

        let long = vec![0u8; 65_536];
        let bytes = encode(long.as_slice());
        assert_eq!(&bytes[..5], &[0xA6, 0x00, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn test_packed_arrays() {
        assert_eq!(
            encode(&vec![1i16, -1]),
            vec![0xC4, 0x04, 0x01, 0x00, 0xFF, 0xFF]
        );
        assert_eq!(encode(&Vec::<f64>::new()), vec![0xD4, 0x00]);
    }

    #[test]
    fn test_extended() {
        let mut encoder = Encoder::new(Vec::new());
        assert_eq!(encoder.extended(1.0), Ok(17));
        let bytes = encoder.into_inner();
        assert_eq!(bytes[0], 0x9A);
        assert_eq!(&bytes[15..], &[0xFF, 0x3F]);
    }

    #[test]
    fn test_code_rejects_payload_codes() {
        let mut encoder = Encoder::new(Vec::new());
        assert_eq!(encoder.code(Code::BeginArray), Ok(1));
        assert_eq!(encoder.code(Code::Int32), Err(ErrorKind::UnexpectedToken));
        assert_eq!(encoder.code(Code::End), Err(ErrorKind::UnexpectedToken));
        assert_eq!(encoder.into_inner(), vec![0xB2]);
    }

    #[test]
    fn test_full_buffer() {
        let mut storage = [0u8; 4];
        let mut encoder = Encoder::new(SliceBuffer::new(&mut storage));
        assert_eq!(encoder.value(&7u16), Ok(3));
        assert_eq!(encoder.value(&7u16), Err(ErrorKind::BufferFull));
        assert_eq!(encoder.value(&true), Ok(1));
        assert_eq!(encoder.get_ref().as_slice(), &[0x95, 0x07, 0x00, 0x81]);
    }
}
