//! Pull decoder over a byte slice.
//!
//! The decoder is always positioned on a current token. Malformed input turns
//! the current code into [`Code::Error`] and pins the position on the bad
//! token; further calls to [`Decoder::next`] keep reporting the same error.

use super::float128;
use super::token::{Code, Element, Width};
use crate::token::{Category, Symbol};
use crate::ErrorKind;
use log::{debug, trace};

/// Zero-copy token scanner.
///
/// # Examples
///
/// ```rust
/// use bintoken::bintoken::{Code, Decoder};
///
/// let mut decoder = Decoder::new(&[0x92, 0x2A, 0x00, 0x00, 0x00, 0x80]);
/// assert_eq!(decoder.code(), Code::Int32);
/// assert_eq!(decoder.value::<i32>(), Ok(42));
/// assert_eq!(decoder.next(), Code::Null);
/// assert_eq!(decoder.next(), Code::End);
/// ```
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    // Input starting at the current token
    input: &'a [u8],
    offset: usize,
    code: Code,
    literal: &'a [u8],
    size: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        let mut decoder = Decoder {
            input,
            offset: 0,
            code: Code::End,
            literal: &[],
            size: 0,
        };
        decoder.scan();
        decoder
    }

    /// Advances to the next token and returns its code.
    pub fn next(&mut self) -> Code {
        if matches!(self.code, Code::End | Code::Error(_)) {
            return self.code;
        }
        self.input = &self.input[self.size..];
        self.offset += self.size;
        self.scan();
        self.code
    }

    #[inline]
    #[must_use]
    pub fn code(&self) -> Code {
        self.code
    }

    #[inline]
    #[must_use]
    pub fn symbol(&self) -> Symbol {
        self.code.symbol()
    }

    #[inline]
    #[must_use]
    pub fn category(&self) -> Category {
        self.code.category()
    }

    /// The error of the current token, if it is an error token.
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<ErrorKind> {
        self.code.error()
    }

    /// Payload bytes of the current token, after the tag and length prefix.
    #[inline]
    #[must_use]
    pub fn literal(&self) -> &'a [u8] {
        self.literal
    }

    /// Input from the start of the current token onwards.
    #[inline]
    #[must_use]
    pub fn tail(&self) -> &'a [u8] {
        self.input
    }

    /// Byte offset of the current token within the original input.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Extracts the current token as `T`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::IncompatibleType`] if the token cannot represent a `T`,
    /// [`ErrorKind::Overflow`] if the number does not fit, and
    /// [`ErrorKind::InvalidValue`] for strings that are not UTF-8.
    pub fn value<T: Decode<'a>>(&self) -> Result<T, ErrorKind> {
        T::decode(self.code, self.literal)
    }

    fn scan(&mut self) {
        let (byte, rest) = match self.input.split_first() {
            Some((&byte, rest)) => (byte, rest),
            None => {
                self.code = Code::End;
                self.literal = &[];
                self.size = 0;
                return;
            }
        };
        let code = match Code::from_tag(byte) {
            Some(code) => code,
            None => return self.fail(ErrorKind::UnknownToken),
        };
        let prefix = match code {
            Code::String(width) | Code::Binary(width) | Code::Array(_, width) => Some(width),
            _ => None,
        };
        let (start, len) = match prefix {
            Some(width) => match read_length(rest, width) {
                Ok(len) => (width.size(), len),
                Err(kind) => return self.fail(kind),
            },
            None => (0, code.fixed_size().unwrap_or(0)),
        };
        if rest.len() - start < len {
            return self.fail(ErrorKind::UnexpectedEnd);
        }
        if let Code::Array(element, _) = code {
            if len % element.size() != 0 {
                return self.fail(ErrorKind::InvalidLength);
            }
        }
        trace!("token {:?} at offset {} ({} bytes)", code, self.offset, len);
        self.code = code;
        self.literal = &rest[start..start + len];
        self.size = 1 + start + len;
    }

    fn fail(&mut self, kind: ErrorKind) {
        debug!("{} at offset {}", kind, self.offset);
        self.code = Code::Error(kind);
        self.literal = &[];
        self.size = 0;
    }
}

fn read_length(bytes: &[u8], width: Width) -> Result<usize, ErrorKind> {
    if bytes.len() < width.size() {
        return Err(ErrorKind::UnexpectedEnd);
    }
    let len = match width {
        Width::W8 => u64::from(bytes[0]),
        Width::W16 => u64::from(u16::from_le_bytes(le(bytes))),
        Width::W32 => u64::from(u32::from_le_bytes(le(bytes))),
        Width::W64 => u64::from_le_bytes(le(bytes)),
    };
    if width == Width::W64 && len > i64::MAX as u64 {
        return Err(ErrorKind::NegativeLength);
    }
    let len = usize::try_from(len).map_err(|_| ErrorKind::Overflow)?;
    if Width::for_len(len) != width {
        return Err(ErrorKind::InvalidLength);
    }
    Ok(len)
}

/// Copies the first `N` bytes into an array. Callers check the length first.
#[inline]
pub(crate) fn le<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

/// Rejects a fixed-width payload of the wrong size, so that [`Decode`]
/// never panics on literals it did not get from a [`Decoder`].
fn sized(code: Code, literal: &[u8]) -> Result<(), ErrorKind> {
    match code.fixed_size() {
        Some(size) if size != literal.len() => Err(ErrorKind::InvalidLength),
        _ => Ok(()),
    }
}

fn integer(code: Code, literal: &[u8]) -> Result<i128, ErrorKind> {
    sized(code, literal)?;
    let value = match code {
        Code::Int8 => i128::from(i8::from_le_bytes(le(literal))),
        Code::Int16 => i128::from(i16::from_le_bytes(le(literal))),
        Code::Int32 => i128::from(i32::from_le_bytes(le(literal))),
        Code::Int64 => i128::from(i64::from_le_bytes(le(literal))),
        Code::UInt8 => i128::from(literal[0]),
        Code::UInt16 => i128::from(u16::from_le_bytes(le(literal))),
        Code::UInt32 => i128::from(u32::from_le_bytes(le(literal))),
        Code::UInt64 => i128::from(u64::from_le_bytes(le(literal))),
        _ => return Err(ErrorKind::IncompatibleType),
    };
    Ok(value)
}

fn real(code: Code, literal: &[u8]) -> Result<f64, ErrorKind> {
    sized(code, literal)?;
    match code {
        Code::Float32 => Ok(f64::from(f32::from_le_bytes(le(literal)))),
        Code::Float64 => Ok(f64::from_le_bytes(le(literal))),
        Code::Float128 => float128::to_f64(u128::from_le_bytes(le(literal))),
        _ => Err(ErrorKind::IncompatibleType),
    }
}

/// Types that can be extracted from the current token.
///
/// `literal` is the token payload as [`Decoder::literal`] reports it. A
/// fixed-width payload of any other size fails with
/// [`ErrorKind::InvalidLength`].
pub trait Decode<'a>: Sized {
    fn decode(code: Code, literal: &'a [u8]) -> Result<Self, ErrorKind>;
}

macro_rules! decode_integer {
    ($($t:ty),*) => {$(
        impl<'a> Decode<'a> for $t {
            fn decode(code: Code, literal: &'a [u8]) -> Result<Self, ErrorKind> {
                let value = integer(code, literal)?;
                <$t>::try_from(value).map_err(|_| ErrorKind::Overflow)
            }
        }
    )*};
}

decode_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl<'a> Decode<'a> for f64 {
    fn decode(code: Code, literal: &'a [u8]) -> Result<Self, ErrorKind> {
        real(code, literal)
    }
}

impl<'a> Decode<'a> for f32 {
    fn decode(code: Code, literal: &'a [u8]) -> Result<Self, ErrorKind> {
        if code == Code::Float32 {
            sized(code, literal)?;
            return Ok(f32::from_le_bytes(le(literal)));
        }
        let value = real(code, literal)?;
        if value.is_finite() && value.abs() > f64::from(f32::MAX) {
            return Err(ErrorKind::Overflow);
        }
        Ok(value as f32)
    }
}

impl<'a> Decode<'a> for bool {
    fn decode(code: Code, _literal: &'a [u8]) -> Result<Self, ErrorKind> {
        match code {
            Code::True => Ok(true),
            Code::False => Ok(false),
            _ => Err(ErrorKind::IncompatibleType),
        }
    }
}

impl<'a> Decode<'a> for () {
    fn decode(code: Code, _literal: &'a [u8]) -> Result<Self, ErrorKind> {
        match code {
            Code::Null => Ok(()),
            _ => Err(ErrorKind::IncompatibleType),
        }
    }
}

impl<'a> Decode<'a> for &'a str {
    fn decode(code: Code, literal: &'a [u8]) -> Result<Self, ErrorKind> {
        match code {
            Code::String(_) => std::str::from_utf8(literal).map_err(|_| ErrorKind::InvalidValue),
            _ => Err(ErrorKind::IncompatibleType),
        }
    }
}

impl<'a> Decode<'a> for String {
    fn decode(code: Code, literal: &'a [u8]) -> Result<Self, ErrorKind> {
        <&str>::decode(code, literal).map(str::to_owned)
    }
}

impl<'a> Decode<'a> for &'a [u8] {
    fn decode(code: Code, literal: &'a [u8]) -> Result<Self, ErrorKind> {
        match code {
            Code::Binary(_) => Ok(literal),
            _ => Err(ErrorKind::IncompatibleType),
        }
    }
}

impl<'a, T: Decode<'a>> Decode<'a> for Option<T> {
    fn decode(code: Code, literal: &'a [u8]) -> Result<Self, ErrorKind> {
        match code {
            Code::Null => Ok(None),
            _ => T::decode(code, literal).map(Some),
        }
    }
}

macro_rules! decode_array {
    ($($t:ty => $element:ident),*) => {$(
        impl<'a> Decode<'a> for Vec<$t> {
            fn decode(code: Code, literal: &'a [u8]) -> Result<Self, ErrorKind> {
                match code {
                    Code::Array(Element::$element, _) => Ok(literal
                        .chunks_exact(std::mem::size_of::<$t>())
                        .map(|chunk| <$t>::from_le_bytes(le(chunk)))
                        .collect()),
                    _ => Err(ErrorKind::IncompatibleType),
                }
            }
        }
    )*};
}

decode_array!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64
);

impl<'a> Decode<'a> for Vec<u8> {
    fn decode(code: Code, literal: &'a [u8]) -> Result<Self, ErrorKind> {
        <&[u8]>::decode(code, literal).map(<[u8]>::to_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_end() {
        let mut decoder = Decoder::new(&[]);
        assert_eq!(decoder.code(), Code::End);
        assert_eq!(decoder.next(), Code::End);
        assert_eq!(decoder.category(), Category::Status);
    }

    #[test]
    fn test_scalars() {
        let input = [
            0x80, 0x81, 0x82, 0x90, 0xFF, 0x95, 0x34, 0x12, 0x90, 0x00, 0x90, 0x05,
        ];
        let mut decoder = Decoder::new(&input);
        assert_eq!(decoder.code(), Code::Null);
        assert_eq!(decoder.value::<()>(), Ok(()));
        assert_eq!(decoder.next(), Code::True);
        assert_eq!(decoder.value::<bool>(), Ok(true));
        assert_eq!(decoder.next(), Code::False);
        assert_eq!(decoder.next(), Code::Int8);
        assert_eq!(decoder.value::<i8>(), Ok(-1));
        assert_eq!(decoder.value::<i64>(), Ok(-1));
        assert_eq!(decoder.value::<u8>(), Err(ErrorKind::Overflow));
        assert_eq!(decoder.next(), Code::UInt16);
        assert_eq!(decoder.value::<u16>(), Ok(0x1234));
        assert_eq!(decoder.value::<i8>(), Err(ErrorKind::Overflow));
        assert_eq!(decoder.value::<f64>(), Err(ErrorKind::IncompatibleType));
        assert_eq!(decoder.next(), Code::Int8);
        assert_eq!(decoder.literal(), &[0x00]);
        assert_eq!(decoder.next(), Code::Int8);
    }

    #[test]
    fn test_literal_is_a_view_into_the_input() {
        let input = [0xA0, 0x03, b'a', b'b', b'c', 0x80];
        let mut decoder = Decoder::new(&input);
        assert_eq!(decoder.code(), Code::String(Width::W8));
        assert_eq!(decoder.literal(), b"abc");
        assert_eq!(decoder.value::<&str>(), Ok("abc"));
        assert_eq!(decoder.literal().as_ptr(), input[2..].as_ptr());
        assert_eq!(decoder.next(), Code::Null);
        assert_eq!(decoder.offset(), 5);
    }

    #[test]
    fn test_unknown_tag_pins_position() {
        let input = [0x80, 0x00, 0x80];
        let mut decoder = Decoder::new(&input);
        assert_eq!(decoder.next(), Code::Error(ErrorKind::UnknownToken));
        assert_eq!(decoder.tail(), &input[1..]);
        assert_eq!(decoder.offset(), 1);
        assert_eq!(decoder.next(), Code::Error(ErrorKind::UnknownToken));
        assert_eq!(decoder.tail(), &input[1..]);
    }

    #[test]
    fn test_truncated_payloads() {
        assert_eq!(
            Decoder::new(&[0x92, 0x01, 0x02]).code(),
            Code::Error(ErrorKind::UnexpectedEnd)
        );
        assert_eq!(
            Decoder::new(&[0xA1, 0x01]).code(),
            Code::Error(ErrorKind::UnexpectedEnd)
        );
        assert_eq!(
            Decoder::new(&[0xA0, 0x04, b'a']).code(),
            Code::Error(ErrorKind::UnexpectedEnd)
        );
    }

    #[test]
    fn test_negative_length() {
        let mut input = vec![0xA3];
        input.extend_from_slice(&u64::MAX.to_le_bytes());
        assert_eq!(
            Decoder::new(&input).code(),
            Code::Error(ErrorKind::NegativeLength)
        );
    }

    #[test]
    fn test_non_canonical_length() {
        // Length 3 fits in 8 bits but is written with a 16-bit prefix
        let input = [0xA1, 0x03, 0x00, b'a', b'b', b'c'];
        assert_eq!(
            Decoder::new(&input).code(),
            Code::Error(ErrorKind::InvalidLength)
        );
    }

    #[test]
    fn test_packed_array_length_must_match_element_size() {
        let input = [0xC8, 0x03, 1, 2, 3];
        assert_eq!(
            Decoder::new(&input).code(),
            Code::Error(ErrorKind::InvalidLength)
        );

        let input = [0xC8, 0x08, 1, 0, 0, 0, 0xFE, 0xFF, 0xFF, 0xFF];
        let decoder = Decoder::new(&input);
        assert_eq!(decoder.symbol(), Symbol::Array);
        assert_eq!(decoder.value::<Vec<i32>>(), Ok(vec![1, -2]));
        assert_eq!(
            decoder.value::<Vec<i64>>(),
            Err(ErrorKind::IncompatibleType)
        );
    }

    #[test]
    fn test_invalid_utf8() {
        let input = [0xA0, 0x02, 0xC3, 0x28];
        let decoder = Decoder::new(&input);
        assert_eq!(decoder.value::<&str>(), Err(ErrorKind::InvalidValue));
        assert_eq!(decoder.value::<bool>(), Err(ErrorKind::IncompatibleType));
    }

    #[test]
    fn test_float_narrowing() {
        let mut input = vec![0x99];
        input.extend_from_slice(&1e300f64.to_le_bytes());
        let decoder = Decoder::new(&input);
        assert_eq!(decoder.value::<f64>(), Ok(1e300));
        assert_eq!(decoder.value::<f32>(), Err(ErrorKind::Overflow));

        let mut input = vec![0x99];
        input.extend_from_slice(&f64::INFINITY.to_le_bytes());
        assert_eq!(Decoder::new(&input).value::<f32>(), Ok(f32::INFINITY));
    }

    #[test]
    fn test_decode_checks_payload_size() {
        assert_eq!(u32::decode(Code::UInt32, &[1]), Err(ErrorKind::InvalidLength));
        assert_eq!(u8::decode(Code::UInt8, &[]), Err(ErrorKind::InvalidLength));
        assert_eq!(f32::decode(Code::Float32, &[0; 8]), Err(ErrorKind::InvalidLength));
        assert_eq!(f64::decode(Code::Float128, &[0; 8]), Err(ErrorKind::InvalidLength));
        assert_eq!(i16::decode(Code::Int16, &[0xFE, 0xFF]), Ok(-2));
    }

    #[test]
    fn test_option() {
        let decoder = Decoder::new(&[0x80]);
        assert_eq!(decoder.value::<Option<i32>>(), Ok(None));
        let decoder = Decoder::new(&[0x94, 0x07]);
        assert_eq!(decoder.value::<Option<i32>>(), Ok(Some(7)));
    }
}
