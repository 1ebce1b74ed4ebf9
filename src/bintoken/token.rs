//! Binary token codes.

use super::tag;
use crate::token::{Category, Symbol};
use crate::ErrorKind;

/// Width of a length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
}

impl Width {
    /// The narrowest width that can hold `len`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bintoken::bintoken::Width;
    ///
    /// assert_eq!(Width::for_len(255), Width::W8);
    /// assert_eq!(Width::for_len(256), Width::W16);
    /// assert_eq!(Width::for_len(70_000), Width::W32);
    /// ```
    #[must_use]
    pub fn for_len(len: usize) -> Self {
        let len = len as u64;
        if len <= u64::from(u8::MAX) {
            Width::W8
        } else if len <= u64::from(u16::MAX) {
            Width::W16
        } else if len <= u64::from(u32::MAX) {
            Width::W32
        } else {
            Width::W64
        }
    }

    /// Number of bytes the prefix occupies on the wire.
    #[inline]
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Width::W8 => 1,
            Width::W16 => 2,
            Width::W32 => 4,
            Width::W64 => 8,
        }
    }

    #[inline]
    const fn bits(self) -> u8 {
        match self {
            Width::W8 => 0,
            Width::W16 => 1,
            Width::W32 => 2,
            Width::W64 => 3,
        }
    }

    #[inline]
    const fn from_bits(bits: u8) -> Self {
        match bits & tag::WIDTH_MASK {
            0 => Width::W8,
            1 => Width::W16,
            2 => Width::W32,
            _ => Width::W64,
        }
    }
}

/// Element type of a packed scalar array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl Element {
    /// Size of one element in bytes.
    #[inline]
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Element::Int8 => 1,
            Element::Int16 => 2,
            Element::Int32 | Element::Float32 => 4,
            Element::Int64 | Element::Float64 => 8,
        }
    }

    const fn base(self) -> u8 {
        match self {
            Element::Int8 => tag::ARRAY_INT8,
            Element::Int16 => tag::ARRAY_INT16,
            Element::Int32 => tag::ARRAY_INT32,
            Element::Int64 => tag::ARRAY_INT64,
            Element::Float32 => tag::ARRAY_FLOAT32,
            Element::Float64 => tag::ARRAY_FLOAT64,
        }
    }
}

/// A binary token code.
///
/// `End` and `Error` never appear on the wire; they report the state of a
/// decoder or reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    End,
    Error(ErrorKind),
    Null,
    True,
    False,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Float128,
    String(Width),
    Binary(Width),
    Array(Element, Width),
    BeginRecord,
    EndRecord,
    BeginArray,
    EndArray,
    BeginAssocArray,
    EndAssocArray,
}

impl Code {
    /// Maps a tag byte to its code, or `None` for unknown tags.
    #[must_use]
    pub fn from_tag(byte: u8) -> Option<Self> {
        let code = match byte {
            tag::NULL => Code::Null,
            tag::TRUE => Code::True,
            tag::FALSE => Code::False,
            tag::INT8 => Code::Int8,
            tag::INT16 => Code::Int16,
            tag::INT32 => Code::Int32,
            tag::INT64 => Code::Int64,
            tag::UINT8 => Code::UInt8,
            tag::UINT16 => Code::UInt16,
            tag::UINT32 => Code::UInt32,
            tag::UINT64 => Code::UInt64,
            tag::FLOAT32 => Code::Float32,
            tag::FLOAT64 => Code::Float64,
            tag::FLOAT128 => Code::Float128,
            tag::STRING8..=tag::STRING64 => Code::String(Width::from_bits(byte)),
            tag::BINARY8..=tag::BINARY64 => Code::Binary(Width::from_bits(byte)),
            tag::BEGIN_RECORD => Code::BeginRecord,
            tag::END_RECORD => Code::EndRecord,
            tag::BEGIN_ARRAY => Code::BeginArray,
            tag::END_ARRAY => Code::EndArray,
            tag::BEGIN_ASSOC_ARRAY => Code::BeginAssocArray,
            tag::END_ASSOC_ARRAY => Code::EndAssocArray,
            tag::ARRAY_INT8..=tag::ARRAY_LAST => {
                let element = match byte & !tag::WIDTH_MASK {
                    tag::ARRAY_INT8 => Element::Int8,
                    tag::ARRAY_INT16 => Element::Int16,
                    tag::ARRAY_INT32 => Element::Int32,
                    tag::ARRAY_INT64 => Element::Int64,
                    tag::ARRAY_FLOAT32 => Element::Float32,
                    _ => Element::Float64,
                };
                Code::Array(element, Width::from_bits(byte))
            }
            _ => return None,
        };
        Some(code)
    }

    /// The tag byte written for this code, or `None` for `End` and `Error`.
    #[must_use]
    pub const fn tag(self) -> Option<u8> {
        let byte = match self {
            Code::End | Code::Error(_) => return None,
            Code::Null => tag::NULL,
            Code::True => tag::TRUE,
            Code::False => tag::FALSE,
            Code::Int8 => tag::INT8,
            Code::Int16 => tag::INT16,
            Code::Int32 => tag::INT32,
            Code::Int64 => tag::INT64,
            Code::UInt8 => tag::UINT8,
            Code::UInt16 => tag::UINT16,
            Code::UInt32 => tag::UINT32,
            Code::UInt64 => tag::UINT64,
            Code::Float32 => tag::FLOAT32,
            Code::Float64 => tag::FLOAT64,
            Code::Float128 => tag::FLOAT128,
            Code::String(width) => tag::STRING8 | width.bits(),
            Code::Binary(width) => tag::BINARY8 | width.bits(),
            Code::Array(element, width) => element.base() | width.bits(),
            Code::BeginRecord => tag::BEGIN_RECORD,
            Code::EndRecord => tag::END_RECORD,
            Code::BeginArray => tag::BEGIN_ARRAY,
            Code::EndArray => tag::END_ARRAY,
            Code::BeginAssocArray => tag::BEGIN_ASSOC_ARRAY,
            Code::EndAssocArray => tag::END_ASSOC_ARRAY,
        };
        Some(byte)
    }

    /// Payload size of fixed-width scalar codes, zero for payload-free codes,
    /// `None` for length-prefixed codes.
    #[must_use]
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            Code::Int8 | Code::UInt8 => Some(1),
            Code::Int16 | Code::UInt16 => Some(2),
            Code::Int32 | Code::UInt32 | Code::Float32 => Some(4),
            Code::Int64 | Code::UInt64 | Code::Float64 => Some(8),
            Code::Float128 => Some(16),
            Code::String(_) | Code::Binary(_) | Code::Array(..) => None,
            _ => Some(0),
        }
    }

    #[must_use]
    pub const fn symbol(self) -> Symbol {
        match self {
            Code::End => Symbol::End,
            Code::Error(_) => Symbol::Error,
            Code::Null => Symbol::Null,
            Code::True | Code::False => Symbol::Boolean,
            Code::Int8
            | Code::Int16
            | Code::Int32
            | Code::Int64
            | Code::UInt8
            | Code::UInt16
            | Code::UInt32
            | Code::UInt64 => Symbol::Integer,
            Code::Float32 | Code::Float64 | Code::Float128 => Symbol::Real,
            Code::String(_) => Symbol::String,
            Code::Binary(_) => Symbol::Binary,
            Code::Array(..) => Symbol::Array,
            Code::BeginRecord => Symbol::BeginRecord,
            Code::EndRecord => Symbol::EndRecord,
            Code::BeginArray => Symbol::BeginArray,
            Code::EndArray => Symbol::EndArray,
            Code::BeginAssocArray => Symbol::BeginAssocArray,
            Code::EndAssocArray => Symbol::EndAssocArray,
        }
    }

    #[must_use]
    pub const fn category(self) -> Category {
        self.symbol().category()
    }

    /// The error carried by an `Error` code.
    #[inline]
    #[must_use]
    pub const fn error(self) -> Option<ErrorKind> {
        match self {
            Code::Error(kind) => Some(kind),
            _ => None,
        }
    }

    /// The close code matching a structural open code.
    #[must_use]
    pub const fn closer(self) -> Option<Code> {
        match self {
            Code::BeginArray => Some(Code::EndArray),
            Code::BeginRecord => Some(Code::EndRecord),
            Code::BeginAssocArray => Some(Code::EndAssocArray),
            _ => None,
        }
    }
}

/// Error for a scope opened by `open` that was not closed properly.
pub(crate) const fn expected_end(open: Code) -> ErrorKind {
    match open {
        Code::BeginRecord => ErrorKind::ExpectedEndRecord,
        Code::BeginAssocArray => ErrorKind::ExpectedEndAssocArray,
        _ => ErrorKind::ExpectedEndArray,
    }
}

/// Error for a `close` code seen with no scope open.
pub(crate) const fn unbalanced_end(close: Code) -> ErrorKind {
    match close {
        Code::EndRecord => ErrorKind::UnbalancedEndRecord,
        Code::EndAssocArray => ErrorKind::UnbalancedEndAssocArray,
        _ => ErrorKind::UnbalancedEndArray,
    }
}
