//! Discriminants and typed access to a [`Variable`].

use super::{Variable, VariableMap};
use crate::ErrorKind;

/// The active payload kind of a [`Variable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Kind {
    Null,
    Boolean,
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
    String,
    WString,
    U16String,
    U32String,
    Array,
    Map,
}

/// Promotion groups, in the order used to compare values of different kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Group {
    Null,
    Boolean,
    Integer,
    Real,
    String,
    Array,
    Map,
}

impl Kind {
    pub(crate) const fn group(self) -> Group {
        match self {
            Kind::Null => Group::Null,
            Kind::Boolean => Group::Boolean,
            Kind::Int8
            | Kind::Int16
            | Kind::Int32
            | Kind::Int64
            | Kind::UInt8
            | Kind::UInt16
            | Kind::UInt32
            | Kind::UInt64 => Group::Integer,
            Kind::Float32 | Kind::Float64 => Group::Real,
            Kind::String | Kind::WString | Kind::U16String | Kind::U32String => Group::String,
            Kind::Array => Group::Array,
            Kind::Map => Group::Map,
        }
    }
}

/// Types that can be read out of a [`Variable`].
///
/// `is` accepts any kind in the same promotion group (every integer width
/// for an integer type, both float widths for a float type, every string
/// width for `String`); `same` accepts only the exact kind.
pub trait Extract: Sized {
    fn is(value: &Variable) -> bool;

    fn same(value: &Variable) -> bool;

    /// # Errors
    ///
    /// [`ErrorKind::IncompatibleType`] when `is` is false, and
    /// [`ErrorKind::Overflow`] when a number does not fit `Self`.
    fn extract(value: &Variable) -> Result<Self, ErrorKind>;
}

impl Extract for () {
    fn is(value: &Variable) -> bool {
        value.is_null()
    }

    fn same(value: &Variable) -> bool {
        value.is_null()
    }

    fn extract(value: &Variable) -> Result<Self, ErrorKind> {
        match value {
            Variable::Null => Ok(()),
            _ => Err(ErrorKind::IncompatibleType),
        }
    }
}

impl Extract for bool {
    fn is(value: &Variable) -> bool {
        value.is_boolean()
    }

    fn same(value: &Variable) -> bool {
        value.is_boolean()
    }

    fn extract(value: &Variable) -> Result<Self, ErrorKind> {
        match value {
            Variable::Boolean(b) => Ok(*b),
            _ => Err(ErrorKind::IncompatibleType),
        }
    }
}

macro_rules! extract_integer {
    ($($t:ty => $kind:ident),*) => {$(
        impl Extract for $t {
            fn is(value: &Variable) -> bool {
                value.is_integer()
            }

            fn same(value: &Variable) -> bool {
                value.kind() == Kind::$kind
            }

            fn extract(value: &Variable) -> Result<Self, ErrorKind> {
                let wide = value.integer().ok_or(ErrorKind::IncompatibleType)?;
                <$t>::try_from(wide).map_err(|_| ErrorKind::Overflow)
            }
        }
    )*};
}

extract_integer!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64
);

impl Extract for f64 {
    fn is(value: &Variable) -> bool {
        value.is_real()
    }

    fn same(value: &Variable) -> bool {
        value.kind() == Kind::Float64
    }

    fn extract(value: &Variable) -> Result<Self, ErrorKind> {
        value.real().ok_or(ErrorKind::IncompatibleType)
    }
}

impl Extract for f32 {
    fn is(value: &Variable) -> bool {
        value.is_real()
    }

    fn same(value: &Variable) -> bool {
        value.kind() == Kind::Float32
    }

    fn extract(value: &Variable) -> Result<Self, ErrorKind> {
        match value {
            Variable::Float32(f) => Ok(*f),
            Variable::Float64(f) if f.is_finite() && f.abs() > f64::from(f32::MAX) => {
                Err(ErrorKind::Overflow)
            }
            Variable::Float64(f) => Ok(*f as f32),
            _ => Err(ErrorKind::IncompatibleType),
        }
    }
}

impl Extract for String {
    fn is(value: &Variable) -> bool {
        value.is_string()
    }

    fn same(value: &Variable) -> bool {
        value.kind() == Kind::String
    }

    fn extract(value: &Variable) -> Result<Self, ErrorKind> {
        match value {
            Variable::String(s) => Ok(s.clone()),
            Variable::U16String(units) => {
                String::from_utf16(units).map_err(|_| ErrorKind::InvalidValue)
            }
            Variable::WString(chars) | Variable::U32String(chars) => Ok(chars.iter().collect()),
            _ => Err(ErrorKind::IncompatibleType),
        }
    }
}

impl Extract for Vec<Variable> {
    fn is(value: &Variable) -> bool {
        value.is_array()
    }

    fn same(value: &Variable) -> bool {
        value.is_array()
    }

    fn extract(value: &Variable) -> Result<Self, ErrorKind> {
        match value {
            Variable::Array(items) => Ok(items.clone()),
            _ => Err(ErrorKind::IncompatibleType),
        }
    }
}

impl Extract for VariableMap {
    fn is(value: &Variable) -> bool {
        value.is_map()
    }

    fn same(value: &Variable) -> bool {
        value.is_map()
    }

    fn extract(value: &Variable) -> Result<Self, ErrorKind> {
        match value {
            Variable::Map(map) => Ok(map.clone()),
            _ => Err(ErrorKind::IncompatibleType),
        }
    }
}

impl<T: Extract> Extract for Option<T> {
    fn is(value: &Variable) -> bool {
        value.is_null() || T::is(value)
    }

    fn same(value: &Variable) -> bool {
        value.is_null() || T::same(value)
    }

    fn extract(value: &Variable) -> Result<Self, ErrorKind> {
        match value {
            Variable::Null => Ok(None),
            _ => T::extract(value).map(Some),
        }
    }
}
