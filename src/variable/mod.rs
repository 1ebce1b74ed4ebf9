//! Dynamically-typed values.
//!
//! A [`Variable`] holds exactly one payload: null, a boolean, an integer or
//! float of a specific width, a string in one of four character widths, an
//! array of variables, or an insertion-ordered map from strings to variables.
//!
//! ## Creating values
//!
//! ```rust
//! use bintoken::{variable, Variable};
//!
//! let number = Variable::from(42);
//! let text = Variable::from("hello");
//! let list = Variable::array([1, 2, 3]);
//! let doc = variable!({
//!     "name": "Alice",
//!     "tags": ["admin", "ops"]
//! });
//! assert_eq!(doc["tags"].len(), 2);
//! ```
//!
//! ## Typed access
//!
//! Integer widths promote into each other, as do float widths, but the two
//! groups never mix and booleans are not integers:
//!
//! ```rust
//! use bintoken::{ErrorKind, Variable};
//!
//! let value = Variable::from(2);
//! assert!(value.is::<i64>());
//! assert!(value.is::<u8>());
//! assert!(!value.is::<f64>());
//! assert!(!value.same::<i64>());
//! assert_eq!(value.value::<u8>().unwrap(), 2);
//!
//! assert_eq!(Variable::from(300).check::<u8>(), Some(ErrorKind::Overflow));
//! assert_eq!(Variable::from(true).get::<i32>(), None);
//! ```
//!
//! ## Ordering
//!
//! Variables form a total order. Values in different groups compare by group,
//! `null < boolean < integer < real < string < array < map`; values in the
//! same group compare by their native value.
//!
//! ```rust
//! use bintoken::Variable;
//!
//! assert!(Variable::Null < Variable::from(false));
//! assert!(Variable::from(true) < Variable::from(0));
//! assert!(Variable::from(-1i8) < Variable::from(1u64));
//! assert!(Variable::from(1000) < Variable::from(0.5));
//! ```

pub mod algorithm;
mod cmp;
mod iter;
mod kind;
mod map;

pub use algorithm::key;
pub use iter::{Iter, Key, Keys};
pub use kind::{Extract, Kind};
pub use map::VariableMap;

pub(crate) use cmp::Chars;

use crate::{Error, ErrorKind, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::ops::{AddAssign, Index, IndexMut};

/// A dynamically-typed value.
///
/// # Examples
///
/// ```rust
/// use bintoken::{Kind, Variable};
///
/// let mut value = Variable::Null;
/// value["name"] = Variable::from("Alice");
/// value["age"] = Variable::from(30u8);
///
/// assert_eq!(value.kind(), Kind::Map);
/// assert_eq!(value["age"].kind(), Kind::UInt8);
/// assert!(value["missing"].is_null());
/// ```
#[derive(Clone, Debug, Default)]
pub enum Variable {
    #[default]
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    /// Platform wide string, held as Unicode scalar values.
    WString(Vec<char>),
    U16String(Vec<u16>),
    U32String(Vec<char>),
    Array(Vec<Variable>),
    Map(VariableMap),
}

static NULL: Variable = Variable::Null;

impl Variable {
    /// Builds an array from anything convertible to variables.
    pub fn array<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Variable>,
    {
        Variable::Array(items.into_iter().map(Into::into).collect())
    }

    /// Builds a map, keeping the order of `entries`. A repeated key keeps its
    /// first position and its last value.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Variable>,
    {
        Variable::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn wide(text: &str) -> Self {
        Variable::WString(text.chars().collect())
    }

    #[must_use]
    pub fn utf16(text: &str) -> Self {
        Variable::U16String(text.encode_utf16().collect())
    }

    #[must_use]
    pub fn utf32(text: &str) -> Self {
        Variable::U32String(text.chars().collect())
    }

    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Variable::Null => Kind::Null,
            Variable::Boolean(_) => Kind::Boolean,
            Variable::Int8(_) => Kind::Int8,
            Variable::Int16(_) => Kind::Int16,
            Variable::Int32(_) => Kind::Int32,
            Variable::Int64(_) => Kind::Int64,
            Variable::UInt8(_) => Kind::UInt8,
            Variable::UInt16(_) => Kind::UInt16,
            Variable::UInt32(_) => Kind::UInt32,
            Variable::UInt64(_) => Kind::UInt64,
            Variable::Float32(_) => Kind::Float32,
            Variable::Float64(_) => Kind::Float64,
            Variable::String(_) => Kind::String,
            Variable::WString(_) => Kind::WString,
            Variable::U16String(_) => Kind::U16String,
            Variable::U32String(_) => Kind::U32String,
            Variable::Array(_) => Kind::Array,
            Variable::Map(_) => Kind::Map,
        }
    }

    /// Position of the active kind in [`Kind`].
    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.kind() as usize
    }

    /// True if the payload can be read as `T`, allowing promotion within a
    /// numeric or string group.
    #[inline]
    #[must_use]
    pub fn is<T: Extract>(&self) -> bool {
        T::is(self)
    }

    /// True if the payload is exactly `T`'s kind.
    #[inline]
    #[must_use]
    pub fn same<T: Extract>(&self) -> bool {
        T::same(self)
    }

    /// Reads the payload as `T`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::IncompatibleType`] if the kinds are not compatible,
    /// [`ErrorKind::Overflow`] if a number does not fit `T`.
    pub fn value<T: Extract>(&self) -> Result<T> {
        T::extract(self).map_err(Error::Kind)
    }

    /// Reads the payload as `T`, or `None` where [`Variable::value`] fails.
    #[must_use]
    pub fn get<T: Extract>(&self) -> Option<T> {
        T::extract(self).ok()
    }

    /// The error [`Variable::value`] would report for `T`, if any.
    #[must_use]
    pub fn check<T: Extract>(&self) -> Option<ErrorKind> {
        T::extract(self).err()
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Variable::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        matches!(self, Variable::Boolean(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self.kind().group(), kind::Group::Integer)
    }

    #[inline]
    #[must_use]
    pub const fn is_real(&self) -> bool {
        matches!(self, Variable::Float32(_) | Variable::Float64(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(
            self,
            Variable::String(_)
                | Variable::WString(_)
                | Variable::U16String(_)
                | Variable::U32String(_)
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Variable::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Variable::Map(_))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Variable::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integer that fits an `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.integer().and_then(|i| i64::try_from(i).ok())
    }

    /// Any integer that fits a `u64`.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.integer().and_then(|i| u64::try_from(i).ok())
    }

    /// Either float width, widened to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.real()
    }

    /// The narrow string payload.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variable::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Variable>> {
        match self {
            Variable::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Variable>> {
        match self {
            Variable::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&VariableMap> {
        match self {
            Variable::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut VariableMap> {
        match self {
            Variable::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Number of elements: entries for containers, 0 for null, 1 otherwise.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Variable::Null => 0,
            Variable::Array(items) => items.len(),
            Variable::Map(map) => map.len(),
            _ => 1,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties a container in place; any other payload becomes null.
    pub fn clear(&mut self) {
        match self {
            Variable::Array(items) => items.clear(),
            Variable::Map(map) => map.clear(),
            other => *other = Variable::Null,
        }
    }

    /// Looks up a map entry.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&Variable> {
        self.as_map().and_then(|map| map.get(key))
    }

    pub fn lookup_mut(&mut self, key: &str) -> Option<&mut Variable> {
        self.as_map_mut().and_then(|map| map.get_mut(key))
    }

    /// Array element or map value at `index`.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Variable> {
        match self {
            Variable::Array(items) => items.get(index),
            Variable::Map(map) => map.get_index(index).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Values in order: array elements, map values, a scalar once, or
    /// nothing for null.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Keys in order: array positions, map keys, a scalar once, or nothing
    /// for null.
    pub fn keys(&self) -> Keys<'_> {
        Keys::new(self)
    }

    /// Appends `value`.
    ///
    /// Null becomes a one-element array, arrays push, maps merge another map
    /// (existing keys are overwritten in place), and strings concatenate any
    /// other string.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::IncompatibleType`] for any other combination; `self` is
    /// left unchanged.
    pub fn try_append(&mut self, value: Variable) -> Result<()> {
        match (self, value) {
            (this @ Variable::Null, value) => *this = Variable::Array(vec![value]),
            (Variable::Array(items), value) => items.push(value),
            (Variable::Map(map), Variable::Map(other)) => map.extend(other),
            (this, value) if this.is_string() && value.is_string() => {
                let tail: Vec<char> = value.chars().into_iter().flatten().collect();
                match this {
                    Variable::String(s) => s.extend(tail),
                    Variable::WString(chars) | Variable::U32String(chars) => chars.extend(tail),
                    Variable::U16String(units) => {
                        let mut buf = [0u16; 2];
                        for c in tail {
                            units.extend_from_slice(c.encode_utf16(&mut buf));
                        }
                    }
                    _ => unreachable!("checked is_string"),
                }
            }
            _ => return Err(Error::Kind(ErrorKind::IncompatibleType)),
        }
        Ok(())
    }

    pub(crate) fn integer(&self) -> Option<i128> {
        let value = match self {
            Variable::Int8(i) => i128::from(*i),
            Variable::Int16(i) => i128::from(*i),
            Variable::Int32(i) => i128::from(*i),
            Variable::Int64(i) => i128::from(*i),
            Variable::UInt8(u) => i128::from(*u),
            Variable::UInt16(u) => i128::from(*u),
            Variable::UInt32(u) => i128::from(*u),
            Variable::UInt64(u) => i128::from(*u),
            _ => return None,
        };
        Some(value)
    }

    pub(crate) fn real(&self) -> Option<f64> {
        match self {
            Variable::Float32(f) => Some(f64::from(*f)),
            Variable::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Characters of any string kind. Unpaired UTF-16 surrogates come out as
    /// U+FFFD.
    pub(crate) fn chars(&self) -> Option<Chars<'_>> {
        Chars::new(self)
    }

    /// String payload of any width as UTF-8.
    pub(crate) fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Variable::String(s) => Some(Cow::Borrowed(s)),
            other => other.chars().map(|chars| Cow::Owned(chars.collect())),
        }
    }
}

impl Index<&str> for Variable {
    type Output = Variable;

    /// Map entry for `key`, or null when it is absent or `self` is not a map.
    fn index(&self, key: &str) -> &Variable {
        self.lookup(key).unwrap_or(&NULL)
    }
}

impl IndexMut<&str> for Variable {
    /// Map entry for `key`, inserting null if absent. A null `self` becomes
    /// an empty map first.
    ///
    /// # Panics
    ///
    /// If `self` is neither null nor a map.
    fn index_mut(&mut self, key: &str) -> &mut Variable {
        if self.is_null() {
            *self = Variable::Map(VariableMap::new());
        }
        match self {
            Variable::Map(map) => map.get_or_insert_null(key),
            other => panic!("cannot index {:?} variable by key", other.kind()),
        }
    }
}

impl Index<usize> for Variable {
    type Output = Variable;

    /// # Panics
    ///
    /// If `self` is not a container or `index` is out of bounds.
    fn index(&self, index: usize) -> &Variable {
        match self.at(index) {
            Some(value) => value,
            None => panic!(
                "index {} out of bounds for {:?} variable of length {}",
                index,
                self.kind(),
                self.len()
            ),
        }
    }
}

impl IndexMut<usize> for Variable {
    /// # Panics
    ///
    /// If `self` is not a container or `index` is out of bounds.
    fn index_mut(&mut self, index: usize) -> &mut Variable {
        let (kind, len) = (self.kind(), self.len());
        let slot = match self {
            Variable::Array(items) => items.get_mut(index),
            Variable::Map(map) => map.values_mut().nth(index),
            _ => None,
        };
        match slot {
            Some(value) => value,
            None => panic!(
                "index {} out of bounds for {:?} variable of length {}",
                index, kind, len
            ),
        }
    }
}

impl<T: Into<Variable>> AddAssign<T> for Variable {
    /// # Panics
    ///
    /// Where [`Variable::try_append`] would fail.
    fn add_assign(&mut self, value: T) {
        if let Err(err) = self.try_append(value.into()) {
            panic!("cannot append to {:?} variable: {}", self.kind(), err);
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Null => f.write_str("null"),
            Variable::Boolean(b) => write!(f, "{}", b),
            Variable::Float32(x) => write!(f, "{:?}", x),
            Variable::Float64(x) => write!(f, "{:?}", x),
            Variable::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Variable::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{:?}:{}", key, value)?;
                }
                f.write_str("}")
            }
            other => match (other.integer(), other.text()) {
                (Some(i), _) => write!(f, "{}", i),
                (_, Some(text)) => write!(f, "{:?}", text),
                _ => Ok(()),
            },
        }
    }
}

impl Serialize for Variable {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Variable::Null => serializer.serialize_unit(),
            Variable::Boolean(b) => serializer.serialize_bool(*b),
            Variable::Int8(i) => serializer.serialize_i8(*i),
            Variable::Int16(i) => serializer.serialize_i16(*i),
            Variable::Int32(i) => serializer.serialize_i32(*i),
            Variable::Int64(i) => serializer.serialize_i64(*i),
            Variable::UInt8(u) => serializer.serialize_u8(*u),
            Variable::UInt16(u) => serializer.serialize_u16(*u),
            Variable::UInt32(u) => serializer.serialize_u32(*u),
            Variable::UInt64(u) => serializer.serialize_u64(*u),
            Variable::Float32(x) => serializer.serialize_f32(*x),
            Variable::Float64(x) => serializer.serialize_f64(*x),
            Variable::String(s) => serializer.serialize_str(s),
            Variable::WString(_) | Variable::U16String(_) | Variable::U32String(_) => {
                serializer.serialize_str(&self.text().unwrap_or_default())
            }
            Variable::Array(items) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Variable::Map(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Variable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct VariableVisitor;

        impl<'de> Visitor<'de> for VariableVisitor {
            type Value = Variable;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any variable")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Variable, E> {
                Ok(Variable::Boolean(value))
            }

            fn visit_i8<E>(self, value: i8) -> std::result::Result<Variable, E> {
                Ok(Variable::Int8(value))
            }

            fn visit_i16<E>(self, value: i16) -> std::result::Result<Variable, E> {
                Ok(Variable::Int16(value))
            }

            fn visit_i32<E>(self, value: i32) -> std::result::Result<Variable, E> {
                Ok(Variable::Int32(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Variable, E> {
                Ok(Variable::Int64(value))
            }

            fn visit_u8<E>(self, value: u8) -> std::result::Result<Variable, E> {
                Ok(Variable::UInt8(value))
            }

            fn visit_u16<E>(self, value: u16) -> std::result::Result<Variable, E> {
                Ok(Variable::UInt16(value))
            }

            fn visit_u32<E>(self, value: u32) -> std::result::Result<Variable, E> {
                Ok(Variable::UInt32(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Variable, E> {
                Ok(Variable::UInt64(value))
            }

            fn visit_f32<E>(self, value: f32) -> std::result::Result<Variable, E> {
                Ok(Variable::Float32(value))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Variable, E> {
                Ok(Variable::Float64(value))
            }

            fn visit_char<E>(self, value: char) -> std::result::Result<Variable, E> {
                Ok(Variable::String(value.to_string()))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Variable, E> {
                Ok(Variable::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Variable, E> {
                Ok(Variable::String(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> std::result::Result<Variable, E> {
                Ok(Variable::array(value.iter().copied()))
            }

            fn visit_unit<E>(self) -> std::result::Result<Variable, E> {
                Ok(Variable::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Variable, E> {
                Ok(Variable::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Variable, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Variable, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(Variable::Array(items))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Variable, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut entries = VariableMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    entries.insert(key, value);
                }
                Ok(Variable::Map(entries))
            }
        }

        deserializer.deserialize_any(VariableVisitor)
    }
}

macro_rules! from_scalar {
    ($($t:ty => $variant:ident),*) => {$(
        impl From<$t> for Variable {
            fn from(value: $t) -> Self {
                Variable::$variant(value)
            }
        }

        impl TryFrom<Variable> for $t {
            type Error = Error;

            fn try_from(value: Variable) -> Result<Self> {
                value.value()
            }
        }
    )*};
}

from_scalar!(
    bool => Boolean,
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

impl TryFrom<Variable> for String {
    type Error = Error;

    fn try_from(value: Variable) -> Result<Self> {
        match value {
            Variable::String(s) => Ok(s),
            other => other.value(),
        }
    }
}

impl From<()> for Variable {
    fn from(_: ()) -> Self {
        Variable::Null
    }
}

impl From<String> for Variable {
    fn from(value: String) -> Self {
        Variable::String(value)
    }
}

impl From<&str> for Variable {
    fn from(value: &str) -> Self {
        Variable::String(value.to_string())
    }
}

impl From<char> for Variable {
    fn from(value: char) -> Self {
        Variable::String(value.to_string())
    }
}

impl From<VariableMap> for Variable {
    fn from(value: VariableMap) -> Self {
        Variable::Map(value)
    }
}

impl<T: Into<Variable>> From<Vec<T>> for Variable {
    fn from(value: Vec<T>) -> Self {
        Variable::array(value)
    }
}

impl<T: Into<Variable>> From<Option<T>> for Variable {
    fn from(value: Option<T>) -> Self {
        value.map_or(Variable::Null, Into::into)
    }
}

impl FromIterator<Variable> for Variable {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        Variable::Array(iter.into_iter().collect())
    }
}

impl FromIterator<(String, Variable)> for Variable {
    fn from_iter<I: IntoIterator<Item = (String, Variable)>>(iter: I) -> Self {
        Variable::Map(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Variable {
    type Item = &'a Variable;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
