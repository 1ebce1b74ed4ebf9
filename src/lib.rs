//! # bintoken
//!
//! A dynamically-typed [`Variable`] and a compact binary token format, with
//! Serde support on both sides.
//!
//! ## Key Features
//!
//! - **Exact widths**: every integer and float keeps the width it was stored with
//! - **Streaming**: [`bintoken::Reader`] and [`bintoken::Writer`] work one token
//!   at a time over a borrowed slice or any [`buffer::Buffer`]
//! - **Two error styles**: the reader reports errors as a token code, or as
//!   `Result` through the `try_` methods
//! - **Serde Compatible**: derive `Serialize`/`Deserialize` and go straight
//!   to bytes, or through a [`Variable`]
//! - **No Unsafe Code**
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use bintoken::{from_slice, to_vec};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//!
//! let bytes = to_vec(&user).unwrap();
//! let back: User = from_slice(&bytes).unwrap();
//! assert_eq!(user, back);
//! ```
//!
//! ## Dynamic Values
//!
//! ```rust
//! use bintoken::{variable, Kind, Variable};
//! use bintoken::bintoken::{format_vec, parse_slice};
//!
//! let mut value = variable!({"name": "probe", "readings": [1.5f32, 2.5f32]});
//! value["readings"] += 3.5f32;
//! value["id"] = Variable::from(9u16);
//!
//! let bytes = format_vec(&value).unwrap();
//! let back = parse_slice(&bytes).unwrap();
//! assert_eq!(back, value);
//! assert_eq!(back["id"].kind(), Kind::UInt16);
//! assert_eq!(back["readings"].len(), 3);
//! ```
//!
//! ## Token Streams
//!
//! ```rust
//! use bintoken::bintoken::{Code, Reader, Writer};
//!
//! let mut writer = Writer::new(Vec::new());
//! writer.begin_array().unwrap();
//! writer.value(&300u16).unwrap();
//! writer.value("ok").unwrap();
//! writer.end_array().unwrap();
//! let bytes = writer.into_inner();
//!
//! let mut reader = Reader::new(&bytes);
//! assert_eq!(reader.code(), Code::BeginArray);
//! reader.next();
//! assert_eq!(reader.value::<u16>().unwrap(), 300);
//! ```

pub mod bintoken;
pub mod buffer;
pub mod de;
pub mod error;
pub mod macros;
pub mod options;
pub mod ser;
pub mod token;
pub mod variable;

pub use de::{Deserializer, VariableDeserializer};
pub use error::{Error, ErrorKind, Result};
pub use options::{Options, DEFAULT_MAX_DEPTH};
pub use ser::{Serializer, VariableSerializer};
pub use token::{Category, Symbol};
pub use variable::{Extract, Kind, Variable, VariableMap};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io;

/// Serialize any `T: Serialize` to a byte vector.
///
/// # Examples
///
/// ```rust
/// use bintoken::to_vec;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let bytes = to_vec(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(bytes[0], 0xB4);
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_vec_with_options(value, Options::default())
}

/// Serialize any `T: Serialize` to a byte vector with custom options.
///
/// # Examples
///
/// ```rust
/// use bintoken::{to_vec_with_options, Options};
/// use std::collections::BTreeMap;
///
/// let map = BTreeMap::from([("a", true)]);
/// let bytes = to_vec_with_options(&map, Options::new().with_placeholder(false)).unwrap();
/// assert_eq!(bytes, vec![0xB4, 0xA0, 0x01, b'a', 0x81, 0xB5]);
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized or nests deeper
/// than `options.max_depth`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_with_options<T>(value: &T, options: Options) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mut serializer = Serializer::with_options(Vec::new(), options);
    value.serialize(&mut serializer)?;
    Ok(serializer.into_inner())
}

/// Serialize any `T: Serialize` to an I/O stream.
///
/// # Examples
///
/// ```rust
/// use bintoken::to_writer;
///
/// let mut out = Vec::new();
/// to_writer(&mut out, &(1u8, "x")).unwrap();
/// assert_eq!(out, vec![0xB0, 0x94, 0x01, 0xA0, 0x01, b'x', 0xB1]);
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let bytes = to_vec(value)?;
    writer
        .write_all(&bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Convert any `T: Serialize` to a [`Variable`].
///
/// # Examples
///
/// ```rust
/// use bintoken::{to_variable, Kind};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_variable(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_map());
/// assert_eq!(value["y"].kind(), Kind::Int32);
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be serialized, e.g. a map with
/// non-string keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_variable<T>(value: &T) -> Result<Variable>
where
    T: ?Sized + Serialize,
{
    value.serialize(VariableSerializer)
}

/// Deserialize an instance of type `T` from a [`Variable`].
///
/// # Examples
///
/// ```rust
/// use bintoken::{from_variable, variable};
///
/// let pair: (u8, String) = from_variable(variable!([7, "seven"])).unwrap();
/// assert_eq!(pair, (7, "seven".to_string()));
/// ```
///
/// # Errors
///
/// Returns an error if the variable does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_variable<T>(value: Variable) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(VariableDeserializer::new(value))
}

/// Deserialize an instance of type `T` from a byte slice.
///
/// Strings and byte slices in `T` may borrow from `input`. The whole slice
/// must hold exactly one value.
///
/// # Examples
///
/// ```rust
/// use bintoken::from_slice;
///
/// let input = [0xB2, 0x94, 0x01, 0x95, 0x00, 0x01, 0xB3];
/// let values: Vec<u32> = from_slice(&input).unwrap();
/// assert_eq!(values, vec![1, 256]);
/// ```
///
/// # Errors
///
/// Returns an error if the input is malformed, does not fit `T`, or holds
/// more than one value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<'a, T>(input: &'a [u8]) -> Result<T>
where
    T: Deserialize<'a>,
{
    from_slice_with_options(input, Options::default())
}

/// Deserialize an instance of type `T` from a byte slice with custom options.
///
/// # Errors
///
/// See [`from_slice`]; nesting past `options.max_depth` fails with
/// [`ErrorKind::DepthExceeded`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options<'a, T>(input: &'a [u8], options: Options) -> Result<T>
where
    T: Deserialize<'a>,
{
    let mut deserializer = Deserializer::with_options(input, options);
    let value = T::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

/// Deserialize an instance of type `T` from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use bintoken::from_reader;
/// use std::io::Cursor;
///
/// let cursor = Cursor::new(vec![0xA0, 0x02, b'h', b'i']);
/// let text: String = from_reader(cursor).unwrap();
/// assert_eq!(text, "hi");
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the bytes do not hold a `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
        home: Option<Point>,
    }

    fn user() -> User {
        User {
            id: 42,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "ops".to_string()],
            home: Some(Point { x: -3, y: 4 }),
        }
    }

    #[test]
    fn test_struct_round_trip() {
        let bytes = to_vec(&user()).unwrap();
        let back: User = from_slice(&bytes).unwrap();
        assert_eq!(back, user());
    }

    #[test]
    fn test_struct_through_variable() {
        let value = to_variable(&user()).unwrap();
        assert_eq!(value["name"], Variable::from("Alice"));
        assert_eq!(value["home"]["x"].kind(), Kind::Int32);
        let back: User = from_variable(value).unwrap();
        assert_eq!(back, user());
    }

    #[test]
    fn test_serde_bytes_parse_as_variable() {
        let bytes = to_vec(&user()).unwrap();
        let value = bintoken::parse_slice(&bytes).unwrap();
        assert_eq!(value, to_variable(&user()).unwrap());
    }

    #[test]
    fn test_writer_and_reader() {
        let mut out = Vec::new();
        to_writer(&mut out, &Point { x: 1, y: 2 }).unwrap();
        let point: Point = from_reader(out.as_slice()).unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });
    }

    #[test]
    fn test_hashmap_round_trip() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), 1u64);
        map.insert("b".to_string(), u64::MAX);
        let back: HashMap<String, u64> = from_slice(&to_vec(&map).unwrap()).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let err = from_slice::<bool>(&[0x81, 0x81]).unwrap_err();
        assert_eq!(err, Error::syntax(ErrorKind::UnexpectedToken, 1));
    }

    #[test]
    fn test_depth_option() {
        let nested = vec![vec![vec![1u8]]];
        let bytes = to_vec(&nested).unwrap();
        let options = Options::new().with_max_depth(2);
        let err = from_slice_with_options::<Vec<Vec<Vec<u8>>>>(&bytes, options).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::DepthExceeded));
    }

    #[test]
    fn test_depth_option_on_write() {
        let nested = vec![vec![vec![1u8]]];
        let err = to_vec_with_options(&nested, Options::new().with_max_depth(2)).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::DepthExceeded));
        assert!(to_vec_with_options(&nested, Options::new().with_max_depth(3)).is_ok());
    }
}
