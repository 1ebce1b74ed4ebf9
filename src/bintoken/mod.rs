//! The binary token protocol.
//!
//! Layers, bottom up:
//!
//! - [`Decoder`] / [`Encoder`]: one token at a time, no structural checks.
//! - [`Reader`] / [`Writer`]: the same tokens with a nesting stack that
//!   rejects unbalanced or mismatched containers.
//! - [`parse`] / [`format`]: whole values to and from [`Variable`].
//!
//! ```rust
//! use bintoken::bintoken::{format_vec, parse_slice};
//! use bintoken::variable;
//!
//! let value = variable!({"id": 7, "tags": ["a", "b"]});
//! let bytes = format_vec(&value).unwrap();
//! assert_eq!(parse_slice(&bytes).unwrap(), value);
//! ```

mod decoder;
mod encoder;
mod float128;
mod format;
mod parse;
mod reader;
pub mod tag;
mod token;
mod writer;

pub(crate) use decoder::le;
pub use decoder::{Decode, Decoder};
pub use encoder::{Encode, Encoder};
pub use format::format;
pub use parse::parse;
pub use reader::Reader;
pub use token::{Code, Element, Width};
pub use writer::Writer;

use crate::{Error, ErrorKind, Options, Result, Variable};

/// Parses a buffer holding exactly one value.
///
/// # Errors
///
/// See [`parse`]; trailing tokens after the value are
/// [`ErrorKind::UnexpectedToken`].
pub fn parse_slice(input: &[u8]) -> Result<Variable> {
    parse_slice_with_options(input, Options::default())
}

/// Like [`parse_slice`] with explicit [`Options`].
///
/// # Errors
///
/// See [`parse_slice`].
pub fn parse_slice_with_options(input: &[u8], options: Options) -> Result<Variable> {
    let mut reader = Reader::with_options(input, options);
    let value = parse(&mut reader)?;
    match reader.code() {
        Code::End => Ok(value),
        _ => Err(Error::syntax(ErrorKind::UnexpectedToken, reader.offset())),
    }
}

/// Formats a value into a new byte vector.
///
/// # Errors
///
/// See [`format`].
pub fn format_vec(value: &Variable) -> Result<Vec<u8>> {
    format_vec_with_options(value, Options::default())
}

/// Like [`format_vec`] with explicit [`Options`].
///
/// # Errors
///
/// See [`format`].
pub fn format_vec_with_options(value: &Variable, options: Options) -> Result<Vec<u8>> {
    let mut writer = Writer::with_options(Vec::new(), options);
    format(&mut writer, value)?;
    Ok(writer.into_inner())
}
