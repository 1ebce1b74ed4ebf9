//! Error types for token decoding, encoding and variable access.
//!
//! Every fallible operation in this crate reports one of the [`ErrorKind`]
//! codes. The code is available in two forms:
//!
//! - **Cursor form**: the decoder and reader never return an error from
//!   `next()`. Instead the current token becomes [`Code::Error`](crate::bintoken::Code::Error)
//!   carrying the kind, and the position is left on the offending token so it
//!   can be inspected.
//! - **Result form**: the convenience calls return [`Result<T>`], where the
//!   [`Error`] wraps exactly the same kind. [`Error::kind`] recovers it.
//!
//! ## Error Categories
//!
//! - **Framing errors**: unknown tags, unexpected tokens, mismatched or
//!   unbalanced structural closes.
//! - **Value errors**: bad length prefixes, numbers that do not fit the
//!   requested width, incompatible typed extraction.
//!
//! ## Examples
//!
//! ```rust
//! use bintoken::{from_slice, ErrorKind};
//!
//! // 0xFF is not a known tag
//! let result: bintoken::Result<i32> = from_slice(&[0xFF]);
//! assert_eq!(result.unwrap_err().kind(), Some(ErrorKind::UnknownToken));
//! ```

use std::fmt;
use thiserror::Error;

/// The closed set of error codes reported by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    /// Input ended inside a token payload or length prefix
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// The leading tag byte does not name any token
    #[error("unknown token")]
    UnknownToken,

    /// A well-formed token appeared where it is not allowed
    #[error("unexpected token")]
    UnexpectedToken,

    /// A 64-bit length prefix has its sign bit set
    #[error("negative length")]
    NegativeLength,

    /// A length prefix is not in canonical form or does not match the element size
    #[error("invalid length")]
    InvalidLength,

    /// A number does not fit the requested width
    #[error("overflow")]
    Overflow,

    /// The token payload is not a valid value for its code
    #[error("invalid value")]
    InvalidValue,

    /// The requested type is not compatible with the current token or kind
    #[error("incompatible type")]
    IncompatibleType,

    #[error("expected end of array")]
    ExpectedEndArray,

    #[error("expected end of record")]
    ExpectedEndRecord,

    #[error("expected end of associative array")]
    ExpectedEndAssocArray,

    #[error("unbalanced end of array")]
    UnbalancedEndArray,

    #[error("unbalanced end of record")]
    UnbalancedEndRecord,

    #[error("unbalanced end of associative array")]
    UnbalancedEndAssocArray,

    /// Nesting exceeds the configured maximum depth
    #[error("nesting depth exceeded")]
    DepthExceeded,

    /// The output buffer cannot grow to hold the next token
    #[error("buffer full")]
    BufferFull,
}

/// Represents all possible errors that can occur in this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Error raised while reading a token stream
    #[error("{kind} at byte offset {offset}")]
    Syntax { kind: ErrorKind, offset: usize },

    /// Error without a stream position, e.g. from a variable or a writer
    #[error("{0}")]
    Kind(ErrorKind),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error raised by a `Serialize` or `Deserialize` implementation
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a reader error at the given byte offset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bintoken::{Error, ErrorKind};
    ///
    /// let err = Error::syntax(ErrorKind::UnknownToken, 4);
    /// assert!(err.to_string().contains("offset 4"));
    /// ```
    pub fn syntax(kind: ErrorKind, offset: usize) -> Self {
        Error::Syntax { kind, offset }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the error code wrapped by this error, if it carries one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bintoken::{Error, ErrorKind};
    ///
    /// assert_eq!(Error::from(ErrorKind::Overflow).kind(), Some(ErrorKind::Overflow));
    /// assert_eq!(Error::custom("oops").kind(), None);
    /// ```
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Syntax { kind, .. } | Error::Kind(kind) => Some(*kind),
            Error::Io(_) | Error::Custom(_) => None,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::Kind(kind)
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
