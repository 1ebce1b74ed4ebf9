//! Token cursor with structural validation.

use super::decoder::{Decode, Decoder};
use super::token::{expected_end, unbalanced_end, Code};
use crate::token::{Category, Symbol};
use crate::{Error, ErrorKind, Options, Result};
use log::{debug, trace};

/// Reads a binary token stream one token at a time.
///
/// The reader keeps a stack of the containers currently open. Opening tokens
/// push, matching closing tokens pop, and anything else that breaks the
/// nesting turns the current code into an error:
///
/// - a close that does not match the innermost open scope is
///   `expected_end_*` for that scope,
/// - a close with nothing open is `unbalanced_end_*`,
/// - running out of input with scopes still open is `expected_end_*` for the
///   innermost one.
///
/// # Examples
///
/// ```rust
/// use bintoken::bintoken::{Code, Reader};
///
/// let mut reader = Reader::new(&[0xB2, 0x94, 0x01, 0xB3]);
/// assert_eq!(reader.code(), Code::BeginArray);
/// assert_eq!(reader.level(), 1);
/// assert!(reader.next());
/// assert_eq!(reader.value::<u8>().unwrap(), 1);
/// assert!(reader.next());
/// assert_eq!(reader.code(), Code::EndArray);
/// assert_eq!(reader.level(), 0);
/// assert!(!reader.next());
/// assert_eq!(reader.code(), Code::End);
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    decoder: Decoder<'a>,
    code: Code,
    stack: Vec<Code>,
    options: Options,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, Options::default())
    }

    pub fn with_options(input: &'a [u8], options: Options) -> Self {
        let decoder = Decoder::new(input);
        let mut reader = Reader {
            code: decoder.code(),
            decoder,
            stack: Vec::new(),
            options,
        };
        reader.settle();
        reader
    }

    /// Advances to the next token.
    ///
    /// Returns `false` once the stream has ended or an error was found;
    /// check [`Reader::code`] or [`Reader::error`] to tell them apart.
    pub fn next(&mut self) -> bool {
        if self.is_done() {
            return false;
        }
        let opened_assoc = self.code == Code::BeginAssocArray;
        self.decoder.next();
        if opened_assoc && self.decoder.code() == Code::Null {
            trace!("skipping assoc array placeholder");
            self.decoder.next();
        }
        self.settle();
        !self.is_done()
    }

    /// Like [`Reader::next`], but reports an error token as `Err`.
    ///
    /// The error wraps exactly the kind [`Reader::error`] reports.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] when the reader lands on an error token.
    pub fn try_next(&mut self) -> Result<bool> {
        let more = self.next();
        self.check()?;
        Ok(more)
    }

    /// Returns `Err` if the current token is an error token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] carrying the current error kind.
    pub fn check(&self) -> Result<()> {
        match self.code.error() {
            Some(kind) => Err(Error::syntax(kind, self.offset())),
            None => Ok(()),
        }
    }

    /// Extracts the current token as `T`.
    ///
    /// # Errors
    ///
    /// See [`Decoder::value`]; the error carries the token offset.
    pub fn value<T: Decode<'a>>(&self) -> Result<T> {
        T::decode(self.code, self.decoder.literal())
            .map_err(|kind| Error::syntax(kind, self.offset()))
    }

    /// Skips the current token. On an opening token the whole container is
    /// skipped, leaving the reader on the token after its close.
    ///
    /// # Errors
    ///
    /// Fails if an error token is reached on the way.
    pub fn skip(&mut self) -> Result<()> {
        self.check()?;
        if self.code.symbol().is_begin() {
            let depth = self.level();
            while self.level() >= depth {
                if !self.try_next()? {
                    return Err(Error::syntax(ErrorKind::UnexpectedEnd, self.offset()));
                }
            }
        }
        self.try_next()?;
        Ok(())
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

    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<ErrorKind> {
        self.code.error()
    }

    #[inline]
    #[must_use]
    pub fn literal(&self) -> &'a [u8] {
        self.decoder.literal()
    }

    /// Number of containers currently open.
    #[inline]
    #[must_use]
    pub fn level(&self) -> usize {
        self.stack.len()
    }

    /// Input from the start of the current token onwards.
    #[must_use]
    pub fn tail(&self) -> &'a [u8] {
        self.decoder.tail()
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.decoder.offset()
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    fn is_done(&self) -> bool {
        matches!(self.code, Code::End | Code::Error(_))
    }

    // Applies the nesting rules to the token the decoder just produced.
    fn settle(&mut self) {
        let code = self.decoder.code();
        self.code = match code {
            Code::BeginArray | Code::BeginRecord | Code::BeginAssocArray => {
                if self.stack.len() >= self.options.max_depth {
                    Code::Error(ErrorKind::DepthExceeded)
                } else {
                    self.stack.push(code);
                    trace!("open {:?} at level {}", code, self.stack.len());
                    code
                }
            }
            Code::EndArray | Code::EndRecord | Code::EndAssocArray => match self.stack.last() {
                None => Code::Error(unbalanced_end(code)),
                Some(&open) if open.closer() == Some(code) => {
                    self.stack.pop();
                    trace!("close {:?} at level {}", code, self.stack.len());
                    code
                }
                Some(&open) => Code::Error(expected_end(open)),
            },
            Code::End => match self.stack.last() {
                Some(&open) => Code::Error(expected_end(open)),
                None => Code::End,
            },
            other => other,
        };
        if let Some(kind) = self.code.error() {
            debug!("{} at offset {} (level {})", kind, self.offset(), self.level());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(input: &[u8]) -> Vec<Code> {
        let mut reader = Reader::new(input);
        let mut out = vec![reader.code()];
        while reader.next() {
            out.push(reader.code());
        }
        if reader.code() != *out.last().unwrap() {
            out.push(reader.code());
        }
        out
    }

    #[test]
    fn test_nested_levels() {
        // [ [ 1 ] { "a": 2 } ( true ) ]
        let input = [
            0xB2, 0xB2, 0x94, 0x01, 0xB3, 0xB4, 0x80, 0xA0, 0x01, b'a', 0x94, 0x02, 0xB5, 0xB0,
            0x81, 0xB1, 0xB3,
        ];
        let mut reader = Reader::new(&input);
        let mut levels = vec![reader.level()];
        while reader.next() {
            levels.push(reader.level());
        }
        assert_eq!(reader.code(), Code::End);
        assert_eq!(levels, vec![1, 2, 2, 1, 2, 2, 2, 1, 2, 2, 1, 0]);
    }

    #[test]
    fn test_placeholder_is_optional() {
        let with = codes(&[0xB4, 0x80, 0xB5]);
        let without = codes(&[0xB4, 0xB5]);
        assert_eq!(with, vec![Code::BeginAssocArray, Code::EndAssocArray, Code::End]);
        assert_eq!(with, without);
    }

    #[test]
    fn test_mismatched_close() {
        let mut reader = Reader::new(&[0xB2, 0xB1]);
        assert!(!reader.next());
        assert_eq!(reader.error(), Some(ErrorKind::ExpectedEndArray));
        assert_eq!(reader.offset(), 1);
    }

    #[test]
    fn test_unbalanced_close() {
        let reader = Reader::new(&[0xB5]);
        assert_eq!(reader.error(), Some(ErrorKind::UnbalancedEndAssocArray));
        assert_eq!(reader.level(), 0);
    }

    #[test]
    fn test_truncated_structure() {
        let mut reader = Reader::new(&[0xB0, 0x81]);
        assert!(reader.next());
        assert!(!reader.next());
        assert_eq!(reader.error(), Some(ErrorKind::ExpectedEndRecord));
    }

    #[test]
    fn test_error_is_sticky() {
        let mut reader = Reader::new(&[0x01, 0x80]);
        assert_eq!(reader.error(), Some(ErrorKind::UnknownToken));
        assert!(!reader.next());
        assert_eq!(reader.error(), Some(ErrorKind::UnknownToken));
    }

    #[test]
    fn test_try_next_parity() {
        let input = [0xB2, 0x94];
        let mut by_code = Reader::new(&input);
        by_code.next();
        let kind = by_code.error().unwrap();
        assert_eq!(kind, ErrorKind::UnexpectedEnd);

        let mut by_result = Reader::new(&input);
        let err = by_result.try_next().unwrap_err();
        assert_eq!(err.kind(), Some(kind));
    }

    #[test]
    fn test_depth_limit() {
        let input = [0xB2, 0xB2, 0xB2, 0xB3, 0xB3, 0xB3];
        let mut reader = Reader::with_options(&input, Options::new().with_max_depth(2));
        assert!(reader.next());
        assert!(!reader.next());
        assert_eq!(reader.error(), Some(ErrorKind::DepthExceeded));
    }

    #[test]
    fn test_skip_subtree() {
        // [ [ 1 2 ] 3 ]
        let input = [0xB2, 0xB2, 0x94, 0x01, 0x94, 0x02, 0xB3, 0x94, 0x03, 0xB3];
        let mut reader = Reader::new(&input);
        reader.next();
        assert_eq!(reader.code(), Code::BeginArray);
        reader.skip().unwrap();
        assert_eq!(reader.value::<i32>().unwrap(), 3);
        reader.skip().unwrap();
        assert_eq!(reader.code(), Code::EndArray);
        reader.skip().unwrap();
        assert_eq!(reader.code(), Code::End);
    }

    #[test]
    fn test_value_errors_carry_offset() {
        let reader = Reader::new(&[0x94, 0xFF]);
        let err = reader.value::<i8>().unwrap_err();
        assert_eq!(err, Error::syntax(ErrorKind::Overflow, 0));
    }
}
