//! Token writer with structural validation.

use super::encoder::{Encode, Encoder};
use super::token::{expected_end, unbalanced_end, Code};
use crate::buffer::Buffer;
use crate::{Error, ErrorKind, Options, Result};
use log::{debug, trace};

#[derive(Debug, Clone, Copy)]
struct Frame {
    code: Code,
    count: usize,
}

/// Writes a binary token stream.
///
/// Mirrors [`Reader`](super::Reader): closing a scope that is not the
/// innermost open one fails with `expected_end_*`, closing with nothing open
/// fails with `unbalanced_end_*`. Each open scope counts the elements
/// written directly inside it; an associative array must hold an even
/// number (key, value, key, value, ...).
///
/// # Examples
///
/// ```rust
/// use bintoken::bintoken::Writer;
///
/// let mut writer = Writer::new(Vec::new());
/// writer.begin_array().unwrap();
/// writer.value(&1u8).unwrap();
/// writer.value("two").unwrap();
/// writer.end_array().unwrap();
/// assert_eq!(
///     writer.into_inner(),
///     vec![0xB2, 0x94, 0x01, 0xA0, 0x03, b't', b'w', b'o', 0xB3]
/// );
/// ```
#[derive(Debug)]
pub struct Writer<B> {
    encoder: Encoder<B>,
    stack: Vec<Frame>,
    options: Options,
}

impl<B: Buffer> Writer<B> {
    pub fn new(buffer: B) -> Self {
        Self::with_options(buffer, Options::default())
    }

    pub fn with_options(buffer: B, options: Options) -> Self {
        Writer {
            encoder: Encoder::new(buffer),
            stack: Vec::new(),
            options,
        }
    }

    pub fn into_inner(self) -> B {
        self.encoder.into_inner()
    }

    pub fn get_ref(&self) -> &B {
        self.encoder.get_ref()
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Number of scopes currently open.
    #[inline]
    #[must_use]
    pub fn level(&self) -> usize {
        self.stack.len()
    }

    /// Number of elements written directly inside the innermost open scope,
    /// or at top level when nothing is open.
    #[must_use]
    pub fn count(&self) -> usize {
        self.stack.last().map_or(0, |frame| frame.count)
    }

    /// Writes a single data token and returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::BufferFull`] if the buffer cannot grow.
    /// [`ErrorKind::UnexpectedToken`] for a `null` first key of an
    /// associative array written without the placeholder, since a reader
    /// would take it for the placeholder.
    pub fn value<T: Encode + ?Sized>(&mut self, value: &T) -> Result<usize> {
        if !self.options.placeholder && self.at_first_key() && value.is_null() {
            return Err(fail(ErrorKind::UnexpectedToken));
        }
        let size = self.encoder.value(value).map_err(fail)?;
        self.bump();
        Ok(size)
    }

    /// Writes an `f64` as an extended (binary128) real.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::BufferFull`] if the buffer cannot grow.
    pub fn extended(&mut self, value: f64) -> Result<usize> {
        let size = self.encoder.extended(value).map_err(fail)?;
        self.bump();
        Ok(size)
    }

    /// # Errors
    ///
    /// As [`value`](Self::value).
    pub fn null(&mut self) -> Result<usize> {
        self.value(&())
    }

    /// # Errors
    ///
    /// [`ErrorKind::BufferFull`] if the buffer cannot grow,
    /// [`ErrorKind::DepthExceeded`] past [`Options::max_depth`].
    pub fn begin_array(&mut self) -> Result<usize> {
        self.begin(Code::BeginArray)
    }

    /// # Errors
    ///
    /// Fails if the innermost open scope is not an array.
    pub fn end_array(&mut self) -> Result<usize> {
        self.end(Code::EndArray)
    }

    /// # Errors
    ///
    /// As [`begin_array`](Self::begin_array).
    pub fn begin_record(&mut self) -> Result<usize> {
        self.begin(Code::BeginRecord)
    }

    /// # Errors
    ///
    /// Fails if the innermost open scope is not a record.
    pub fn end_record(&mut self) -> Result<usize> {
        self.end(Code::EndRecord)
    }

    /// Opens an associative array, followed by the placeholder `null` unless
    /// disabled in [`Options`].
    ///
    /// # Errors
    ///
    /// As [`begin_array`](Self::begin_array). The scope and its placeholder
    /// are written together or not at all.
    pub fn begin_assoc_array(&mut self) -> Result<usize> {
        self.begin(Code::BeginAssocArray)
    }

    /// # Errors
    ///
    /// Fails if the innermost open scope is not an associative array, or if it
    /// holds a key without a value.
    pub fn end_assoc_array(&mut self) -> Result<usize> {
        self.end(Code::EndAssocArray)
    }

    fn begin(&mut self, code: Code) -> Result<usize> {
        if self.stack.len() >= self.options.max_depth {
            return Err(fail(ErrorKind::DepthExceeded));
        }
        let size = if code == Code::BeginAssocArray && self.options.placeholder {
            self.encoder.codes(&[code, Code::Null])
        } else {
            self.encoder.codes(&[code])
        }
        .map_err(fail)?;
        self.bump();
        self.stack.push(Frame { code, count: 0 });
        trace!("open {:?} at level {}", code, self.stack.len());
        Ok(size)
    }

    fn end(&mut self, code: Code) -> Result<usize> {
        let frame = match self.stack.last() {
            Some(frame) => *frame,
            None => return Err(fail(unbalanced_end(code))),
        };
        if frame.code.closer() != Some(code) {
            return Err(fail(expected_end(frame.code)));
        }
        if code == Code::EndAssocArray && frame.count % 2 != 0 {
            return Err(fail(ErrorKind::UnexpectedToken));
        }
        let size = self.encoder.code(code).map_err(fail)?;
        self.stack.pop();
        trace!("close {:?} at level {}", code, self.stack.len());
        Ok(size)
    }

    fn at_first_key(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame { code: Code::BeginAssocArray, count: 0 })
        )
    }

    fn bump(&mut self) {
        if let Some(frame) = self.stack.last_mut() {
            frame.count += 1;
        }
    }
}

fn fail(kind: ErrorKind) -> Error {
    debug!("writer: {}", kind);
    Error::Kind(kind)
}
