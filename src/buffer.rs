//! Output sinks for encoders.
//!
//! The encoder never touches a concrete container. It asks the sink whether
//! it can take `n` more bytes and then writes them. Growable sinks such as
//! `Vec<u8>` always accept; fixed-size sinks such as [`SliceBuffer`] refuse
//! once they are full, which surfaces as [`ErrorKind::BufferFull`](crate::ErrorKind::BufferFull).

/// A byte sink written to by [`Encoder`](crate::bintoken::Encoder).
///
/// `grow` is always called before the matching writes; implementations may
/// assume the writes that follow a successful `grow(n)` total at most `n` bytes.
pub trait Buffer {
    /// Returns `true` if `n` more bytes can be written.
    fn grow(&mut self, n: usize) -> bool;

    fn write_byte(&mut self, byte: u8);

    fn write_bytes(&mut self, bytes: &[u8]);
}

impl Buffer for Vec<u8> {
    fn grow(&mut self, n: usize) -> bool {
        self.try_reserve(n).is_ok()
    }

    #[inline]
    fn write_byte(&mut self, byte: u8) {
        self.push(byte);
    }

    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl<B: Buffer + ?Sized> Buffer for &mut B {
    fn grow(&mut self, n: usize) -> bool {
        (**self).grow(n)
    }

    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        (**self).write_bytes(bytes);
    }
}

/// A fixed-capacity sink over a borrowed byte slice.
///
/// # Examples
///
/// ```rust
/// use bintoken::buffer::{Buffer, SliceBuffer};
///
/// let mut storage = [0u8; 2];
/// let mut buffer = SliceBuffer::new(&mut storage);
/// assert!(buffer.grow(2));
/// buffer.write_bytes(&[1, 2]);
/// assert!(!buffer.grow(1));
/// assert_eq!(buffer.as_slice(), &[1, 2]);
/// ```
pub struct SliceBuffer<'a> {
    storage: &'a mut [u8],
    len: usize,
}

impl<'a> SliceBuffer<'a> {
    pub fn new(storage: &'a mut [u8]) -> Self {
        SliceBuffer { storage, len: 0 }
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The written prefix of the storage.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.len]
    }
}

impl Buffer for SliceBuffer<'_> {
    fn grow(&mut self, n: usize) -> bool {
        self.storage.len() - self.len >= n
    }

    fn write_byte(&mut self, byte: u8) {
        self.storage[self.len] = byte;
        self.len += 1;
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let end = self.len + bytes.len();
        self.storage[self.len..end].copy_from_slice(bytes);
        self.len = end;
    }
}
