//! Configuration options for reading and writing token streams.
//!
//! ## Examples
//!
//! ```rust
//! use bintoken::{to_vec_with_options, Options};
//!
//! // Omit the legacy placeholder after `begin_assoc_array`
//! let options = Options::new().with_placeholder(false);
//! let bytes = to_vec_with_options(&std::collections::BTreeMap::<String, i32>::new(), options).unwrap();
//! assert_eq!(bytes, vec![0xB4, 0xB5]);
//! ```

/// Default nesting limit for readers, the variable parser and the deserializer.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options shared by readers and writers.
///
/// # Examples
///
/// ```rust
/// use bintoken::Options;
///
/// let options = Options::new().with_max_depth(16);
/// assert_eq!(options.max_depth, 16);
/// assert!(options.placeholder);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Deepest structural nesting accepted when reading.
    pub max_depth: usize,
    /// Whether writers emit a `null` right after `begin_assoc_array`.
    ///
    /// Readers accept streams with or without it.
    pub placeholder: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_depth: DEFAULT_MAX_DEPTH,
            placeholder: true,
        }
    }
}

impl Options {
    /// Creates default options (depth 128, placeholder enabled).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth accepted when reading.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets whether writers emit the assoc-array placeholder.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: bool) -> Self {
        self.placeholder = placeholder;
        self
    }
}
