//! Counting, searching and erasing by value or by key.
//!
//! The free functions here match against the values a [`Variable`] yields
//! from [`Variable::iter`]; the [`key`] module matches against
//! [`Variable::keys`] instead. In both, null holds nothing and a scalar holds
//! exactly itself.
//!
//! ```rust
//! use bintoken::variable::{algorithm, key};
//! use bintoken::Variable;
//!
//! let value = Variable::map([("a", 1), ("b", 2), ("c", 1)]);
//! assert_eq!(algorithm::count(&value, &Variable::from(1)), 2);
//! assert_eq!(key::find(&value, &Variable::from("b")), Some(1));
//! ```

use super::Variable;

/// Number of values equal to `other`.
#[must_use]
pub fn count(value: &Variable, other: &Variable) -> usize {
    value.iter().filter(|v| *v == other).count()
}

/// Position of the first value equal to `other`.
#[must_use]
pub fn find(value: &Variable, other: &Variable) -> Option<usize> {
    value.iter().position(|v| v == other)
}

/// Removes every array element or map entry whose value equals `other` and
/// returns how many were removed. Scalars and null are left alone.
pub fn erase(value: &mut Variable, other: &Variable) -> usize {
    match value {
        Variable::Array(items) => {
            let before = items.len();
            items.retain(|v| v != other);
            before - items.len()
        }
        Variable::Map(map) => {
            let before = map.len();
            map.retain(|_, v| v != other);
            before - map.len()
        }
        _ => 0,
    }
}

/// The same operations matched against keys.
pub mod key {
    use crate::Variable;

    /// Number of keys equal to `other`: 0 for null, 1 for a scalar equal to
    /// `other`, and for containers the matching positions or map keys.
    ///
    /// ```rust
    /// use bintoken::variable::key;
    /// use bintoken::Variable;
    ///
    /// let value = Variable::map([
    ///     ("alpha", Variable::Null),
    ///     ("bravo", Variable::from(true)),
    ///     ("charlie", Variable::from(2)),
    /// ]);
    /// assert_eq!(key::count(&value, &Variable::from("alpha")), 1);
    /// assert_eq!(key::count(&value, &Variable::from("missing")), 0);
    /// assert_eq!(key::count(&value, &Variable::Null), 0);
    /// ```
    #[must_use]
    pub fn count(value: &Variable, other: &Variable) -> usize {
        value.keys().filter(|k| *k == *other).count()
    }

    /// Position of the first key equal to `other`.
    #[must_use]
    pub fn find(value: &Variable, other: &Variable) -> Option<usize> {
        value.keys().position(|k| k == *other)
    }

    /// Erases the first map entry whose key equals `other`.
    ///
    /// Returns the position of the entry that now follows the erased one, or
    /// `None` when that is the end of the map. Nothing is erased when no key
    /// matches, and non-maps are never modified; both return `None`.
    pub fn erase(value: &mut Variable, other: &Variable) -> Option<usize> {
        if !value.is_map() {
            return None;
        }
        let position = find(value, other)?;
        let map = value.as_map_mut()?;
        map.remove_index(position);
        (position < map.len()).then_some(position)
    }
}
