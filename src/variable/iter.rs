//! Value and key iteration.

use super::Variable;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Range;

/// Iterator over the values of a [`Variable`].
///
/// Created by [`Variable::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: IterInner<'a>,
}

#[derive(Debug, Clone)]
enum IterInner<'a> {
    Single(Option<&'a Variable>),
    Array(std::slice::Iter<'a, Variable>),
    Map(indexmap::map::Values<'a, String, Variable>),
}

impl<'a> Iter<'a> {
    pub(super) fn new(value: &'a Variable) -> Self {
        let inner = match value {
            Variable::Null => IterInner::Single(None),
            Variable::Array(items) => IterInner::Array(items.iter()),
            Variable::Map(map) => IterInner::Map(map.values()),
            scalar => IterInner::Single(Some(scalar)),
        };
        Iter { inner }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Variable;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Single(value) => value.take(),
            IterInner::Array(items) => items.next(),
            IterInner::Map(values) => values.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Single(value) => value.take(),
            IterInner::Array(items) => items.next_back(),
            IterInner::Map(values) => values.next_back(),
        }
    }
}

impl ExactSizeIterator for Iter<'_> {
    fn len(&self) -> usize {
        match &self.inner {
            IterInner::Single(value) => usize::from(value.is_some()),
            IterInner::Array(items) => items.len(),
            IterInner::Map(values) => values.len(),
        }
    }
}

impl FusedIterator for Iter<'_> {}

/// A key produced by [`Variable::keys`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Key<'a> {
    /// Position of an array element.
    Index(usize),
    /// Key of a map entry.
    Name(&'a str),
    /// A scalar is its own key.
    Value(&'a Variable),
}

impl Key<'_> {
    #[must_use]
    pub fn to_variable(&self) -> Variable {
        match *self {
            Key::Index(i) => Variable::UInt64(i as u64),
            Key::Name(name) => Variable::from(name),
            Key::Value(value) => value.clone(),
        }
    }
}

impl PartialEq<Variable> for Key<'_> {
    fn eq(&self, other: &Variable) -> bool {
        match *self {
            Key::Index(i) => other.integer() == Some(i as i128),
            Key::Name(name) => other
                .chars()
                .map_or(false, |chars| chars.eq(name.chars())),
            Key::Value(value) => value == other,
        }
    }
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Name(name) => write!(f, "{:?}", name),
            Key::Value(value) => write!(f, "{}", value),
        }
    }
}

/// Iterator over the keys of a [`Variable`].
///
/// Created by [`Variable::keys`].
#[derive(Debug, Clone)]
pub struct Keys<'a> {
    inner: KeysInner<'a>,
}

#[derive(Debug, Clone)]
enum KeysInner<'a> {
    Single(Option<&'a Variable>),
    Array(Range<usize>),
    Map(indexmap::map::Keys<'a, String, Variable>),
}

impl<'a> Keys<'a> {
    pub(super) fn new(value: &'a Variable) -> Self {
        let inner = match value {
            Variable::Null => KeysInner::Single(None),
            Variable::Array(items) => KeysInner::Array(0..items.len()),
            Variable::Map(map) => KeysInner::Map(map.keys()),
            scalar => KeysInner::Single(Some(scalar)),
        };
        Keys { inner }
    }
}

impl<'a> Iterator for Keys<'a> {
    type Item = Key<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            KeysInner::Single(value) => value.take().map(Key::Value),
            KeysInner::Array(range) => range.next().map(Key::Index),
            KeysInner::Map(keys) => keys.next().map(|k| Key::Name(k.as_str())),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for Keys<'_> {
    fn len(&self) -> usize {
        match &self.inner {
            KeysInner::Single(value) => usize::from(value.is_some()),
            KeysInner::Array(range) => range.len(),
            KeysInner::Map(keys) => keys.len(),
        }
    }
}

impl FusedIterator for Keys<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values() {
        assert_eq!(Variable::Null.iter().count(), 0);
        let scalar = Variable::from("x");
        assert_eq!(scalar.iter().collect::<Vec<_>>(), vec![&scalar]);
        let map = Variable::map([("a", 1), ("b", 2)]);
        let values: Vec<_> = map.iter().cloned().collect();
        assert_eq!(values, vec![Variable::from(1), Variable::from(2)]);
        assert_eq!(map.iter().rev().next(), Some(&Variable::from(2)));
    }

    #[test]
    fn test_keys() {
        let array = Variable::array(["x", "y"]);
        let keys: Vec<_> = array.keys().collect();
        assert_eq!(keys, vec![Key::Index(0), Key::Index(1)]);

        let map = Variable::map([("a", 1), ("b", 2)]);
        let keys: Vec<_> = map.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["\"a\"", "\"b\""]);

        let scalar = Variable::from(3);
        assert_eq!(scalar.keys().collect::<Vec<_>>(), vec![Key::Value(&scalar)]);
        assert_eq!(Variable::Null.keys().len(), 0);
    }

    #[test]
    fn test_key_equality() {
        assert!(Key::Index(2) == Variable::from(2u8));
        assert!(Key::Index(2) != Variable::from(2.0));
        assert!(Key::Name("k") == Variable::utf16("k"));
        assert!(Key::Name("k") != Variable::Null);
        assert_eq!(Key::Name("k").to_variable(), Variable::from("k"));
    }
}
