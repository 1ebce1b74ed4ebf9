//! Ordered map type for map variables.
//!
//! [`VariableMap`] wraps an [`IndexMap`] so entries keep their insertion order.
//! Iteration, comparison and encoding all follow that order; keys are never
//! sorted.
//!
//! ## Examples
//!
//! ```rust
//! use bintoken::{Variable, VariableMap};
//!
//! let mut map = VariableMap::new();
//! map.insert("name".to_string(), Variable::from("Alice"));
//! map.insert("age".to_string(), Variable::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use super::Variable;
use indexmap::IndexMap;
use std::collections::HashMap;

/// An insertion-ordered map of string keys to variables.
///
/// # Examples
///
/// ```rust
/// use bintoken::{Variable, VariableMap};
///
/// let mut map = VariableMap::new();
/// map.insert("second".to_string(), Variable::from(2));
/// map.insert("first".to_string(), Variable::from(1));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["second", "first"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VariableMap(IndexMap<String, Variable>);

impl VariableMap {
    #[must_use]
    pub fn new() -> Self {
        VariableMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        VariableMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, keeping the position of an existing key.
    ///
    /// If the map already contained this key, the old value is returned.
    pub fn insert(&mut self, key: String, value: Variable) -> Option<Variable> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Variable> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Variable> {
        self.0.get_mut(key)
    }

    /// Returns the entry for `key`, inserting null at the end if it is absent.
    pub fn get_or_insert_null(&mut self, key: &str) -> &mut Variable {
        if !self.0.contains_key(key) {
            self.0.insert(key.to_string(), Variable::Null);
        }
        let index = self.0.get_index_of(key).unwrap_or(self.0.len() - 1);
        &mut self.0[index]
    }

    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&String, &Variable)> {
        self.0.get_index(index)
    }

    /// Position of `key` in insertion order.
    #[must_use]
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.0.get_index_of(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes `key`, shifting later entries down to keep their order.
    pub fn remove(&mut self, key: &str) -> Option<Variable> {
        self.0.shift_remove(key)
    }

    /// Removes the entry at `index`, shifting later entries down.
    pub fn remove_index(&mut self, index: usize) -> Option<(String, Variable)> {
        self.0.shift_remove_index(index)
    }

    /// Keeps only the entries for which `keep` returns `true`.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&String, &mut Variable) -> bool,
    {
        self.0.retain(keep);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Variable> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Variable> {
        self.0.values()
    }

    pub fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, String, Variable> {
        self.0.values_mut()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Variable> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, Variable> {
        self.0.iter_mut()
    }
}

// Order-sensitive, unlike IndexMap's own equality.
impl PartialEq for VariableMap {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().eq(other.0.iter())
    }
}

impl Eq for VariableMap {}

impl From<HashMap<String, Variable>> for VariableMap {
    fn from(map: HashMap<String, Variable>) -> Self {
        VariableMap(map.into_iter().collect())
    }
}

impl From<VariableMap> for HashMap<String, Variable> {
    fn from(map: VariableMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for VariableMap {
    type Item = (String, Variable);
    type IntoIter = indexmap::map::IntoIter<String, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a VariableMap {
    type Item = (&'a String, &'a Variable);
    type IntoIter = indexmap::map::Iter<'a, String, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Variable)> for VariableMap {
    fn from_iter<T: IntoIterator<Item = (String, Variable)>>(iter: T) -> Self {
        VariableMap(IndexMap::from_iter(iter))
    }
}

impl Extend<(String, Variable)> for VariableMap {
    fn extend<T: IntoIterator<Item = (String, Variable)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}
