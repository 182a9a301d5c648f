//! Ordered map type for object values.
//!
//! This module provides [`Map`], a wrapper around [`IndexMap`] that keeps
//! insertion order for object fields. Order matters here: the encoder emits
//! map entries in insertion order, and both wire formats are deterministic
//! over that order.
//!
//! ## Why IndexMap?
//!
//! `IndexMap` instead of `HashMap` ensures:
//!
//! - **Deterministic output**: the same tree always produces the same bytes
//! - **Iteration order**: fields are iterated in insertion order
//! - **Compatibility**: predictable output for testing and debugging
//!
//! ## Examples
//!
//! ```rust
//! use pullwire::{Map, Value};
//!
//! let mut map = Map::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30i32));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;

/// An insertion-ordered map of string keys to values.
///
/// # Examples
///
/// ```rust
/// use pullwire::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("first".to_string(), Value::from(1i32));
/// map.insert("second".to_string(), Value::from(2i32));
///
/// // Iteration maintains insertion order
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Map(IndexMap<String, crate::Value>);

impl Map {
    /// Creates an empty `Map`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pullwire::Map;
    ///
    /// let map = Map::new();
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Map(IndexMap::new())
    }

    /// Creates an empty `Map` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Map(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned and
    /// the key keeps its original position.
    pub fn insert(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.0.get(key)
    }

    /// Returns the key-value pair at the given insertion index.
    ///
    /// This is the iteration contract the traversal engine consumes: a map
    /// frame holds an index cursor and fetches entries positionally.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&String, &crate::Value)> {
        self.0.get_index(index)
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, crate::Value> {
        self.0.values()
    }

    /// Returns an iterator over the entries of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::Value> {
        self.0.iter()
    }
}

impl From<HashMap<String, crate::Value>> for Map {
    fn from(map: HashMap<String, crate::Value>) -> Self {
        Map(map.into_iter().collect())
    }
}

impl From<Map> for HashMap<String, crate::Value> {
    fn from(map: Map) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for Map {
    type Item = (String, crate::Value);
    type IntoIter = indexmap::map::IntoIter<String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, crate::Value)> for Map {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        Map(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_insertion_order_preserved() {
        let mut map = Map::new();
        map.insert("z".to_string(), Value::from(1i32));
        map.insert("a".to_string(), Value::from(2i32));
        map.insert("m".to_string(), Value::from(3i32));

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_get_index() {
        let mut map = Map::new();
        map.insert("a".to_string(), Value::from(1i32));
        map.insert("b".to_string(), Value::from(2i32));

        let (key, value) = map.get_index(1).unwrap();
        assert_eq!(key, "b");
        assert_eq!(value, &Value::Int32(2));
        assert!(map.get_index(2).is_none());
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut map = Map::new();
        map.insert("a".to_string(), Value::from(1i32));
        map.insert("b".to_string(), Value::from(2i32));
        map.insert("a".to_string(), Value::from(9i32));

        let (key, value) = map.get_index(0).unwrap();
        assert_eq!(key, "a");
        assert_eq!(value, &Value::Int32(9));
    }
}
