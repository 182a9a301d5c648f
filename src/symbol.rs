//! Symbol tables for compact key encoding.
//!
//! A [`SymbolTable`] maps field names to compact numeric identifiers. The
//! tagged-binary format consults it for every map key: a resolved name is
//! encoded as a varint identifier, an unresolved name falls back to the
//! literal string. Absence of a mapping is never an error.
//!
//! Tables are immutable once built and safe to share across concurrent
//! encode sessions behind an [`Arc`](std::sync::Arc); the encoder never
//! mutates one.
//!
//! ## Examples
//!
//! ```rust
//! use pullwire::SymbolTable;
//!
//! let table = SymbolTable::from_pairs([("name", 0), ("age", 1)]);
//! assert_eq!(table.lookup_id("name"), Some(0));
//! assert_eq!(table.lookup_id("unknown"), None);
//! ```

use std::collections::HashMap;

/// An immutable name-to-identifier lookup table.
///
/// # Examples
///
/// ```rust
/// use pullwire::SymbolTable;
/// use std::sync::Arc;
///
/// let table = Arc::new(SymbolTable::from_pairs([("id", 5)]));
/// assert_eq!(table.lookup_id("id"), Some(5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    ids: HashMap<String, u32>,
}

impl SymbolTable {
    /// Creates an empty table. Every lookup misses, so every key falls back
    /// to its literal string form.
    #[must_use]
    pub fn empty() -> Self {
        SymbolTable {
            ids: HashMap::new(),
        }
    }

    /// Builds a table from `(name, id)` pairs.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pullwire::SymbolTable;
    ///
    /// let table = SymbolTable::from_pairs([("a", 5), ("b", 6)]);
    /// assert_eq!(table.len(), 2);
    /// ```
    #[must_use]
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        SymbolTable {
            ids: pairs.into_iter().map(|(name, id)| (name.into(), id)).collect(),
        }
    }

    /// Looks up the compact identifier for a field name.
    ///
    /// Returns `None` when the name has no mapping; the caller then encodes
    /// the literal string instead.
    #[inline]
    #[must_use]
    pub fn lookup_id(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    /// Returns the number of mappings in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the table has no mappings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_hit_and_miss() {
        let table = SymbolTable::from_pairs([("a", 5u32), ("b", 6)]);
        assert_eq!(table.lookup_id("a"), Some(5));
        assert_eq!(table.lookup_id("b"), Some(6));
        assert_eq!(table.lookup_id("c"), None);
    }

    #[test]
    fn test_empty_table_always_misses() {
        let table = SymbolTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.lookup_id("anything"), None);
    }
}
