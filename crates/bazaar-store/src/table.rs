//! Typed table over a key-value map.

use std::collections::HashMap;
use std::hash::Hash;

/// A table of rows keyed by a typed identifier.
///
/// Thin wrapper over `HashMap` so the database snapshot reads like a set
/// of named relations instead of bare maps.
#[derive(Debug, Clone)]
pub struct Table<K, V> {
    rows: HashMap<K, V>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> Table<K, V> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a row by key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.rows.get(key)
    }

    /// Look up a row mutably by key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.rows.get_mut(key)
    }

    /// Insert or replace a row. Returns the previous row, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.rows.insert(key, value)
    }

    /// Remove a row by key.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.rows.remove(key)
    }

    /// Whether a row exists for the key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    /// Iterate over all rows.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.rows.iter()
    }

    /// Iterate over all values.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.rows.values()
    }

    /// Iterate over all values mutably.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.rows.values_mut()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut table: Table<String, i64> = Table::new();
        assert!(table.insert("a".to_string(), 1).is_none());
        assert_eq!(table.get(&"a".to_string()), Some(&1));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_insert_replaces() {
        let mut table: Table<String, i64> = Table::new();
        table.insert("a".to_string(), 1);
        assert_eq!(table.insert("a".to_string(), 2), Some(1));
        assert_eq!(table.get(&"a".to_string()), Some(&2));
    }

    #[test]
    fn test_remove() {
        let mut table: Table<String, i64> = Table::new();
        table.insert("a".to_string(), 1);
        assert_eq!(table.remove(&"a".to_string()), Some(1));
        assert!(table.is_empty());
    }
}
