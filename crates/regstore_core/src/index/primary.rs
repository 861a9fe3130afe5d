//! Primary index: unique id lookup.

use crate::error::{CoreError, CoreResult};
use crate::types::Locator;
use std::collections::HashMap;

/// Hash-based unique index from record id to locator.
///
/// `PrimaryIndex` resolves the target of every mutating store call before
/// any other structure is touched.
///
/// # Example
///
/// ```rust
/// use regstore_core::{Locator, PrimaryIndex};
///
/// let mut index = PrimaryIndex::new();
/// index.insert("JKT-1".to_string(), Locator::new(0, 0)).unwrap();
/// assert!(index.insert("JKT-1".to_string(), Locator::new(1, 0)).is_err());
/// assert_eq!(index.lookup("JKT-1"), Some(Locator::new(0, 0)));
/// ```
#[derive(Debug, Default)]
pub struct PrimaryIndex {
    entries: HashMap<String, Locator>,
}

impl PrimaryIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `id` to `locator`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateKey`] if `id` is already present. The
    /// existing entry is left untouched.
    pub fn insert(&mut self, id: String, locator: Locator) -> CoreResult<()> {
        use std::collections::hash_map::Entry;

        match self.entries.entry(id) {
            Entry::Occupied(entry) => Err(CoreError::duplicate_key(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(locator);
                Ok(())
            }
        }
    }

    /// Looks up the locator for `id`.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<Locator> {
        self.entries.get(id).copied()
    }

    /// Removes `id`, returning its locator if it was present.
    pub fn remove(&mut self, id: &str) -> Option<Locator> {
        self.entries.remove(id)
    }

    /// Checks if the index contains `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Iterates all `(id, locator)` entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Locator)> + '_ {
        self.entries.iter().map(|(id, loc)| (id.as_str(), *loc))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut index = PrimaryIndex::new();
        let loc = Locator::new(4, 0);

        index.insert("key1".to_string(), loc).unwrap();

        assert_eq!(index.lookup("key1"), Some(loc));
        assert!(index.contains("key1"));
    }

    #[test]
    fn lookup_missing() {
        let index = PrimaryIndex::new();
        assert_eq!(index.lookup("missing"), None);
    }

    #[test]
    fn duplicate_insert_fails_and_keeps_original() {
        let mut index = PrimaryIndex::new();
        index.insert("key".to_string(), Locator::new(0, 0)).unwrap();

        let result = index.insert("key".to_string(), Locator::new(1, 0));
        assert!(matches!(result, Err(CoreError::DuplicateKey { ref id }) if id == "key"));
        assert_eq!(index.lookup("key"), Some(Locator::new(0, 0)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn remove_entry() {
        let mut index = PrimaryIndex::new();
        index.insert("key".to_string(), Locator::new(2, 0)).unwrap();

        assert_eq!(index.remove("key"), Some(Locator::new(2, 0)));
        assert!(!index.contains("key"));
        assert_eq!(index.remove("key"), None);
    }

    #[test]
    fn len_and_iter() {
        let mut index = PrimaryIndex::new();

        for i in 0..5 {
            index.insert(format!("key{i}"), Locator::new(i, 0)).unwrap();
        }

        assert_eq!(index.len(), 5);
        assert!(!index.is_empty());
        assert_eq!(index.iter().count(), 5);
    }
}
