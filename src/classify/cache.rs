//! Fixed-capacity read-through cache with first-come admission.

use std::collections::HashMap;
use std::hash::Hash;

/// Holds at most `capacity` entries. Once full, new keys are not admitted
/// and nothing is evicted.
#[derive(Debug)]
pub struct ContentCache<K, V> {
    capacity: usize,
    entries: HashMap<K, V>,
}

impl<K: Eq + Hash, V> ContentCache<K, V> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { capacity, entries: HashMap::new() }
    }

    /// Cached value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Stores `value` if there is room or `key` is already cached.
    /// Returns whether it was stored.
    pub fn admit(&mut self, key: K, value: V) -> bool {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, value);
        true
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_until_full_then_refuses_new_keys() {
        let mut cache = ContentCache::new(2);
        assert!(cache.admit("a", 1));
        assert!(cache.admit("b", 2));
        assert!(!cache.admit("c", 3));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"c"), None);
    }

    #[test]
    fn existing_key_can_be_refreshed_when_full() {
        let mut cache = ContentCache::new(1);
        assert!(cache.admit("a", 1));
        assert!(cache.admit("a", 5));
        assert_eq!(cache.get(&"a"), Some(&5));
    }

    #[test]
    fn zero_capacity_caches_nothing() {
        let mut cache: ContentCache<&str, i32> = ContentCache::new(0);
        assert!(!cache.admit("a", 1));
        assert!(cache.is_empty());
    }
}
