//! A small bounded LRU cache.

use std::collections::HashMap;
use std::hash::Hash;

/// Fixed-capacity cache evicting the least-recently-used entry.
///
/// Recency is a separate key list, least recent first. Capacities are
/// small (~100), so linear repositioning is fine.
pub struct LruCache<K, V> {
    capacity: usize,
    map: HashMap<K, V>,
    recency: Vec<K>,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// New cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be positive");
        Self {
            capacity,
            map: HashMap::with_capacity(capacity),
            recency: Vec::with_capacity(capacity),
        }
    }

    /// Look up `key`, marking it most recently used on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.map.contains_key(key) {
            return None;
        }
        self.touch(key);
        self.map.get(key)
    }

    /// Insert or refresh `key`, evicting the least-recently-used entry
    /// if the cache overflows.
    pub fn put(&mut self, key: K, value: V) {
        if self.map.insert(key.clone(), value).is_some() {
            self.touch(&key);
            return;
        }
        self.recency.push(key);
        if self.map.len() > self.capacity {
            let evicted = self.recency.remove(0);
            self.map.remove(&evicted);
        }
    }

    /// Drop `key` if present.
    pub fn invalidate(&mut self, key: &K) {
        if self.map.remove(key).is_some() {
            self.recency.retain(|k| k != key);
        }
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.recency.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            let k = self.recency.remove(pos);
            self.recency.push(k);
        }
    }
}
