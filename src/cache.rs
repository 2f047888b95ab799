//! Opt-in LRU caches for per-cell mesh geometry and pathfinding results (spec §5
//! "Caching"). Grids never consult these on their own; a caller wraps a [`Grid`]'s
//! queries or a pathfinding call with one of these when repeated lookups on the same
//! keys are expected.
//!
//! [`Grid`]: crate::grid::Grid

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

use crate::cell::{Cell, CellPath};
use crate::mesh::MeshData;

/// A fixed-capacity, thread-safe LRU cache keyed by `K`.
///
/// Guarded by a single [`Mutex`] rather than sharding, matching the spec's
/// "per-cache lock when configured" clause — one lock per cache instance, not one
/// lock per entry.
pub struct LruCache<K, V> {
    capacity: usize,
    inner: Mutex<LruInner<K, V>>,
}

struct LruInner<K, V> {
    entries: HashMap<K, V>,
    /// Most-recently-used last.
    recency: Vec<K>,
}

impl<K: Clone + Eq + Hash, V: Clone> LruCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be non-zero");
        Self {
            capacity,
            inner: Mutex::new(LruInner { entries: HashMap::new(), recency: Vec::new() }),
        }
    }

    /// Returns the cached value for `key`, marking it most-recently-used.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock().unwrap();
        let value = inner.entries.get(key).cloned()?;
        if let Some(pos) = inner.recency.iter().position(|k| k == key) {
            let k = inner.recency.remove(pos);
            inner.recency.push(k);
        }
        Some(value)
    }

    /// Inserts or updates `key`, evicting the least-recently-used entry if the cache
    /// is at capacity and `key` is new.
    pub fn insert(&self, key: K, value: V) {
        let mut inner = self.inner.lock().unwrap();
        if inner.entries.contains_key(&key) {
            if let Some(pos) = inner.recency.iter().position(|k| *k == key) {
                inner.recency.remove(pos);
            }
        } else if inner.entries.len() >= self.capacity {
            let lru = inner.recency.remove(0);
            inner.entries.remove(&lru);
        }
        inner.recency.push(key.clone());
        inner.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries.clear();
        inner.recency.clear();
    }
}

/// An [`LruCache`] from a single cell to its materialized mesh geometry (e.g. a
/// [`crate::grid::MeshGrid`] face looked up repeatedly during rendering).
pub type CellMeshCache = LruCache<Cell, MeshData>;

/// An [`LruCache`] from a `(start, goal)` pair to a previously computed path.
pub type PathCache = LruCache<(Cell, Cell), CellPath>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_used_entry() {
        let cache: LruCache<i32, i32> = LruCache::new(2);
        cache.insert(1, 10);
        cache.insert(2, 20);
        assert_eq!(cache.get(&1), Some(10));
        cache.insert(3, 30);
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(cache.get(&3), Some(30));
    }

    #[test]
    fn reinserting_an_existing_key_refreshes_recency() {
        let cache: LruCache<i32, i32> = LruCache::new(2);
        cache.insert(1, 10);
        cache.insert(2, 20);
        cache.insert(1, 11);
        cache.insert(3, 30);
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&1), Some(11));
    }
}
