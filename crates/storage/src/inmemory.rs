//! In-memory storage backend backed by a genuinely ordered keyspace.
//!
//! Unlike a hash map, a `BTreeMap` keeps keys in byte-lexicographic order, so
//! `range_scan`/`prefix_scan` are real range queries (`O(log n + k)`) rather
//! than a full-table filter-then-sort. This is what makes the eleven index
//! permutations in [`crate::indexes`] actually pay off for an in-memory store.

use crate::{StorageBackend, StorageResult, StorageStats};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

/// In-memory storage backend over a lock-guarded `BTreeMap`.
///
/// Thread-safe via a single `RwLock`: reads take a shared lock, writes take
/// an exclusive one. Fine for the read-heavy, single-writer discipline the
/// quad store assumes; a backend wanting true lock-free concurrent writes
/// would need a different structure (e.g. a concurrent skip list).
#[derive(Clone)]
pub struct InMemoryBackend {
    data: Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>,
    stats: Arc<RwLock<StorageStats>>,
}

impl InMemoryBackend {
    /// Create a new, empty in-memory backend.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(BTreeMap::new())),
            stats: Arc::new(RwLock::new(StorageStats::default())),
        }
    }

    /// Number of keys currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the backend holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Remove every key.
    pub fn clear(&mut self) {
        self.data.write().clear();
        *self.stats.write() = StorageStats::default();
    }

    /// The smallest key strictly greater than every key starting with `prefix`,
    /// or `None` if `prefix` is all `0xFF` bytes (in which case the range is
    /// unbounded above).
    fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
        let mut upper = prefix.to_vec();
        while let Some(&last) = upper.last() {
            if last == 0xFF {
                upper.pop();
            } else {
                *upper.last_mut().unwrap() += 1;
                return Some(upper);
            }
        }
        None
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for InMemoryBackend {
    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        let value = self.data.read().get(key).cloned();
        self.stats.write().reads += 1;
        Ok(value)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        let mut data = self.data.write();
        data.insert(key.to_vec(), value.to_vec());
        let mut stats = self.stats.write();
        stats.writes += 1;
        stats.key_count = data.len() as u64;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> StorageResult<()> {
        let mut data = self.data.write();
        data.remove(key);
        let mut stats = self.stats.write();
        stats.deletes += 1;
        stats.key_count = data.len() as u64;
        Ok(())
    }

    fn contains(&self, key: &[u8]) -> StorageResult<bool> {
        Ok(self.data.read().contains_key(key))
    }

    fn range_scan<'a>(
        &'a self,
        start: &[u8],
        end: &[u8],
    ) -> StorageResult<Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a>> {
        let data = self.data.read();
        let results: Vec<_> = data
            .range(start.to_vec()..end.to_vec())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Box::new(results.into_iter()))
    }

    fn prefix_scan<'a>(
        &'a self,
        prefix: &[u8],
    ) -> StorageResult<Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a>> {
        let data = self.data.read();
        let lower = Bound::Included(prefix.to_vec());
        let upper = match Self::prefix_upper_bound(prefix) {
            Some(bound) => Bound::Excluded(bound),
            None => Bound::Unbounded,
        };
        let results: Vec<_> = data
            .range((lower, upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Box::new(results.into_iter()))
    }

    fn batch_put(&mut self, pairs: Vec<(Vec<u8>, Vec<u8>)>) -> StorageResult<()> {
        let mut data = self.data.write();
        for (k, v) in pairs {
            data.insert(k, v);
        }
        let mut stats = self.stats.write();
        stats.writes += data.len() as u64;
        stats.key_count = data.len() as u64;
        Ok(())
    }

    fn stats(&self) -> StorageStats {
        self.stats.read().clone()
    }
}
