use std::borrow::Borrow;
use std::collections::VecDeque;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;

/// Fixed-capacity memoizing map with insertion-order eviction.
///
/// Lookups only touch the sharded map. Admissions and evictions are serialized
/// through the `order` lock, so the entry count never exceeds `capacity`, even
/// while a racing admission is in flight. Values are immutable once published.
pub struct BoundedCache<K, V> {
    entries: DashMap<K, Arc<V>>,
    order: Mutex<VecDeque<K>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// A capacity of zero never stores anything; every call computes.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity),
            order: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Return the cached value for `key`, computing and admitting it on a miss.
    ///
    /// `compute` runs outside any lock, so two threads missing on the same key
    /// may both compute. The first published value wins and is returned to both.
    pub fn get_or_compute<Q, F>(&self, key: &Q, compute: F) -> Arc<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(key) {
            return value;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let value = Arc::new(compute());
        if self.capacity == 0 {
            return value;
        }

        let mut order = self.order.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = self.entries.get(key) {
            return Arc::clone(existing.value());
        }
        while order.len() >= self.capacity {
            let Some(oldest) = order.pop_front() else {
                break;
            };
            self.entries.remove::<K>(&oldest);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("evicted oldest cache entry ({} retained)", order.len());
        }
        let owned: K = ToOwned::to_owned(key);
        order.push_back(owned.clone());
        self.entries.insert(owned, Arc::clone(&value));
        value
    }

    /// Plain lookup. Counts as a hit when present; misses are only counted by
    /// [`BoundedCache::get_or_compute`].
    pub fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.entries.get(key).map(|entry| Arc::clone(entry.value()))?;
        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(value)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove all entries. Counters are kept.
    pub fn clear(&self) {
        let mut order = self.order.lock().unwrap_or_else(|e| e.into_inner());
        order.clear();
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}
