/// Bounded result cache with insertion-order (FIFO) eviction and a
/// staleness window.
///
/// Not an LRU: reads never change eviction order. A stale entry is treated
/// as absent on read but stays stored until overwritten or evicted.

use chrono::{DateTime, Duration, Utc};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::hash::Hash;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ResultCache<K, V> {
    entries: FxHashMap<K, CacheEntry<V>>,
    /// Keys from oldest to newest insertion.
    order: VecDeque<K>,
    max_entries: usize,
    staleness: Duration,
}

impl<K: Eq + Hash + Clone, V: Clone> ResultCache<K, V> {
    /// A zero `max_entries` is raised to one.
    pub fn new(max_entries: usize, staleness: Duration) -> Self {
        Self {
            entries: FxHashMap::default(),
            order: VecDeque::new(),
            max_entries: max_entries.max(1),
            staleness,
        }
    }

    /// The cached value if present and younger than the staleness window.
    pub fn get(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let entry = self.entries.get(key)?;
        if now - entry.inserted_at < self.staleness {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Insert or replace. Replacing a key moves it to the newest position.
    /// Inserting a new key at capacity first evicts the oldest-inserted key.
    pub fn put(&mut self, key: K, value: V, now: DateTime<Utc>) {
        if self.entries.contains_key(&key) {
            self.order.retain(|k| k != &key);
        } else {
            while self.entries.len() >= self.max_entries {
                match self.order.pop_front() {
                    Some(oldest) => {
                        self.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
            },
        );
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys from oldest to newest insertion.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
