use std::{
    collections::HashMap,
    hash::{DefaultHasher, Hash, Hasher},
    sync::{LazyLock, RwLock}
};

use crate::stats::TableStats;

/// Global table statistics cache
static STATS_CACHE: LazyLock<RwLock<StatsCache>> =
    LazyLock::new(|| RwLock::new(StatsCache::new(1000)));

/// Bounded cache of table statistics keyed by source and table reference
pub struct StatsCache {
    cache:    HashMap<u64, TableStats>,
    max_size: usize
}

impl StatsCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            cache: HashMap::with_capacity(max_size),
            max_size
        }
    }

    fn hash_key(source: &str, reference: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        source.hash(&mut hasher);
        reference.hash(&mut hasher);
        hasher.finish()
    }

    pub fn get(&self, source: &str, reference: &str) -> Option<TableStats> {
        let key = Self::hash_key(source, reference);
        self.cache.get(&key).copied()
    }

    pub fn insert(&mut self, source: &str, reference: &str, stats: TableStats) {
        // Simple eviction: clear half when full
        if self.cache.len() >= self.max_size {
            let keys: Vec<_> = self.cache.keys().take(self.max_size / 2).copied().collect();
            for key in keys {
                self.cache.remove(&key);
            }
        }

        let key = Self::hash_key(source, reference);
        self.cache.insert(key, stats);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Get cached statistics or None
pub fn get_cached(source: &str, reference: &str) -> Option<TableStats> {
    STATS_CACHE.read().ok()?.get(source, reference)
}

/// Cache statistics for a table reference
pub fn cache_stats(source: &str, reference: &str, stats: TableStats) {
    if let Ok(mut cache) = STATS_CACHE.write() {
        cache.insert(source, reference, stats);
    }
}
