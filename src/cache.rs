// TTL cache for resolved image URLs, keyed by the day-title query string
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

// Counters for the cache
#[derive(Debug, Default)]
struct CacheStats {
    hit_count: AtomicUsize,
    miss_count: AtomicUsize,
    eviction_count: AtomicUsize,
    expired_count: AtomicUsize,
}

/// Point-in-time snapshot of the cache counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStatsReport {
    pub items_count: usize,
    pub hit_count: usize,
    pub miss_count: usize,
    pub eviction_count: usize,
    pub expired_count: usize,
}

// Cache configuration options
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1024,
            ttl: Duration::from_secs(3600),
        }
    }
}

struct CacheEntry {
    url: String,
    created_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

/// Concurrent TTL cache in front of the image source. Only successful
/// lookups are stored; a miss always falls through to the source.
pub struct ImageUrlCache {
    entries: DashMap<String, CacheEntry>,
    config: RwLock<CacheConfig>,
    stats: CacheStats,
}

impl ImageUrlCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config: RwLock::new(config),
            stats: CacheStats::default(),
        }
    }

    /// Returns the cached URL for a query if present and not expired.
    pub fn get(&self, query: &str) -> Option<String> {
        let ttl = self.config.read().ttl;
        let expired = match self.entries.get(query) {
            Some(entry) => {
                if !entry.is_expired(ttl) {
                    self.stats.hit_count.fetch_add(1, Ordering::SeqCst);
                    return Some(entry.url.clone());
                }
                true
            }
            None => false,
        };

        if expired {
            self.entries.remove(query);
            self.stats.expired_count.fetch_add(1, Ordering::SeqCst);
        }
        self.stats.miss_count.fetch_add(1, Ordering::SeqCst);
        None
    }

    /// Stores a resolved URL, evicting the oldest entry when at capacity.
    pub fn store(&self, query: &str, url: String) {
        let max_entries = self.config.read().max_entries;
        if max_entries == 0 {
            return;
        }
        while !self.entries.contains_key(query) && self.entries.len() >= max_entries {
            self.evict_oldest();
        }

        self.entries.insert(
            query.to_string(),
            CacheEntry {
                url,
                created_at: Instant::now(),
            },
        );
    }

    /// Drops the entry for one query. Returns true if something was removed.
    pub fn invalidate(&self, query: &str) -> bool {
        self.entries.remove(query).is_some()
    }

    /// Shrinks or grows the capacity, evicting oldest entries when
    /// downsizing below the current item count.
    pub fn resize(&self, max_entries: usize) {
        self.config.write().max_entries = max_entries;
        while self.entries.len() > max_entries {
            self.evict_oldest();
        }
    }

    pub fn stats(&self) -> CacheStatsReport {
        CacheStatsReport {
            items_count: self.entries.len(),
            hit_count: self.stats.hit_count.load(Ordering::SeqCst),
            miss_count: self.stats.miss_count.load(Ordering::SeqCst),
            eviction_count: self.stats.eviction_count.load(Ordering::SeqCst),
            expired_count: self.stats.expired_count.load(Ordering::SeqCst),
        }
    }

    fn evict_oldest(&self) {
        let oldest_key = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().created_at)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest_key {
            if self.entries.remove(&key).is_some() {
                self.stats.eviction_count.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}
