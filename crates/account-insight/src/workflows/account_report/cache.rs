use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;

use super::views::AccountReport;

/// Report cache shared by every request handled by the process.
pub type ReportCache = TtlCache<Arc<AccountReport>>;

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Bounded least-recently-used cache whose entries expire after a fixed TTL.
///
/// A single lock guards the whole map. Expired entries are treated as absent
/// and dropped by the lookup that notices them.
pub struct TtlCache<V> {
    entries: Mutex<LruCache<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Lookup evaluated at `now`; a hit becomes the most recently used entry.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.lock();
        let entry = entries.get(key)?;
        if now.saturating_duration_since(entry.stored_at) > self.ttl {
            entries.pop(key);
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_at(key, value, Instant::now());
    }

    /// Inserts or refreshes `key`. When the cache is full and `key` is new,
    /// exactly one least-recently-used entry is evicted first.
    pub fn set_at(&self, key: impl Into<String>, value: V, now: Instant) {
        self.lock().put(
            key.into(),
            CacheEntry {
                value,
                stored_at: now,
            },
        );
    }

    // A poisoned lock only means another request panicked mid-operation; the
    // map itself stays structurally valid.
    fn lock(&self) -> MutexGuard<'_, LruCache<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
