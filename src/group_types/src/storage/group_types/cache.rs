//! Age-bounded cache for project group type mappings.
//!
//! Each project holds at most one entry: its full mapping as of the last
//! store fetch. Entries older than the configured age are ignored on read and
//! overwritten by the next fetch.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;

use super::mapping::{GroupTypeToColumnIndex, ProjectId};

/// Cached value and the time it was stored.
#[derive(Clone, Debug)]
struct CachedValue<V> {
    value: V,
    stored_at: Instant,
}

/// Cache whose entries are valid for a bounded time after being stored.
///
/// Stale entries are not purged; they read as absent until replaced. The
/// number of keys is bounded, evicting the least recently used key when full.
///
/// Not synchronized: callers share it behind a lock.
pub struct AgeBoundedCache<K: Hash + Eq, V> {
    entries: LruCache<K, CachedValue<V>>,
    max_age: Duration,
}

impl<K: Hash + Eq, V: Clone> AgeBoundedCache<K, V> {
    /// Create a cache holding up to `max_entries` keys, each valid for `max_age`.
    pub fn new(max_age: Duration, max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            max_age,
        }
    }

    /// Get the value for `key` if it was stored no longer than `max_age` ago.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let cached = self.entries.get(key)?;
        if cached.stored_at.elapsed() <= self.max_age {
            Some(cached.value.clone())
        } else {
            None
        }
    }

    /// Store `value` under `key` with the current time, replacing any prior entry.
    pub fn set(&mut self, key: K, value: V) {
        self.entries.put(
            key,
            CachedValue {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Remove the entry for `key` outright.
    pub fn invalidate(&mut self, key: &K) {
        self.entries.pop(key);
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            num_entries: self.entries.len(),
            max_entries: self.entries.cap().get(),
            max_age: self.max_age,
        }
    }
}

/// Cache of full group type mappings keyed by project.
pub type GroupTypeCache = AgeBoundedCache<ProjectId, GroupTypeToColumnIndex>;

/// Cache statistics for monitoring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries in cache, including stale ones.
    pub num_entries: usize,
    /// Maximum number of entries.
    pub max_entries: usize,
    /// Age after which an entry is ignored.
    pub max_age: Duration,
}
