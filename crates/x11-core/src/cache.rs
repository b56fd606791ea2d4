//! Injectable computation cache
//!
//! Filter weights depend only on the filter family and its parameters, so
//! they can be memoized. The cache is an explicit object handed to the
//! smoothers that want it; nothing here is process-wide. Cloning a cache
//! yields another handle onto the same storage.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::trace;

/// Cache eviction policy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CachePolicy {
    /// No caching
    NoCache,
    /// Least recently used eviction
    Lru { max_entries: usize },
    /// Unbounded - never evict, only add
    Unbounded,
}

impl Default for CachePolicy {
    fn default() -> Self {
        CachePolicy::Lru { max_entries: 64 }
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
    /// Number of entries currently in cache
    pub entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

struct Entry<V> {
    value: Arc<V>,
    last_access: u64,
}

type Storage<K, V> = Arc<Mutex<HashMap<K, Entry<V>>>>;

/// Thread-safe memo table keyed by `K`
pub struct ComputationCache<K, V> {
    storage: Storage<K, V>,
    policy: CachePolicy,
    hits: Arc<AtomicUsize>,
    misses: Arc<AtomicUsize>,
    clock: Arc<AtomicU64>,
}

impl<K, V> ComputationCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create a new cache with the specified policy
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
            policy,
            hits: Arc::new(AtomicUsize::new(0)),
            misses: Arc::new(AtomicUsize::new(0)),
            clock: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Return the cached value for `key`, computing and storing it on a miss
    ///
    /// Errors from `compute` are passed through and nothing is stored.
    /// The computation runs outside the lock; two threads missing on the
    /// same key may both compute, and the later insert wins.
    pub fn get_or_try_insert_with<F>(&self, key: &K, compute: F) -> Result<Arc<V>>
    where
        F: FnOnce(&K) -> Result<V>,
    {
        if matches!(self.policy, CachePolicy::NoCache) {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return compute(key).map(Arc::new);
        }

        let now = self.clock.fetch_add(1, Ordering::Relaxed);
        {
            let mut storage = self.lock()?;
            if let Some(entry) = storage.get_mut(key) {
                entry.last_access = now;
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Arc::clone(&entry.value));
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!("cache miss, computing value");
        let value = Arc::new(compute(key)?);

        let mut storage = self.lock()?;
        if let CachePolicy::Lru { max_entries } = self.policy {
            if max_entries == 0 {
                return Ok(value);
            }
            while storage.len() >= max_entries && !storage.contains_key(key) {
                let oldest = storage
                    .iter()
                    .min_by_key(|(_, e)| e.last_access)
                    .map(|(k, _)| k.clone());
                match oldest {
                    Some(k) => {
                        storage.remove(&k);
                    }
                    None => break,
                }
            }
        }
        storage.insert(
            key.clone(),
            Entry {
                value: Arc::clone(&value),
                last_access: now,
            },
        );
        Ok(value)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let entries = self.storage.lock().map(|s| s.len()).unwrap_or(0);
        CacheStats {
            hits,
            misses,
            entries,
            hit_rate: if hits + misses > 0 {
                hits as f64 / (hits + misses) as f64
            } else {
                0.0
            },
        }
    }

    /// Clear all entries and reset statistics
    pub fn clear(&self) {
        if let Ok(mut storage) = self.storage.lock() {
            storage.clear();
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.clock.store(0, Ordering::Relaxed);
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<K, Entry<V>>>> {
        self.storage
            .lock()
            .map_err(|_| Error::Cache("cache storage lock poisoned".to_string()))
    }
}

impl<K, V> Clone for ComputationCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            policy: self.policy.clone(),
            hits: Arc::clone(&self.hits),
            misses: Arc::clone(&self.misses),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<K, V> std::fmt::Debug for ComputationCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputationCache")
            .field("policy", &self.policy)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}
