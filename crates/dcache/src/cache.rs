//! Bounded cache combining a backing store with an eviction policy

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::StoreError;
use crate::policy::{EvictionPolicy, LruEvictionPolicy};
use crate::stats::CacheStats;
use crate::store::{HashMapStore, Store};

/// Store and policy mutated together under one lock
struct Inner<S, P> {
    store: S,
    policy: P,
}

/// Fixed-capacity key-value cache with pluggable storage and eviction
///
/// Store mutation and recency bookkeeping happen in one critical section,
/// so the policy always tracks exactly the keys resident in the store.
///
/// # Example
///
/// ```
/// use dcache::Cache;
///
/// let cache = Cache::with_capacity(2);
/// cache.set("a", 1);
/// cache.set("b", 2);
/// cache.get(&"a");
/// cache.set("c", 3); // evicts "b"
///
/// assert_eq!(cache.get(&"b"), None);
/// assert_eq!(cache.get(&"a"), Some(1));
/// ```
pub struct Cache<K, V, S = HashMapStore<K, V>, P = LruEvictionPolicy<K>> {
    inner: Mutex<Inner<S, P>>,
    stats: CacheStats,
    _marker: PhantomData<fn(K) -> V>,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
{
    /// Create an LRU cache over a [`HashMapStore`] holding `capacity` keys
    ///
    /// # Panics
    /// If `capacity` is zero
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(
            LruEvictionPolicy::with_capacity(capacity),
            HashMapStore::new(capacity),
        )
    }
}

impl<K, V, S> Cache<K, V, S, LruEvictionPolicy<K>>
where
    K: Hash + Eq + Clone,
{
    /// Resident keys, least recently used first
    pub fn keys_lru_order(&self) -> Vec<K> {
        self.inner.lock().policy.keys_lru_order()
    }
}

impl<K, V, S, P> Cache<K, V, S, P>
where
    K: Clone + Debug,
    V: Clone,
    S: Store<K, V>,
    P: EvictionPolicy<K>,
{
    /// Create a cache from an eviction policy and an empty store
    pub fn new(policy: P, store: S) -> Self {
        Self {
            inner: Mutex::new(Inner { store, policy }),
            stats: CacheStats::new(),
            _marker: PhantomData,
        }
    }

    /// Look up a key, marking it most recently used on a hit
    pub fn get(&self, key: &K) -> Option<V> {
        let mut guard = self.inner.lock();
        let Inner { store, policy } = &mut *guard;

        match store.get(key) {
            Ok(value) => {
                let value = value.clone();
                policy.key_accessed(key);
                self.stats.record_hit();
                Some(value)
            }
            Err(_) => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Insert or overwrite a key, evicting one victim if the store is full
    ///
    /// # Panics
    /// If the store is full but the policy tracks no key, or the store still
    /// rejects the key after an eviction. Both mean the store and policy
    /// bookkeeping have diverged.
    pub fn set(&self, key: K, value: V) {
        let mut guard = self.inner.lock();
        let Inner { store, policy } = &mut *guard;

        match store.set(key.clone(), value.clone()) {
            Ok(()) => {}
            Err(StoreError::StorageFull { capacity }) => {
                let victim = match policy.evict() {
                    Some(victim) => victim,
                    None => panic!(
                        "Unexpected state: storage full (capacity {}) and no key to evict",
                        capacity
                    ),
                };
                if let Err(e) = store.delete(&victim) {
                    panic!("Evicted key {:?} missing from store: {}", victim, e);
                }
                self.stats.record_eviction();
                debug!(?victim, capacity, "Evicted key");

                if let Err(e) = store.set(key.clone(), value) {
                    panic!("Insert failed after eviction: {}", e);
                }
            }
            Err(e) => panic!("Store rejected insert: {}", e),
        }

        policy.key_accessed(&key);
        self.stats.record_insert();
        trace!(len = store.len(), "Inserted key");
    }

    /// Remove a key, returning its value if it was resident
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut guard = self.inner.lock();
        let Inner { store, policy } = &mut *guard;

        let value = store.delete(key).ok()?;
        policy.remove_key(key);
        Some(value)
    }

    /// Whether a key is resident; does not affect recency
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().store.contains(key)
    }

    /// Number of resident keys
    pub fn len(&self) -> usize {
        self.inner.lock().store.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().store.is_empty()
    }

    /// Maximum number of resident keys
    pub fn capacity(&self) -> usize {
        self.inner.lock().store.capacity()
    }

    /// Drop every key and reset statistics
    pub fn clear(&self) {
        let mut guard = self.inner.lock();
        guard.store.clear();
        guard.policy.clear();
        self.stats.reset();
    }

    /// Cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}
