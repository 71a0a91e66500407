//! Capacity-limited backing stores

use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;

use crate::error::{Result, StoreError};

/// Capacity-limited key-value table
///
/// Implementations must fail with [`StoreError::StorageFull`] only when
/// inserting a new key into a full table, and with
/// [`StoreError::KeyNotFound`] when reading or deleting an absent key.
pub trait Store<K, V> {
    /// Insert or overwrite a key
    fn set(&mut self, key: K, value: V) -> Result<()>;

    /// Borrow the value stored under a key
    fn get(&self, key: &K) -> Result<&V>;

    /// Remove a key and return its value
    fn delete(&mut self, key: &K) -> Result<V>;

    /// Whether a key is present
    fn contains(&self, key: &K) -> bool;

    /// Number of resident keys
    fn len(&self) -> usize;

    /// Whether the store is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident keys
    fn capacity(&self) -> usize;

    /// Remove every key
    fn clear(&mut self);
}

/// [`Store`] backed by a hash map
#[derive(Debug)]
pub struct HashMapStore<K, V> {
    data: HashMap<K, V, RandomState>,
    capacity: usize,
}

impl<K, V> HashMapStore<K, V>
where
    K: Hash + Eq,
{
    /// Create a store holding at most `capacity` keys
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");

        Self {
            data: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            capacity,
        }
    }

    fn is_full(&self) -> bool {
        self.data.len() >= self.capacity
    }
}

impl<K, V> Store<K, V> for HashMapStore<K, V>
where
    K: Hash + Eq,
{
    fn set(&mut self, key: K, value: V) -> Result<()> {
        if self.is_full() && !self.data.contains_key(&key) {
            return Err(StoreError::StorageFull {
                capacity: self.capacity,
            });
        }
        self.data.insert(key, value);
        Ok(())
    }

    fn get(&self, key: &K) -> Result<&V> {
        self.data.get(key).ok_or(StoreError::KeyNotFound)
    }

    fn delete(&mut self, key: &K) -> Result<V> {
        self.data.remove(key).ok_or(StoreError::KeyNotFound)
    }

    fn contains(&self, key: &K) -> bool {
        self.data.contains_key(key)
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.data.clear();
    }
}
