//! Eviction policies
//!
//! A policy tracks access recency for keys and nominates one for eviction
//! when the backing store is full. [`LruEvictionPolicy`] keeps a lookup map
//! from key to list node plus a [`DoublyLinkedList`] ordered from least to
//! most recently used, giving O(1) access updates and evictions.

use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;

use crate::list::{DoublyLinkedList, NodeId};

/// Strategy that tracks key recency and picks eviction victims
pub trait EvictionPolicy<K> {
    /// Record that `key` was read or written
    fn key_accessed(&mut self, key: &K);

    /// Stop tracking and return the next victim, if any key is tracked
    fn evict(&mut self) -> Option<K>;

    /// Stop tracking `key` after the caller removed it
    fn remove_key(&mut self, key: &K);

    /// Number of tracked keys
    fn len(&self) -> usize;

    /// Whether no keys are tracked
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every tracked key
    fn clear(&mut self);
}

/// Least-recently-used eviction
#[derive(Debug)]
pub struct LruEvictionPolicy<K> {
    /// Ordered least (first) to most (last) recently used
    list: DoublyLinkedList<K>,
    mapper: HashMap<K, NodeId, RandomState>,
}

impl<K> LruEvictionPolicy<K>
where
    K: Hash + Eq + Clone,
{
    /// Create an empty policy
    pub fn new() -> Self {
        Self {
            list: DoublyLinkedList::new(),
            mapper: HashMap::with_hasher(RandomState::new()),
        }
    }

    /// Create an empty policy sized for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            list: DoublyLinkedList::with_capacity(capacity),
            mapper: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    /// Tracked keys, least recently used first
    pub fn keys_lru_order(&self) -> Vec<K> {
        self.list.iter().cloned().collect()
    }

    /// Whether `key` is tracked
    pub fn contains(&self, key: &K) -> bool {
        self.mapper.contains_key(key)
    }

    /// Keys in the lookup map, in no particular order
    pub fn tracked_keys(&self) -> impl Iterator<Item = &K> {
        self.mapper.keys()
    }
}

impl<K> Default for LruEvictionPolicy<K>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> EvictionPolicy<K> for LruEvictionPolicy<K>
where
    K: Hash + Eq + Clone,
{
    fn key_accessed(&mut self, key: &K) {
        match self.mapper.get(key) {
            Some(&id) => self.list.move_to_back(id),
            None => {
                let id = self.list.push_back(key.clone());
                self.mapper.insert(key.clone(), id);
            }
        }
    }

    fn evict(&mut self) -> Option<K> {
        let id = self.list.first()?;
        let key = self.list.remove(id);
        self.mapper.remove(&key);
        Some(key)
    }

    fn remove_key(&mut self, key: &K) {
        if let Some(id) = self.mapper.remove(key) {
            self.list.remove(id);
        }
    }

    fn len(&self) -> usize {
        self.mapper.len()
    }

    fn clear(&mut self) {
        self.list.clear();
        self.mapper.clear();
    }
}
