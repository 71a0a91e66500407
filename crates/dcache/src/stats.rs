//! Cache statistics tracking

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Event counted by [`CacheStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Counter {
    Hit,
    Miss,
    Insert,
    Eviction,
}

/// Hit, miss, insert and eviction counters for a [`Cache`](crate::Cache)
#[derive(Debug, Default)]
pub struct CacheStats {
    counters: [AtomicU64; 4],
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Lookups that found a value
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Successful `set` calls
    pub inserts: u64,
    /// Keys removed to make room
    pub evictions: u64,
}

impl StatsSnapshot {
    /// Fraction of lookups that hit (0.0 when there were none)
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={} misses={} inserts={} evictions={} hit_ratio={:.2}",
            self.hits,
            self.misses,
            self.inserts,
            self.evictions,
            self.hit_ratio()
        )
    }
}

impl CacheStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self, counter: Counter) {
        self.counters[counter as usize].fetch_add(1, Ordering::Relaxed);
    }

    fn load(&self, counter: Counter) -> u64 {
        self.counters[counter as usize].load(Ordering::Relaxed)
    }

    pub(crate) fn record_hit(&self) {
        self.bump(Counter::Hit);
    }

    pub(crate) fn record_miss(&self) {
        self.bump(Counter::Miss);
    }

    pub(crate) fn record_insert(&self) {
        self.bump(Counter::Insert);
    }

    pub(crate) fn record_eviction(&self) {
        self.bump(Counter::Eviction);
    }

    /// Total hits
    pub fn hits(&self) -> u64 {
        self.load(Counter::Hit)
    }

    /// Total misses
    pub fn misses(&self) -> u64 {
        self.load(Counter::Miss)
    }

    /// Total successful inserts
    pub fn inserts(&self) -> u64 {
        self.load(Counter::Insert)
    }

    /// Total evictions
    pub fn evictions(&self) -> u64 {
        self.load(Counter::Eviction)
    }

    /// Hit ratio (0.0 to 1.0)
    pub fn hit_ratio(&self) -> f64 {
        self.snapshot().hit_ratio()
    }

    /// Copy all counters at once
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits(),
            misses: self.misses(),
            inserts: self.inserts(),
            evictions: self.evictions(),
        }
    }

    /// Zero every counter
    pub fn reset(&self) {
        for counter in &self.counters {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
