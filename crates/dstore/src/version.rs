//! Versioned values and the version clock
//!
//! Every committed value carries a version minted from a single
//! monotonically increasing counter owned by the store. No two writes
//! ever receive the same version.

use std::sync::atomic::{AtomicU64, Ordering};

/// A value together with the version it was written at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    value: String,
    version: u64,
}

impl VersionedValue {
    /// Wrap a value with its version
    pub fn new(value: impl Into<String>, version: u64) -> Self {
        Self {
            value: value.into(),
            version,
        }
    }

    /// The stored value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The version this value was written at
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Consume and return the stored value
    pub fn into_value(self) -> String {
        self.value
    }
}

/// Source of unique, increasing version numbers
#[derive(Debug, Default)]
pub struct VersionClock {
    last: AtomicU64,
}

impl VersionClock {
    /// Create a clock; the first minted version is 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next version
    pub fn next(&self) -> u64 {
        self.last.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Last version handed out (0 if none yet)
    pub fn current(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_versioned_value_accessors() {
        let v = VersionedValue::new("hello", 7);
        assert_eq!(v.value(), "hello");
        assert_eq!(v.version(), 7);
        assert_eq!(v.into_value(), "hello");
    }

    #[test]
    fn test_clock_starts_at_one() {
        let clock = VersionClock::new();
        assert_eq!(clock.current(), 0);
        assert_eq!(clock.next(), 1);
        assert_eq!(clock.next(), 2);
        assert_eq!(clock.current(), 2);
    }

    #[test]
    fn test_clock_unique_across_threads() {
        let clock = Arc::new(VersionClock::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let clock = Arc::clone(&clock);
                thread::spawn(move || (0..1000).map(|_| clock.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for version in handle.join().unwrap() {
                assert!(seen.insert(version), "duplicate version {}", version);
            }
        }
        assert_eq!(seen.len(), 8000);
        assert_eq!(clock.current(), 8000);
    }
}
