//! Error types for dcache backing stores

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures reported by a [`Store`](crate::Store)
///
/// [`Cache`](crate::Cache) never surfaces these: a missing key becomes
/// `None` and a full store triggers eviction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Key is not present
    #[error("Key not found")]
    KeyNotFound,

    /// Store is at capacity and the key is new
    #[error("Storage full (capacity {capacity})")]
    StorageFull {
        /// Configured maximum number of keys
        capacity: usize,
    },
}
