//! # dcache
//!
//! Bounded in-memory key-value cache with pluggable storage and eviction.
//!
//! ## Architecture
//! - **Store**: capacity-limited table ([`HashMapStore`] by default)
//! - **EvictionPolicy**: recency tracking and victim selection
//!   ([`LruEvictionPolicy`] by default)
//! - **DoublyLinkedList**: arena-backed list giving the LRU policy O(1)
//!   access updates and evictions
//! - **Cache**: guards store and policy with one lock; evicts and retries
//!   once when the store is full

#![warn(missing_docs)]

mod cache;
mod error;
mod list;
mod policy;
mod stats;
mod store;

pub use cache::Cache;
pub use error::{Result, StoreError};
pub use list::{DoublyLinkedList, Iter, NodeId};
pub use policy::{EvictionPolicy, LruEvictionPolicy};
pub use stats::{CacheStats, StatsSnapshot};
pub use store::{HashMapStore, Store};
