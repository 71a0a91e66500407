//! # dstore
//!
//! In-memory transactional key-value store using optimistic concurrency
//! control (OCC).
//!
//! ## Model
//! - Single process, memory only; nothing is persisted
//! - Transactions buffer writes and deletes, never block, and are validated
//!   at commit time against the versions they read
//! - Every committed value carries a unique, increasing version
//!
//! ## Entry points
//! - [`KeyValueStore::begin`]: explicit [`Transaction`] handle
//! - [`Session`]: begin/commit/rollback surface for one execution context
//! - [`KeyValueStore::transact`]: retry loop for conflicting transactions

#![warn(missing_docs)]

mod error;
mod session;
mod store;
mod transaction;
mod version;

pub use error::{Error, Result};
pub use session::Session;
pub use store::KeyValueStore;
pub use transaction::Transaction;
pub use version::{VersionClock, VersionedValue};
