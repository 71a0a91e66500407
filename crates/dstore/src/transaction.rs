//! Transaction context: read, write and delete sets
//!
//! A transaction buffers its writes and deletes locally and remembers the
//! version of every key it read from the main table. Nothing becomes visible
//! to other readers until [`Transaction::commit`] validates those versions.

use std::fmt;

use tracing::trace;

use crate::store::{DeleteSet, KeyValueStore, ReadSet, WriteSet};

/// An open optimistic transaction against a [`KeyValueStore`]
///
/// `commit` and `rollback` consume the handle. Dropping it without either
/// discards the buffered changes, exactly like `rollback`.
pub struct Transaction<'s> {
    store: &'s KeyValueStore,

    /// Version observed at the first read of each key
    read_set: ReadSet,

    /// Pending insertions/updates
    write_set: WriteSet,

    /// Pending removals; always disjoint from `write_set`
    delete_set: DeleteSet,
}

impl<'s> Transaction<'s> {
    pub(crate) fn new(store: &'s KeyValueStore) -> Self {
        Self {
            store,
            read_set: ReadSet::default(),
            write_set: WriteSet::default(),
            delete_set: DeleteSet::default(),
        }
    }

    /// Read a key as seen by this transaction
    ///
    /// Pending deletes hide the key and pending writes are returned as-is.
    /// Otherwise the main table is consulted and the version seen is pinned
    /// in the read set; later reads of the same key keep the first version.
    pub fn get(&mut self, key: &str) -> Option<String> {
        if self.delete_set.contains(key) {
            return None;
        }
        if let Some(value) = self.write_set.get(key) {
            return Some(value.clone());
        }

        let current = self.store.table().read().get(key).cloned()?;
        let value = current.value().to_owned();
        if !self.read_set.contains_key(key) {
            self.read_set.insert(key.to_owned(), current);
        }
        Some(value)
    }

    /// Buffer a write
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.delete_set.remove(&key);
        self.write_set.insert(key, value.into());
    }

    /// Buffer a delete
    pub fn delete(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.write_set.remove(&key);
        self.delete_set.insert(key);
    }

    /// Validate reads and apply buffered changes
    ///
    /// # Returns
    /// * `true` - All changes were applied
    /// * `false` - A key read by this transaction changed or disappeared;
    ///   nothing was applied and the caller may retry
    pub fn commit(self) -> bool {
        let Self {
            store,
            read_set,
            write_set,
            delete_set,
        } = self;
        store.apply(&read_set, write_set, delete_set)
    }

    /// Discard buffered changes
    pub fn rollback(self) {
        trace!(
            writes = self.write_set.len(),
            deletes = self.delete_set.len(),
            "Transaction rolled back"
        );
    }

    /// Number of keys pinned in the read set
    pub fn read_set_len(&self) -> usize {
        self.read_set.len()
    }

    /// Number of pending writes
    pub fn write_set_len(&self) -> usize {
        self.write_set.len()
    }

    /// Number of pending deletes
    pub fn delete_set_len(&self) -> usize {
        self.delete_set.len()
    }

    /// Whether the transaction has buffered no changes
    pub fn is_read_only(&self) -> bool {
        self.write_set.is_empty() && self.delete_set.is_empty()
    }
}

impl fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("read_set", &self.read_set)
            .field("write_set", &self.write_set)
            .field("delete_set", &self.delete_set)
            .finish()
    }
}
