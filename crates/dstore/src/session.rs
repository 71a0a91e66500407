//! Per-context session holding at most one open transaction
//!
//! A [`Session`] gives one logical thread of control the
//! `get/set/delete/begin/commit/rollback` surface: operations go through the
//! open transaction if there is one, straight to the main table otherwise.
//! Give each thread or task its own session; sessions are not shared.

use tracing::trace;

use crate::error::{Error, Result};
use crate::store::KeyValueStore;
use crate::transaction::Transaction;

/// One execution context's view of a [`KeyValueStore`]
#[derive(Debug)]
pub struct Session<'s> {
    store: &'s KeyValueStore,
    current: Option<Transaction<'s>>,
}

impl<'s> Session<'s> {
    /// Create a session with no open transaction
    pub fn new(store: &'s KeyValueStore) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Read a key through the open transaction, or from the main table
    pub fn get(&mut self, key: &str) -> Option<String> {
        match self.current.as_mut() {
            Some(txn) => txn.get(key),
            None => self.store.get(key),
        }
    }

    /// Write a key; buffered if a transaction is open
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        match self.current.as_mut() {
            Some(txn) => txn.set(key, value),
            None => {
                self.store.set(key, value);
            }
        }
    }

    /// Delete a key; buffered if a transaction is open
    pub fn delete(&mut self, key: &str) {
        match self.current.as_mut() {
            Some(txn) => txn.delete(key),
            None => {
                self.store.delete(key);
            }
        }
    }

    /// Open a transaction
    ///
    /// # Errors
    /// * [`Error::TransactionAlreadyActive`] - This session already has one
    pub fn begin(&mut self) -> Result<()> {
        if self.current.is_some() {
            return Err(Error::TransactionAlreadyActive);
        }
        trace!("Transaction started");
        self.current = Some(self.store.begin());
        Ok(())
    }

    /// Commit the open transaction
    ///
    /// The transaction is closed whether or not the commit succeeds.
    ///
    /// # Returns
    /// * `Ok(true)` - Changes applied
    /// * `Ok(false)` - Conflict detected, nothing applied
    ///
    /// # Errors
    /// * [`Error::NoActiveTransaction`] - No transaction is open
    pub fn commit(&mut self) -> Result<bool> {
        let txn = self.current.take().ok_or(Error::NoActiveTransaction)?;
        Ok(txn.commit())
    }

    /// Discard the open transaction
    ///
    /// # Errors
    /// * [`Error::NoActiveTransaction`] - No transaction is open
    pub fn rollback(&mut self) -> Result<()> {
        let txn = self.current.take().ok_or(Error::NoActiveTransaction)?;
        txn.rollback();
        Ok(())
    }

    /// Whether a transaction is currently open
    pub fn in_transaction(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_restores_previous_value() {
        let store = KeyValueStore::new();
        let mut session = store.session();

        session.set("key1", "value1");
        session.set("key2", "value2");
        session.begin().unwrap();
        session.set("key2", "value2.1");
        session.rollback().unwrap();

        assert_eq!(session.get("key2").as_deref(), Some("value2"));
    }

    #[test]
    fn test_transaction_commit() {
        let store = KeyValueStore::new();
        let mut session = store.session();

        session.set("key1", "initialValue");
        session.begin().unwrap();
        session.set("key1", "transactionValue");
        session.set("key2", "newValue");
        assert!(session.commit().unwrap());

        assert_eq!(session.get("key1").as_deref(), Some("transactionValue"));
        assert_eq!(session.get("key2").as_deref(), Some("newValue"));
    }

    #[test]
    fn test_transaction_rollback() {
        let store = KeyValueStore::new();
        let mut session = store.session();

        session.set("key1", "initialValue");
        session.begin().unwrap();
        session.set("key1", "transactionValue");
        session.set("key2", "newValue");
        session.rollback().unwrap();

        assert_eq!(session.get("key1").as_deref(), Some("initialValue"));
        assert_eq!(session.get("key2"), None);
    }

    #[test]
    fn test_delete_then_commit() {
        let store = KeyValueStore::new();
        let mut session = store.session();

        session.set("key1", "value1");
        session.begin().unwrap();
        session.delete("key1");
        assert_eq!(session.get("key1"), None);
        assert!(session.commit().unwrap());

        assert_eq!(session.get("key1"), None);
    }

    #[test]
    fn test_delete_outside_transaction() {
        let store = KeyValueStore::new();
        let mut session = store.session();

        session.set("key1", "value1");
        session.delete("key1");
        assert_eq!(session.get("key1"), None);
    }

    #[test]
    fn test_begin_twice() {
        let store = KeyValueStore::new();
        let mut session = store.session();

        session.begin().unwrap();
        assert_eq!(session.begin(), Err(Error::TransactionAlreadyActive));
        assert!(session.in_transaction());
    }

    #[test]
    fn test_commit_without_begin() {
        let store = KeyValueStore::new();
        let mut session = store.session();

        assert_eq!(session.commit(), Err(Error::NoActiveTransaction));
        assert_eq!(session.rollback(), Err(Error::NoActiveTransaction));
    }

    #[test]
    fn test_conflict_closes_transaction() {
        let store = KeyValueStore::new();
        store.set("k", "0");

        let mut session = store.session();
        session.begin().unwrap();
        session.get("k");
        session.set("k", "1");

        store.set("k", "other");

        assert_eq!(session.commit(), Ok(false));
        assert!(!session.in_transaction());
        assert_eq!(session.get("k").as_deref(), Some("other"));

        // Session is reusable after a conflict
        session.begin().unwrap();
        session.get("k");
        session.set("k", "1");
        assert_eq!(session.commit(), Ok(true));
        assert_eq!(store.get("k").as_deref(), Some("1"));
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = KeyValueStore::new();
        let mut a = store.session();
        let mut b = store.session();

        a.begin().unwrap();
        a.set("k", "from a");

        assert!(!b.in_transaction());
        assert_eq!(b.get("k"), None);
        b.begin().unwrap();
        b.rollback().unwrap();

        assert!(a.commit().unwrap());
        assert_eq!(b.get("k").as_deref(), Some("from a"));
    }
}
