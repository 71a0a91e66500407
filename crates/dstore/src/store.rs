//! Main table and commit protocol
//!
//! The table maps keys to [`VersionedValue`]s and is the only state shared
//! between transactions. Transactions never lock it while they run; the
//! single cross-transaction interaction point is [`KeyValueStore::apply`],
//! which validates the read set and applies the buffered writes under the
//! table's write lock.

use std::collections::{HashMap, HashSet};

use ahash::RandomState;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::error::Error;
use crate::session::Session;
use crate::transaction::Transaction;
use crate::version::{VersionClock, VersionedValue};

pub(crate) type Table = HashMap<String, VersionedValue, RandomState>;
pub(crate) type ReadSet = HashMap<String, VersionedValue, RandomState>;
pub(crate) type WriteSet = HashMap<String, String, RandomState>;
pub(crate) type DeleteSet = HashSet<String, RandomState>;

/// Transactional key-value store using optimistic concurrency control
///
/// Readers and writers never block each other while a transaction body runs.
/// Conflicts are detected at commit time by comparing the versions observed
/// during the transaction with the live table.
///
/// # Example
///
/// ```
/// use dstore::KeyValueStore;
///
/// let store = KeyValueStore::new();
/// store.set("key1", "value1");
///
/// let mut txn = store.begin();
/// txn.set("key1", "value2");
/// assert_eq!(txn.get("key1").as_deref(), Some("value2"));
/// assert_eq!(store.get("key1").as_deref(), Some("value1"));
/// assert!(txn.commit());
///
/// assert_eq!(store.get("key1").as_deref(), Some("value2"));
/// ```
#[derive(Debug, Default)]
pub struct KeyValueStore {
    /// Live key → versioned value table
    table: RwLock<Table>,

    /// Version source for every committed write
    clock: VersionClock,
}

impl KeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a key directly from the main table
    pub fn get(&self, key: &str) -> Option<String> {
        self.table.read().get(key).map(|v| v.value().to_owned())
    }

    /// Read a key together with its current version
    pub fn get_versioned(&self, key: &str) -> Option<VersionedValue> {
        self.table.read().get(key).cloned()
    }

    /// Write a key directly with a freshly minted version
    ///
    /// # Returns
    /// * `u64` - Version assigned to the write
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> u64 {
        let mut table = self.table.write();
        let version = self.clock.next();
        table.insert(key.into(), VersionedValue::new(value, version));
        version
    }

    /// Remove a key directly from the main table
    ///
    /// # Returns
    /// * `bool` - Whether the key was present
    pub fn delete(&self, key: &str) -> bool {
        self.table.write().remove(key).is_some()
    }

    /// Check whether a key is present in the main table
    pub fn contains_key(&self, key: &str) -> bool {
        self.table.read().contains_key(key)
    }

    /// Number of keys in the main table
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    /// Check if the main table is empty
    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Last version minted by this store
    pub fn current_version(&self) -> u64 {
        self.clock.current()
    }

    /// Start a new transaction
    pub fn begin(&self) -> Transaction<'_> {
        Transaction::new(self)
    }

    /// Open a session with the begin/commit/rollback call surface
    pub fn session(&self) -> Session<'_> {
        Session::new(self)
    }

    /// Run `body` in a transaction, retrying on commit conflicts
    ///
    /// An `Err` from `body` rolls the transaction back and is returned as-is.
    /// If every one of `max_attempts` commits conflicts, fails with
    /// [`Error::RetriesExhausted`].
    ///
    /// # Example
    ///
    /// ```
    /// use dstore::{Error, KeyValueStore};
    ///
    /// let store = KeyValueStore::new();
    /// store.set("counter", "41");
    ///
    /// let next = store
    ///     .transact(5, |txn| {
    ///         let n: u64 = txn.get("counter").and_then(|v| v.parse().ok()).unwrap_or(0);
    ///         txn.set("counter", (n + 1).to_string());
    ///         Ok::<_, Error>(n + 1)
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(next, 42);
    /// ```
    pub fn transact<T, E, F>(&self, max_attempts: usize, mut body: F) -> std::result::Result<T, E>
    where
        F: FnMut(&mut Transaction<'_>) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        for attempt in 1..=max_attempts {
            let mut txn = self.begin();
            let output = match body(&mut txn) {
                Ok(output) => output,
                Err(e) => {
                    txn.rollback();
                    return Err(e);
                }
            };

            if txn.commit() {
                return Ok(output);
            }
            debug!(attempt, max_attempts, "Transaction conflicted, retrying");
        }

        warn!(attempts = max_attempts, "Transaction retries exhausted");
        Err(Error::RetriesExhausted {
            attempts: max_attempts,
        }
        .into())
    }

    pub(crate) fn table(&self) -> &RwLock<Table> {
        &self.table
    }

    /// Validate a transaction's reads and apply its buffered changes
    ///
    /// Validation and application happen under one write lock so no other
    /// commit can change a validated version before the writes land.
    pub(crate) fn apply(
        &self,
        read_set: &ReadSet,
        write_set: WriteSet,
        delete_set: DeleteSet,
    ) -> bool {
        let mut table = self.table.write();

        for (key, observed) in read_set {
            match table.get(key) {
                Some(current) if current.version() == observed.version() => {}
                current => {
                    debug!(
                        key = %key,
                        observed = observed.version(),
                        current = ?current.map(VersionedValue::version),
                        "Commit conflict"
                    );
                    return false;
                }
            }
        }

        let deletes = delete_set.len();
        for key in delete_set {
            table.remove(&key);
        }

        let writes = write_set.len();
        for (key, value) in write_set {
            let version = self.clock.next();
            table.insert(key, VersionedValue::new(value, version));
        }

        trace!(reads = read_set.len(), writes, deletes, "Transaction committed");
        true
    }
}
