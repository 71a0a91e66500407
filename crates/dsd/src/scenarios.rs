//! Driver scenarios for the OCC store and the bounded cache

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use anyhow::{bail, ensure, Context, Result};
use dcache::Cache;
use dstore::KeyValueStore;
use tracing::{debug, info};

const COUNTER_KEY: &str = "counter";

/// Outcome of the contention workload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentionReport {
    /// Final value of the shared counter
    pub counter: u64,
    /// Commits that lost a race and were retried
    pub conflicts: u64,
}

/// Roll back a transaction and read the pre-transaction value
pub fn store_rollback(store: &KeyValueStore) -> Result<String> {
    let mut session = store.session();
    session.set("key1", "value1");
    session.set("key2", "value2");

    session.begin()?;
    session.set("key2", "value2.1");
    session.rollback()?;

    let value = session.get("key2").context("key2 missing after rollback")?;
    ensure!(value == "value2", "expected value2 after rollback, got {}", value);
    info!(key = "key2", value = %value, "Rollback restored original value");
    Ok(value)
}

/// Overwrite a key in a bounded cache and read it back
pub fn cache_overwrite(capacity: usize) -> Result<String> {
    ensure!(capacity > 0, "cache capacity must be greater than 0");

    let cache = Cache::with_capacity(capacity);
    cache.set("key1".to_string(), "value1".to_string());
    cache.set("key2".to_string(), "value2".to_string());
    cache.set("key2".to_string(), "value2.1".to_string());

    let value = cache
        .get(&"key2".to_string())
        .context("key2 missing from cache")?;
    ensure!(value == "value2.1", "expected value2.1, got {}", value);
    info!(
        key = "key2",
        value = %value,
        stats = %cache.stats().snapshot(),
        "Cache returned overwritten value"
    );
    Ok(value)
}

/// Increment one shared counter from many threads using retried transactions
pub fn contention(
    store: &KeyValueStore,
    threads: usize,
    rounds: usize,
    max_attempts: usize,
) -> Result<ContentionReport> {
    store.set(COUNTER_KEY, "0");
    let attempts = AtomicU64::new(0);

    thread::scope(|s| -> Result<()> {
        let workers: Vec<_> = (0..threads)
            .map(|worker| {
                let attempts = &attempts;
                s.spawn(move || -> Result<()> {
                    for _ in 0..rounds {
                        store.transact(max_attempts, |txn| -> Result<()> {
                            attempts.fetch_add(1, Ordering::Relaxed);
                            let current: u64 = match txn.get(COUNTER_KEY) {
                                Some(raw) => raw.parse().context("counter is not a number")?,
                                None => bail!("counter key disappeared"),
                            };
                            txn.set(COUNTER_KEY, (current + 1).to_string());
                            Ok(())
                        })?;
                    }
                    debug!(worker, rounds, "Worker finished");
                    Ok(())
                })
            })
            .collect();

        for worker in workers {
            match worker.join() {
                Ok(result) => result?,
                Err(_) => bail!("worker thread panicked"),
            }
        }
        Ok(())
    })?;

    let counter: u64 = store
        .get(COUNTER_KEY)
        .context("counter missing after workload")?
        .parse()
        .context("counter is not a number")?;
    let expected = (threads * rounds) as u64;
    ensure!(
        counter == expected,
        "lost update: counter is {}, expected {}",
        counter,
        expected
    );

    let conflicts = attempts.load(Ordering::Relaxed) - expected;
    info!(threads, rounds, counter, conflicts, "Contention workload complete");
    Ok(ContentionReport { counter, conflicts })
}
