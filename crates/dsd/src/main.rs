//! Distributed Store driver - exercises the OCC store and the bounded cache

mod scenarios;

use anyhow::{ensure, Result};
use clap::Parser;
use dstore::KeyValueStore;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of items)
    #[arg(short, long, default_value_t = 100)]
    capacity: usize,

    /// Worker threads for the contention workload
    #[arg(short, long, default_value_t = 8)]
    threads: usize,

    /// Increments per worker thread
    #[arg(short, long, default_value_t = 1000)]
    rounds: usize,

    /// Commit attempts per increment before giving up
    #[arg(short, long, default_value_t = 1000)]
    max_attempts: usize,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    ensure!(args.max_attempts > 0, "max-attempts must be greater than 0");

    info!("Starting Distributed Store driver v{}", env!("CARGO_PKG_VERSION"));
    info!("Cache capacity: {}", args.capacity);
    info!("Contention: {} threads x {} rounds", args.threads, args.rounds);

    let store = KeyValueStore::new();
    scenarios::store_rollback(&store)?;
    scenarios::cache_overwrite(args.capacity)?;

    let report = scenarios::contention(&store, args.threads, args.rounds, args.max_attempts)?;
    println!(
        "counter={} conflicts={} version={}",
        report.counter,
        report.conflicts,
        store.current_version()
    );

    Ok(())
}
