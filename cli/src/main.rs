//! txindex CLI — initialize and run the transaction index.
//!
//! Usage:
//! ```bash
//! # Create the schema (idempotent)
//! txindex --rpc http://localhost:8545 --init index.db
//!
//! # Run one catch-up pass to the chain tip
//! txindex --rpc http://localhost:8545 index.db
//!
//! # Index at most 1000 blocks past the checkpoint
//! txindex --rpc http://localhost:8545 --blocks 1000 index.db
//! ```

use std::process;
use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use txindex_core::{IndexEngine, IndexStore};
use txindex_rpc::HttpNodeClient;
use txindex_storage::SqliteStore;

#[derive(Parser)]
#[command(
    name = "txindex",
    about = "Index Ethereum blocks and transactions into a local SQLite store",
    version
)]
struct Cli {
    /// JSON-RPC endpoint of the node to index from
    #[arg(long)]
    rpc: String,

    /// Initialize the database schema and exit (idempotent)
    #[arg(long)]
    init: bool,

    /// Index at most this many blocks past the current checkpoint
    #[arg(long)]
    blocks: Option<u64>,

    /// Per-request timeout against the node, in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Path to the SQLite database holding the index
    index_db: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store = SqliteStore::open(&cli.index_db)
        .await
        .with_context(|| format!("opening index database {}", cli.index_db))?;

    // Whatever happens below, the pool is closed before we return, so
    // heights committed before a failure stay durable.
    let result = run_with_store(&cli, &store).await;
    store.close().await;
    result
}

async fn run_with_store(cli: &Cli, store: &SqliteStore) -> Result<()> {
    store.ensure_schema().await?;

    if cli.init {
        println!("Schema ready at {}", cli.index_db);
        return Ok(());
    }

    let client = HttpNodeClient::new(&cli.rpc, Duration::from_secs(cli.timeout));
    let engine = IndexEngine::new(client, store.clone());

    // Ctrl-C requests a cooperative stop; the engine finishes the in-flight
    // block and ends the pass cleanly.
    let stop = engine.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; stopping after current block");
            stop.store(true, Ordering::Relaxed);
        }
    });

    let report = engine.run_catch_up(cli.blocks).await?;

    match report.checkpoint {
        Some(height) => println!(
            "Checkpoint at block {height} ({} block(s) indexed this pass)",
            report.blocks_indexed
        ),
        None => println!("Nothing to index yet; store is empty"),
    }
    Ok(())
}
