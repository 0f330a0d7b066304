//! txindex-core — records, traits, and the catch-up engine for TxIndex.
//!
//! # Architecture
//!
//! ```text
//! IndexEngine (one-shot catch-up loop)
//!     ├── ChainClient  (node reads: current height, block + transactions, balance)
//!     ├── IndexStore   (durable writes: blocks + transactions, checkpoint query)
//!     └── raw decoding (JSON-RPC block payload → Block/Transaction records)
//! ```
//!
//! The engine itself is stateless across restarts: the checkpoint is derived
//! from the store (highest fully committed block number), so re-invoking a
//! failed run resumes exactly where the previous one stopped.

pub mod account;
pub mod client;
pub mod engine;
pub mod error;
pub mod raw;
pub mod store;
#[cfg(test)]
pub(crate) mod testutil;
pub mod types;

pub use account::{account_summary, AccountSummary, TransferEntry};
pub use client::{ChainClient, FetchOutcome};
pub use engine::{CatchUpReport, IndexEngine};
pub use error::IndexError;
pub use raw::{RawBlock, RawTransaction};
pub use store::{AddressActivity, IndexStore, MemoryStore};
pub use types::{BlockRecord, TransactionRecord};
