//! The `ChainClient` trait — the engine's read-only view of a remote node.

use alloy_primitives::U256;
use async_trait::async_trait;

use crate::error::IndexError;
use crate::raw::RawBlock;

/// Outcome of fetching a block by height.
///
/// A height beyond the chain's current tip is a normal condition during
/// catch-up at the frontier, not a failure, so it gets its own variant
/// instead of riding on the error type. The loop's termination condition
/// keys off this variant.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The block exists; here is its payload with full transactions.
    Produced(RawBlock),
    /// The chain has not produced this height yet.
    NotYetProduced,
}

/// Read-only access to a remote node.
///
/// Implementations must be `Send + Sync`; the engine holds the client for
/// the duration of a run. Every call performs a network round-trip and may
/// block up to the transport's configured timeout, after which it fails
/// with [`IndexError::NodeUnavailable`]. No call is retried internally;
/// retry is achieved by re-invoking the whole catch-up run.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The node's latest known block height.
    async fn current_height(&self) -> Result<u64, IndexError>;

    /// Fetch one block and its full transaction list.
    async fn fetch_block(&self, height: u64) -> Result<FetchOutcome, IndexError>;

    /// Current balance of an account, in wei. Always read live from the
    /// node, never from the index.
    async fn balance(&self, address: &str) -> Result<U256, IndexError>;
}
