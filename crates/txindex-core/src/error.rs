//! Error types for the indexing pipeline.

use thiserror::Error;

/// Errors that can occur while indexing.
///
/// "Block not yet produced" is deliberately NOT an error — see
/// [`crate::client::FetchOutcome`]. The catch-up loop ends cleanly on it.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Transport failure reaching the node: connection refused, timeout,
    /// HTTP failure, or an unusable JSON-RPC response. Fatal to the run;
    /// the operator retries by re-invoking it.
    #[error("node unavailable: {0}")]
    NodeUnavailable(String),

    /// Primary-key collision during an atomic write. The store already holds
    /// a row for this height (or one of its transaction hashes), which means
    /// checkpoint corruption or a concurrent writer.
    #[error("duplicate block {height}: already present in the index")]
    DuplicateBlock { height: u64 },

    /// Any other persistence fault during an atomic write. The whole unit
    /// was rolled back; the store is exactly as it was before the call.
    #[error("atomic write failed at block {height}: {reason}")]
    WriteFailed { height: u64, reason: String },

    /// A required field was missing or malformed in fetched chain data.
    /// Nothing was committed for the offending block.
    #[error("failed to decode block {height}: field `{field}`: {reason}")]
    Decode {
        height: u64,
        field: String,
        reason: String,
    },

    /// A read-side store fault (checkpoint query, address query, schema
    /// creation).
    #[error("storage error: {0}")]
    Storage(String),
}

impl IndexError {
    /// The block height this error occurred at, where one applies.
    pub fn height(&self) -> Option<u64> {
        match self {
            Self::DuplicateBlock { height }
            | Self::WriteFailed { height, .. }
            | Self::Decode { height, .. } => Some(*height),
            _ => None,
        }
    }
}
