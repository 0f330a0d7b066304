//! txindex-rpc — the HTTP JSON-RPC chain client for TxIndex.
//!
//! [`HttpNodeClient`] implements the core `ChainClient` trait over
//! `eth_blockNumber`, `eth_getBlockByNumber`, and `eth_getBalance`. Each
//! call is a single request with a bounded timeout; transport failures of
//! any kind surface as `IndexError::NodeUnavailable`, and a `null` block
//! result becomes `FetchOutcome::NotYetProduced`. There is no automatic
//! retry; re-invoking the catch-up run is the only retry.

pub mod client;
pub mod request;

pub use client::HttpNodeClient;
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
