//! HTTP JSON-RPC node client backed by `reqwest`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy_primitives::U256;
use async_trait::async_trait;
use serde_json::{json, Value};

use txindex_core::client::{ChainClient, FetchOutcome};
use txindex_core::error::IndexError;
use txindex_core::raw::{hex_to_u256, hex_to_u64, RawBlock};

use crate::request::{JsonRpcRequest, JsonRpcResponse};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A `ChainClient` over HTTP JSON-RPC.
///
/// Constructed once and passed into the engine; there is no ambient or
/// global connection state. Every request shares one bounded timeout, and
/// expiry is reported as `NodeUnavailable` like any other transport
/// failure.
pub struct HttpNodeClient {
    url: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl HttpNodeClient {
    /// Create a client for the given JSON-RPC endpoint URL.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build reqwest client");

        Self {
            url: url.into(),
            http,
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a client with the default 30s request timeout.
    pub fn default_for(url: impl Into<String>) -> Self {
        Self::new(url, DEFAULT_TIMEOUT)
    }

    /// The endpoint this client talks to.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, IndexError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = JsonRpcRequest::new(id, method, params);

        tracing::debug!(method, id, url = %self.url, "sending JSON-RPC request");

        let resp = self
            .http
            .post(&self.url)
            .json(&req)
            .send()
            .await
            .map_err(transport_error)?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(IndexError::NodeUnavailable(format!("HTTP {status}: {body}")));
        }

        let resp: JsonRpcResponse = resp.json().await.map_err(transport_error)?;
        resp.into_result()
            .map_err(|e| IndexError::NodeUnavailable(e.to_string()))
    }
}

#[async_trait]
impl ChainClient for HttpNodeClient {
    async fn current_height(&self) -> Result<u64, IndexError> {
        let v = self.call("eth_blockNumber", vec![]).await?;
        quantity_u64("eth_blockNumber", &v)
    }

    async fn fetch_block(&self, height: u64) -> Result<FetchOutcome, IndexError> {
        let params = vec![json!(format!("0x{height:x}")), json!(true)];
        let v = self.call("eth_getBlockByNumber", params).await?;
        block_outcome(height, v)
    }

    async fn balance(&self, address: &str) -> Result<U256, IndexError> {
        let v = self
            .call("eth_getBalance", vec![json!(address), json!("latest")])
            .await?;
        let s = v.as_str().ok_or_else(|| {
            IndexError::NodeUnavailable(format!("unexpected eth_getBalance result: {v}"))
        })?;
        hex_to_u256(s).ok_or_else(|| {
            IndexError::NodeUnavailable(format!("malformed eth_getBalance result: {s}"))
        })
    }
}

fn transport_error(e: reqwest::Error) -> IndexError {
    if e.is_timeout() {
        IndexError::NodeUnavailable(format!("request timed out: {e}"))
    } else {
        IndexError::NodeUnavailable(e.to_string())
    }
}

fn quantity_u64(method: &str, v: &Value) -> Result<u64, IndexError> {
    let s = v
        .as_str()
        .ok_or_else(|| IndexError::NodeUnavailable(format!("unexpected {method} result: {v}")))?;
    hex_to_u64(s)
        .ok_or_else(|| IndexError::NodeUnavailable(format!("malformed {method} result: {s}")))
}

/// Classify an `eth_getBlockByNumber` result: `null` means the chain has
/// not produced the height yet.
fn block_outcome(height: u64, v: Value) -> Result<FetchOutcome, IndexError> {
    if v.is_null() {
        return Ok(FetchOutcome::NotYetProduced);
    }
    let raw: RawBlock = serde_json::from_value(v).map_err(|e| IndexError::Decode {
        height,
        field: "block".into(),
        reason: e.to_string(),
    })?;
    Ok(FetchOutcome::Produced(raw))
}
