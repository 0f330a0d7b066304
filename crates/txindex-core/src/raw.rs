//! Wire-format block payloads and their decoding into records.
//!
//! `RawBlock`/`RawTransaction` mirror the camelCase JSON returned by
//! `eth_getBlockByNumber(height, true)`. Every field arrives as an optional
//! hex string; [`RawBlock::into_records`] is the mapping step of the catch-up
//! loop and fails with [`IndexError::Decode`] on any missing or malformed
//! required field. The single exception is the receipts root, which defaults
//! to an empty string when absent.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::IndexError;
use crate::types::{BlockRecord, TransactionRecord};

/// A raw block as returned by `eth_getBlockByNumber` with full transactions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBlock {
    pub number: Option<String>,
    pub difficulty: Option<String>,
    #[serde(rename = "extraData")]
    pub extra_data: Option<String>,
    #[serde(rename = "gasLimit")]
    pub gas_limit: Option<String>,
    #[serde(rename = "gasUsed")]
    pub gas_used: Option<String>,
    pub hash: Option<String>,
    #[serde(rename = "logsBloom")]
    pub logs_bloom: Option<String>,
    pub miner: Option<String>,
    pub nonce: Option<String>,
    #[serde(rename = "parentHash")]
    pub parent_hash: Option<String>,
    /// Geth spells this `receiptsRoot`; older tooling used `receiptRoot`.
    #[serde(rename = "receiptsRoot", alias = "receiptRoot")]
    pub receipts_root: Option<String>,
    #[serde(rename = "sha3Uncles")]
    pub sha3_uncles: Option<String>,
    pub size: Option<String>,
    #[serde(rename = "stateRoot")]
    pub state_root: Option<String>,
    pub timestamp: Option<String>,
    #[serde(rename = "totalDifficulty")]
    pub total_difficulty: Option<String>,
    #[serde(rename = "transactionsRoot")]
    pub transactions_root: Option<String>,
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
}

/// A raw transaction embedded in a `RawBlock`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTransaction {
    pub hash: Option<String>,
    pub from: Option<String>,
    /// `null` for contract-creation transactions.
    pub to: Option<String>,
    pub gas: Option<String>,
    #[serde(rename = "gasPrice")]
    pub gas_price: Option<String>,
    pub input: Option<String>,
    pub nonce: Option<String>,
    #[serde(rename = "transactionIndex")]
    pub transaction_index: Option<String>,
    pub value: Option<String>,
}

impl RawBlock {
    /// Decode this payload into a block record plus its transaction records.
    ///
    /// `height` is the height the caller requested; the payload's own number
    /// must match it. `indexed_at` is the ingestion timestamp stamped onto
    /// the block row.
    pub fn into_records(
        self,
        height: u64,
        indexed_at: i64,
    ) -> Result<(BlockRecord, Vec<TransactionRecord>), IndexError> {
        let number = quantity_u64(height, "number", self.number)?;
        if number != height {
            return Err(IndexError::Decode {
                height,
                field: "number".into(),
                reason: format!("node returned block {number} for height {height}"),
            });
        }

        let mut transactions = Vec::with_capacity(self.transactions.len());
        for raw in self.transactions {
            transactions.push(raw.into_record(height)?);
        }

        let block = BlockRecord {
            block_number: number,
            difficulty: quantity_u256(height, "difficulty", self.difficulty)?,
            extra_data: require(height, "extraData", self.extra_data)?,
            gas_limit: quantity_u64(height, "gasLimit", self.gas_limit)?,
            gas_used: quantity_u64(height, "gasUsed", self.gas_used)?,
            hash: require(height, "hash", self.hash)?.to_lowercase(),
            logs_bloom: require(height, "logsBloom", self.logs_bloom)?,
            miner: require(height, "miner", self.miner)?.to_lowercase(),
            nonce: require(height, "nonce", self.nonce)?,
            parent_hash: require(height, "parentHash", self.parent_hash)?.to_lowercase(),
            // The one sanctioned leniency: absent receipts root becomes "".
            receipt_root: self.receipts_root.unwrap_or_default(),
            uncles_hash: require(height, "sha3Uncles", self.sha3_uncles)?,
            size: quantity_u64(height, "size", self.size)?,
            state_root: require(height, "stateRoot", self.state_root)?,
            timestamp: quantity_u64(height, "timestamp", self.timestamp)?,
            total_difficulty: quantity_u256(height, "totalDifficulty", self.total_difficulty)?,
            transactions_root: require(height, "transactionsRoot", self.transactions_root)?,
            indexed_at,
        };

        Ok((block, transactions))
    }
}

impl RawTransaction {
    fn into_record(self, height: u64) -> Result<TransactionRecord, IndexError> {
        Ok(TransactionRecord {
            hash: require(height, "transaction hash", self.hash)?.to_lowercase(),
            block_number: height,
            from_address: require(height, "from", self.from)?.to_lowercase(),
            to_address: self.to.map(|t| t.to_lowercase()),
            gas: quantity_u256(height, "gas", self.gas)?,
            gas_price: quantity_u256(height, "gasPrice", self.gas_price)?,
            input: require(height, "input", self.input)?,
            nonce: quantity_u64(height, "nonce", self.nonce)?,
            transaction_index: quantity_u64(height, "transactionIndex", self.transaction_index)?
                as u32,
            value: quantity_u256(height, "value", self.value)?,
        })
    }
}

// ─── Hex quantity parsing ────────────────────────────────────────────────────

/// Parse a hex-encoded quantity (with or without `0x`) to u64.
pub fn hex_to_u64(s: &str) -> Option<u64> {
    u64::from_str_radix(s.strip_prefix("0x").unwrap_or(s), 16).ok()
}

/// Parse a hex-encoded quantity (with or without `0x`) to a 256-bit integer.
pub fn hex_to_u256(s: &str) -> Option<U256> {
    U256::from_str_radix(s.strip_prefix("0x").unwrap_or(s), 16).ok()
}

fn require(height: u64, field: &str, value: Option<String>) -> Result<String, IndexError> {
    value.ok_or_else(|| IndexError::Decode {
        height,
        field: field.into(),
        reason: "missing required field".into(),
    })
}

fn quantity_u64(height: u64, field: &str, value: Option<String>) -> Result<u64, IndexError> {
    let s = require(height, field, value)?;
    hex_to_u64(&s).ok_or_else(|| IndexError::Decode {
        height,
        field: field.into(),
        reason: format!("malformed quantity `{s}`"),
    })
}

fn quantity_u256(height: u64, field: &str, value: Option<String>) -> Result<U256, IndexError> {
    let s = require(height, field, value)?;
    hex_to_u256(&s).ok_or_else(|| IndexError::Decode {
        height,
        field: field.into(),
        reason: format!("malformed quantity `{s}`"),
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
