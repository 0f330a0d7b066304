//! The two write-once record types persisted by the index.

use alloy_primitives::U256;

// ─── BlockRecord ─────────────────────────────────────────────────────────────

/// One indexed block, mirroring a row of the `blocks` table.
///
/// Immutable once written; never updated or deleted. `difficulty` and
/// `total_difficulty` exceed 64 bits on mainnet, so both are kept at full
/// 256-bit width and persisted as decimal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRecord {
    /// Block number (primary key).
    pub block_number: u64,
    /// Block difficulty.
    pub difficulty: U256,
    /// Miner-supplied extra data (`0x…`).
    pub extra_data: String,
    /// Gas limit of the block.
    pub gas_limit: u64,
    /// Total gas used by all transactions in the block.
    pub gas_used: u64,
    /// Block hash (`0x…`, lowercase).
    pub hash: String,
    /// Bloom filter for the block's logs (`0x…`).
    pub logs_bloom: String,
    /// Address of the block's miner (`0x…`, lowercase).
    pub miner: String,
    /// Proof-of-work nonce (`0x…`).
    pub nonce: String,
    /// Parent block hash (`0x…`, lowercase).
    pub parent_hash: String,
    /// Receipts trie root. Empty string when absent from source data; this
    /// is the only field with a silent default.
    pub receipt_root: String,
    /// Uncles hash (`sha3Uncles`).
    pub uncles_hash: String,
    /// Block size in bytes.
    pub size: u64,
    /// State trie root.
    pub state_root: String,
    /// Unix timestamp of the block (seconds since epoch).
    pub timestamp: u64,
    /// Cumulative chain difficulty up to and including this block.
    pub total_difficulty: U256,
    /// Transactions trie root.
    pub transactions_root: String,
    /// Wall-clock time this block was ingested (unix seconds).
    pub indexed_at: i64,
}

// ─── TransactionRecord ───────────────────────────────────────────────────────

/// One indexed transaction, mirroring a row of the `transactions` table.
///
/// `gas`, `gas_price`, and `value` are arbitrary-precision up to 256 bits
/// and are persisted losslessly as decimal text, never truncated to a
/// machine word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Transaction hash (`0x…`, lowercase; primary key).
    pub hash: String,
    /// Number of the containing block. The block row is always written in
    /// the same atomic unit.
    pub block_number: u64,
    /// Sender address (`0x…`, lowercase).
    pub from_address: String,
    /// Recipient address; `None` for contract-creation transactions.
    pub to_address: Option<String>,
    /// Gas provided by the sender.
    pub gas: U256,
    /// Gas price in wei.
    pub gas_price: U256,
    /// Call data (`0x…`).
    pub input: String,
    /// Sender account nonce.
    pub nonce: u64,
    /// Position of the transaction within its block.
    pub transaction_index: u32,
    /// Transferred value in wei.
    pub value: U256,
}

impl TransactionRecord {
    /// Returns `true` if this transaction created a contract.
    pub fn is_contract_creation(&self) -> bool {
        self.to_address.is_none()
    }
}
