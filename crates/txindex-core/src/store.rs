//! The `IndexStore` trait and an in-memory implementation for tests.
//!
//! The durable SQLite implementation lives in `txindex-storage`;
//! `MemoryStore` here mirrors its semantics (duplicate detection,
//! all-or-nothing writes) so the engine can be exercised without a
//! database.

use async_trait::async_trait;

use crate::error::IndexError;
use crate::types::{BlockRecord, TransactionRecord};

/// Transactions touching one address, split by direction.
#[derive(Debug, Clone, Default)]
pub struct AddressActivity {
    /// Rows where the address is the recipient.
    pub incoming: Vec<TransactionRecord>,
    /// Rows where the address is the sender.
    pub outgoing: Vec<TransactionRecord>,
}

/// Durable storage for the index.
///
/// The checkpoint is not stored separately: it is defined as the maximum
/// block number present in the store, so it can never disagree with the
/// data. Exactly one writer must run against a given store at a time; the
/// store provides no inter-process lock.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Idempotently create the schema. Safe to call on every startup.
    async fn ensure_schema(&self) -> Result<(), IndexError>;

    /// The current checkpoint: the highest fully committed block number,
    /// or `None` when the store is empty.
    async fn last_indexed_height(&self) -> Result<Option<u64>, IndexError>;

    /// Insert one block row and all of its transaction rows as a single
    /// all-or-nothing unit. On any row-level failure the entire unit is
    /// rolled back and the store is exactly as it was before the call.
    async fn write_block_atomic(
        &self,
        block: &BlockRecord,
        transactions: &[TransactionRecord],
    ) -> Result<(), IndexError>;

    /// All transactions where `address` is the recipient or the sender.
    /// Read-only; consumed by the account query projection.
    async fn query_by_address(&self, address: &str) -> Result<AddressActivity, IndexError>;
}

// ─── In-memory store (for testing) ───────────────────────────────────────────

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MemoryInner {
    blocks: BTreeMap<u64, BlockRecord>,
    transactions: Vec<TransactionRecord>,
}

/// In-memory index store for tests and ephemeral runs.
///
/// Clones share the same underlying data, so a test can keep a handle for
/// inspection while the engine owns another.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blocks currently held.
    pub fn block_count(&self) -> usize {
        self.inner.lock().unwrap().blocks.len()
    }

    /// Number of transactions currently held.
    pub fn transaction_count(&self) -> usize {
        self.inner.lock().unwrap().transactions.len()
    }

    /// Look up a stored block by number.
    pub fn block(&self, number: u64) -> Option<BlockRecord> {
        self.inner.lock().unwrap().blocks.get(&number).cloned()
    }

    /// Look up a stored transaction by hash.
    pub fn transaction(&self, hash: &str) -> Option<TransactionRecord> {
        self.inner
            .lock()
            .unwrap()
            .transactions
            .iter()
            .find(|t| t.hash == hash)
            .cloned()
    }
}

#[async_trait]
impl IndexStore for MemoryStore {
    async fn ensure_schema(&self) -> Result<(), IndexError> {
        Ok(())
    }

    async fn last_indexed_height(&self) -> Result<Option<u64>, IndexError> {
        Ok(self.inner.lock().unwrap().blocks.keys().next_back().copied())
    }

    async fn write_block_atomic(
        &self,
        block: &BlockRecord,
        transactions: &[TransactionRecord],
    ) -> Result<(), IndexError> {
        let mut inner = self.inner.lock().unwrap();
        let height = block.block_number;

        // All uniqueness checks happen before any insert, so a failure
        // leaves the store untouched.
        if inner.blocks.contains_key(&height) {
            return Err(IndexError::DuplicateBlock { height });
        }
        for tx in transactions {
            if inner.transactions.iter().any(|t| t.hash == tx.hash) {
                return Err(IndexError::DuplicateBlock { height });
            }
        }

        inner.blocks.insert(height, block.clone());
        inner.transactions.extend_from_slice(transactions);
        Ok(())
    }

    async fn query_by_address(&self, address: &str) -> Result<AddressActivity, IndexError> {
        let address = address.to_lowercase();
        let inner = self.inner.lock().unwrap();
        Ok(AddressActivity {
            incoming: inner
                .transactions
                .iter()
                .filter(|t| t.to_address.as_deref() == Some(address.as_str()))
                .cloned()
                .collect(),
            outgoing: inner
                .transactions
                .iter()
                .filter(|t| t.from_address == address)
                .cloned()
                .collect(),
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
