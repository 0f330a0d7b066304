//! SQLite index store.
//!
//! Persists blocks and transactions to a single SQLite file. Uses `sqlx`
//! with WAL mode and enforced foreign keys. 256-bit quantities (difficulty,
//! total_difficulty, gas, gas_price, value) are stored as decimal TEXT so
//! they round-trip without precision loss.
//!
//! # Usage
//! ```rust,no_run
//! use txindex_storage::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // File-backed (persistent)
//! let store = SqliteStore::open("./index.db").await?;
//!
//! // In-memory (tests / ephemeral)
//! let store = SqliteStore::in_memory().await?;
//! # Ok(())
//! # }
//! ```

use std::str::FromStr;

use alloy_primitives::U256;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use txindex_core::error::IndexError;
use txindex_core::store::{AddressActivity, IndexStore};
use txindex_core::types::{BlockRecord, TransactionRecord};

/// SQLite-backed index store.
///
/// Cloning is cheap and shares the underlying pool. Exactly one indexing
/// engine must write through a given database at a time; that discipline is
/// enforced by the caller, not here.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) a SQLite database at `path`.
    ///
    /// The path may be a plain file path (`"./index.db"`) or a full SQLite
    /// URL (`"sqlite:./index.db"`). The schema is not created here; call
    /// [`IndexStore::ensure_schema`] on startup.
    pub async fn open(path: &str) -> Result<Self, IndexError> {
        let url = if path.starts_with("sqlite:") {
            path.to_string()
        } else {
            format!("sqlite:{path}")
        };

        let opts = SqliteConnectOptions::from_str(&url)
            .map_err(storage_error)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .connect_with(opts)
            .await
            .map_err(storage_error)?;

        Ok(Self { pool })
    }

    /// Open an in-memory SQLite database.
    ///
    /// All data is lost when the pool is dropped. Ideal for tests. The pool
    /// is pinned to a single connection; each fresh connection to
    /// `:memory:` would otherwise see its own empty database.
    pub async fn in_memory() -> Result<Self, IndexError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(storage_error)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(storage_error)?;

        Ok(Self { pool })
    }

    /// Flush and close the pool. Called on every exit path of the CLI so
    /// committed heights remain durable even when the run failed.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl IndexStore for SqliteStore {
    async fn ensure_schema(&self) -> Result<(), IndexError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS blocks (
                block_number      INTEGER PRIMARY KEY,
                difficulty        TEXT    NOT NULL,
                extra_data        TEXT    NOT NULL,
                gas_limit         INTEGER NOT NULL,
                gas_used          INTEGER NOT NULL,
                hash              TEXT    NOT NULL,
                logs_bloom        TEXT    NOT NULL,
                miner             TEXT    NOT NULL,
                nonce             TEXT    NOT NULL,
                parent_hash       TEXT    NOT NULL,
                receipt_root      TEXT    NOT NULL DEFAULT '',
                uncles_hash       TEXT    NOT NULL,
                size              INTEGER NOT NULL,
                state_root        TEXT    NOT NULL,
                timestamp         INTEGER NOT NULL,
                total_difficulty  TEXT    NOT NULL,
                transactions_root TEXT    NOT NULL,
                indexed_at        INTEGER NOT NULL
            );",
        )
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS transactions (
                hash              TEXT    PRIMARY KEY,
                block_number      INTEGER NOT NULL REFERENCES blocks (block_number),
                from_address      TEXT    NOT NULL,
                to_address        TEXT,
                gas               TEXT    NOT NULL,
                gas_price         TEXT    NOT NULL,
                input             TEXT    NOT NULL,
                nonce             INTEGER NOT NULL,
                transaction_index INTEGER NOT NULL,
                value             TEXT    NOT NULL
            );",
        )
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        // Indexes for the directional address queries
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_transactions_to ON transactions (to_address);",
        )
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_transactions_from ON transactions (from_address);",
        )
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    async fn last_indexed_height(&self) -> Result<Option<u64>, IndexError> {
        let row = sqlx::query("SELECT MAX(block_number) AS height FROM blocks")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;

        let height: Option<i64> = row.get("height");
        Ok(height.map(|h| h as u64))
    }

    async fn write_block_atomic(
        &self,
        block: &BlockRecord,
        transactions: &[TransactionRecord],
    ) -> Result<(), IndexError> {
        let height = block.block_number;

        let mut db = self
            .pool
            .begin()
            .await
            .map_err(|e| write_error(height, e))?;

        sqlx::query(
            "INSERT INTO blocks (
                block_number, difficulty, extra_data, gas_limit, gas_used,
                hash, logs_bloom, miner, nonce, parent_hash, receipt_root,
                uncles_hash, size, state_root, timestamp, total_difficulty,
                transactions_root, indexed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(height as i64)
        .bind(block.difficulty.to_string())
        .bind(&block.extra_data)
        .bind(block.gas_limit as i64)
        .bind(block.gas_used as i64)
        .bind(&block.hash)
        .bind(&block.logs_bloom)
        .bind(&block.miner)
        .bind(&block.nonce)
        .bind(&block.parent_hash)
        .bind(&block.receipt_root)
        .bind(&block.uncles_hash)
        .bind(block.size as i64)
        .bind(&block.state_root)
        .bind(block.timestamp as i64)
        .bind(block.total_difficulty.to_string())
        .bind(&block.transactions_root)
        .bind(block.indexed_at)
        .execute(&mut *db)
        .await
        .map_err(|e| write_error(height, e))?;

        for tx in transactions {
            sqlx::query(
                "INSERT INTO transactions (
                    hash, block_number, from_address, to_address, gas,
                    gas_price, input, nonce, transaction_index, value
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&tx.hash)
            .bind(tx.block_number as i64)
            .bind(&tx.from_address)
            .bind(tx.to_address.as_deref())
            .bind(tx.gas.to_string())
            .bind(tx.gas_price.to_string())
            .bind(&tx.input)
            .bind(tx.nonce as i64)
            .bind(tx.transaction_index as i64)
            .bind(tx.value.to_string())
            .execute(&mut *db)
            .await
            .map_err(|e| write_error(height, e))?;
        }

        // Anything short of this commit rolls back when `db` drops
        db.commit().await.map_err(|e| write_error(height, e))?;

        debug!(height, transactions = transactions.len(), "block committed");
        Ok(())
    }

    async fn query_by_address(&self, address: &str) -> Result<AddressActivity, IndexError> {
        let address = address.to_lowercase();

        let incoming = sqlx::query(TX_SELECT_INCOMING)
            .bind(&address)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?
            .iter()
            .map(tx_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let outgoing = sqlx::query(TX_SELECT_OUTGOING)
            .bind(&address)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?
            .iter()
            .map(tx_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AddressActivity { incoming, outgoing })
    }
}

const TX_SELECT_INCOMING: &str = "SELECT hash, block_number, from_address, to_address, gas, \
     gas_price, input, nonce, transaction_index, value \
     FROM transactions WHERE to_address = ? \
     ORDER BY block_number, transaction_index";

const TX_SELECT_OUTGOING: &str = "SELECT hash, block_number, from_address, to_address, gas, \
     gas_price, input, nonce, transaction_index, value \
     FROM transactions WHERE from_address = ? \
     ORDER BY block_number, transaction_index";

fn tx_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<TransactionRecord, IndexError> {
    Ok(TransactionRecord {
        hash: row.get("hash"),
        block_number: row.get::<i64, _>("block_number") as u64,
        from_address: row.get("from_address"),
        to_address: row.get("to_address"),
        gas: decimal_u256(row.get("gas"))?,
        gas_price: decimal_u256(row.get("gas_price"))?,
        input: row.get("input"),
        nonce: row.get::<i64, _>("nonce") as u64,
        transaction_index: row.get::<i64, _>("transaction_index") as u32,
        value: decimal_u256(row.get("value"))?,
    })
}

fn decimal_u256(s: String) -> Result<U256, IndexError> {
    U256::from_str_radix(&s, 10)
        .map_err(|e| IndexError::Storage(format!("corrupt decimal value `{s}`: {e}")))
}

fn storage_error(e: impl std::fmt::Display) -> IndexError {
    IndexError::Storage(e.to_string())
}

/// Classify a failure inside the atomic write: a unique violation means the
/// block (or one of its transaction hashes) is already indexed.
fn write_error(height: u64, e: sqlx::Error) -> IndexError {
    let unique = e
        .as_database_error()
        .is_some_and(|db| matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation));
    if unique {
        IndexError::DuplicateBlock { height }
    } else {
        IndexError::WriteFailed {
            height,
            reason: e.to_string(),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
