//! txindex-storage — the durable SQLite backend for TxIndex.
//!
//! [`SqliteStore`] implements the core `IndexStore` trait over a single
//! SQLite file via `sqlx`: idempotent schema creation, the derived
//! checkpoint query, the all-or-nothing block+transactions write, and the
//! directional address query.

pub mod sqlite;

pub use sqlite::SqliteStore;
