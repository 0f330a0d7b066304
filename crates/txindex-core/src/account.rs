//! Account query projection — the read interface consumed by the external
//! account-summary tool.
//!
//! Combines a live balance fetch from the node with the address activity
//! held in the index. The two data sources are joined only here, at
//! response-construction time; the balance is never persisted alongside
//! indexed rows.

use serde::Serialize;

use crate::client::ChainClient;
use crate::error::IndexError;
use crate::store::IndexStore;
use crate::types::TransactionRecord;

/// One transaction entry in an account summary.
///
/// `value` is a decimal string so 256-bit amounts survive any JSON
/// round-trip without precision loss.
#[derive(Debug, Clone, Serialize)]
pub struct TransferEntry {
    /// Transaction hash, 0x-prefixed lowercase hex.
    pub hash: String,
    pub block_number: u64,
    pub from: String,
    /// `null` for contract-creation transactions.
    pub to: Option<String>,
    pub value: String,
    pub input: String,
}

/// The full projection for one address.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    /// Live balance in wei, fetched from the node at query time. Decimal
    /// string, lossless at 256 bits.
    pub current_balance: String,
    pub incoming_transactions: Vec<TransferEntry>,
    pub outgoing_transactions: Vec<TransferEntry>,
}

/// Build the account summary for `address`.
///
/// The queried address is substituted into `to` for incoming entries and
/// into `from` for outgoing entries, matching the direction each query
/// implies.
pub async fn account_summary<C: ChainClient, S: IndexStore>(
    client: &C,
    store: &S,
    address: &str,
) -> Result<AccountSummary, IndexError> {
    let address = address.to_lowercase();

    let current_balance = client.balance(&address).await?;
    let activity = store.query_by_address(&address).await?;

    let incoming = activity
        .incoming
        .iter()
        .map(|tx| entry(tx, tx.from_address.clone(), Some(address.clone())))
        .collect();
    let outgoing = activity
        .outgoing
        .iter()
        .map(|tx| entry(tx, address.clone(), tx.to_address.clone()))
        .collect();

    Ok(AccountSummary {
        current_balance: current_balance.to_string(),
        incoming_transactions: incoming,
        outgoing_transactions: outgoing,
    })
}

fn entry(tx: &TransactionRecord, from: String, to: Option<String>) -> TransferEntry {
    TransferEntry {
        hash: tx.hash.clone(),
        block_number: tx.block_number,
        from,
        to,
        value: tx.value.to_string(),
        input: tx.input.clone(),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use async_trait::async_trait;

    use crate::client::FetchOutcome;
    use crate::store::MemoryStore;
    use crate::testutil::{sample_block, sample_tx};

    struct FixedBalance(U256);

    #[async_trait]
    impl ChainClient for FixedBalance {
        async fn current_height(&self) -> Result<u64, IndexError> {
            Ok(0)
        }
        async fn fetch_block(&self, _height: u64) -> Result<FetchOutcome, IndexError> {
            Ok(FetchOutcome::NotYetProduced)
        }
        async fn balance(&self, _address: &str) -> Result<U256, IndexError> {
            Ok(self.0)
        }
    }

    /// The three-block synthetic chain: block 0 empty, block 1 carries
    /// A→B 100, block 2 carries B→A 50 and A→C 7.
    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.write_block_atomic(&sample_block(0), &[]).await.unwrap();
        store
            .write_block_atomic(
                &sample_block(1),
                &[sample_tx("0xt1", 1, 0, "0xa", Some("0xb"), U256::from(100u64))],
            )
            .await
            .unwrap();
        store
            .write_block_atomic(
                &sample_block(2),
                &[
                    sample_tx("0xt2", 2, 0, "0xb", Some("0xa"), U256::from(50u64)),
                    sample_tx("0xt3", 2, 1, "0xa", Some("0xc"), U256::from(7u64)),
                ],
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn directional_correctness() {
        let store = seeded_store().await;
        let client = FixedBalance(U256::from(1_000u64));

        let summary = account_summary(&client, &store, "0xA").await.unwrap();

        let outgoing: Vec<_> = summary
            .outgoing_transactions
            .iter()
            .map(|e| e.hash.as_str())
            .collect();
        assert_eq!(outgoing, vec!["0xt1", "0xt3"]);

        let incoming: Vec<_> = summary
            .incoming_transactions
            .iter()
            .map(|e| e.hash.as_str())
            .collect();
        assert_eq!(incoming, vec!["0xt2"]);
    }

    #[tokio::test]
    async fn queried_address_is_substituted_by_direction() {
        let store = seeded_store().await;
        let client = FixedBalance(U256::ZERO);

        let summary = account_summary(&client, &store, "0xA").await.unwrap();

        for e in &summary.incoming_transactions {
            assert_eq!(e.to.as_deref(), Some("0xa"));
        }
        for e in &summary.outgoing_transactions {
            assert_eq!(e.from, "0xa");
        }
        // The counterparty side comes from the stored row
        assert_eq!(summary.outgoing_transactions[0].to.as_deref(), Some("0xb"));
        assert_eq!(summary.incoming_transactions[0].from, "0xb");
    }

    #[tokio::test]
    async fn balance_is_live_and_lossless() {
        let store = seeded_store().await;
        let big = U256::from(1u8) << 200;
        let client = FixedBalance(big);

        let summary = account_summary(&client, &store, "0xa").await.unwrap();
        assert_eq!(summary.current_balance, big.to_string());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["current_balance"], big.to_string());
    }

    #[tokio::test]
    async fn summary_serializes_with_null_recipient() {
        let store = MemoryStore::new();
        store
            .write_block_atomic(
                &sample_block(0),
                &[sample_tx("0xcc", 0, 0, "0xa", None, U256::ZERO)],
            )
            .await
            .unwrap();

        let summary = account_summary(&FixedBalance(U256::ZERO), &store, "0xa")
            .await
            .unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["outgoing_transactions"][0]["to"].is_null());
    }
}
