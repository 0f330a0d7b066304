//! Shared fixtures for the crate's tests.

use alloy_primitives::U256;

use crate::raw::{RawBlock, RawTransaction};
use crate::types::{BlockRecord, TransactionRecord};

/// A decodable wire transaction with sane defaults.
pub(crate) fn raw_tx(hash: &str, from: &str, to: Option<&str>, value: U256) -> RawTransaction {
    RawTransaction {
        hash: Some(hash.into()),
        from: Some(from.into()),
        to: to.map(Into::into),
        gas: Some("0x5208".into()),
        gas_price: Some("0x3b9aca00".into()),
        input: Some("0x".into()),
        nonce: Some("0x0".into()),
        transaction_index: Some("0x0".into()),
        value: Some(format!("0x{value:x}")),
    }
}

/// A fully populated, decodable wire block at `number`.
pub(crate) fn raw_block(number: u64, transactions: Vec<RawTransaction>) -> RawBlock {
    RawBlock {
        number: Some(format!("0x{number:x}")),
        difficulty: Some("0x2d0".into()),
        extra_data: Some("0x".into()),
        gas_limit: Some("0x1c9c380".into()),
        gas_used: Some("0x5208".into()),
        hash: Some(format!("0x{number:064x}")),
        logs_bloom: Some("0x0".into()),
        miner: Some("0xmineraddress".into()),
        nonce: Some("0x0000000000000042".into()),
        parent_hash: Some(format!("0x{:064x}", number.wrapping_sub(1))),
        receipts_root: Some("0xreceipts".into()),
        sha3_uncles: Some("0xuncles".into()),
        size: Some("0x220".into()),
        state_root: Some("0xstate".into()),
        timestamp: Some(format!("0x{:x}", 1_600_000_000u64 + number * 13)),
        total_difficulty: Some("0x400000".into()),
        transactions_root: Some("0xtxroot".into()),
        transactions,
    }
}

/// A block record as the decoder would produce for an empty block.
pub(crate) fn sample_block(number: u64) -> BlockRecord {
    BlockRecord {
        block_number: number,
        difficulty: U256::from(1_000u64),
        extra_data: "0x".into(),
        gas_limit: 30_000_000,
        gas_used: 21_000,
        hash: format!("0x{number:064x}"),
        logs_bloom: "0x0".into(),
        miner: "0xminer".into(),
        nonce: "0x0000000000000042".into(),
        parent_hash: format!("0x{:064x}", number.wrapping_sub(1)),
        receipt_root: String::new(),
        uncles_hash: "0xuncles".into(),
        size: 544,
        state_root: "0xstate".into(),
        timestamp: 1_600_000_000 + number * 13,
        total_difficulty: U256::from(4_000_000u64),
        transactions_root: "0xtxroot".into(),
        indexed_at: 1_700_000_000,
    }
}

/// A transaction record with the given identity fields.
pub(crate) fn sample_tx(
    hash: &str,
    block: u64,
    index: u32,
    from: &str,
    to: Option<&str>,
    value: U256,
) -> TransactionRecord {
    TransactionRecord {
        hash: hash.into(),
        block_number: block,
        from_address: from.into(),
        to_address: to.map(Into::into),
        gas: U256::from(21_000u64),
        gas_price: U256::from(1_000_000_000u64),
        input: "0x".into(),
        nonce: 0,
        transaction_index: index,
        value,
    }
}
