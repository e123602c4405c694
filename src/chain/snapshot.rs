// Snapshot - Wire shapes for a node's blockchain

use crate::model::ContractRecord;
use serde::{Deserialize, Serialize};

/// An append-only batch of contracts recorded by mining.
///
/// Everything except `transactions` is opaque to this client; the fields
/// are kept so snapshots round-trip the node's wire format unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    /// Server-side creation time, seconds with sub-second fraction
    pub timestamp: f64,
    pub transactions: Vec<ContractRecord>,
    pub proof: u64,
    pub previous_hash: String,
}

/// The full chain as returned by `GET /chain`, oldest block first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    #[serde(default)]
    pub length: usize,
}

impl ChainSnapshot {
    /// Total number of contract transactions across all blocks
    pub fn transaction_count(&self) -> usize {
        self.chain.iter().map(|block| block.transactions.len()).sum()
    }
}
