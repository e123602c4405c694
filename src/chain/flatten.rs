// Flatten - Pure reduction of a chain snapshot to the contract feed
//
// Conflict resolution can replace a node's chain wholesale, so the feed is
// recomputed from scratch on every fetch; there is no incremental diffing.

use crate::chain::Block;
use crate::model::ContractRecord;

/// Iterate blocks newest first (the server returns oldest first)
pub fn newest_first(chain: &[Block]) -> impl Iterator<Item = &Block> {
    chain.iter().rev()
}

/// Flatten a chain into a reverse-chronological contract feed.
///
/// Blocks are visited newest first; within each block the server's
/// transaction order is preserved. The result length always equals the
/// sum of transaction counts over all blocks.
pub fn flatten(chain: &[Block]) -> Vec<ContractRecord> {
    newest_first(chain)
        .flat_map(|block| block.transactions.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record(tag: u128) -> ContractRecord {
        ContractRecord {
            uuid: Uuid::from_u128(tag),
            from_address: "A".to_string(),
            to_address: "B".to_string(),
            cost: 100,
            timestamp: 1_700_000_000,
            is_done: false,
        }
    }

    fn block(index: u64, transactions: Vec<ContractRecord>) -> Block {
        Block {
            index,
            timestamp: 1_700_000_000.0,
            transactions,
            proof: 100,
            previous_hash: "1".to_string(),
        }
    }

    #[test]
    fn test_flatten_empty_chain() {
        assert!(flatten(&[]).is_empty());
    }

    #[test]
    fn test_flatten_reverses_blocks_keeps_inblock_order() {
        let c1 = record(1);
        let c2 = record(2);
        let c3 = record(3);
        let chain = vec![
            block(1, vec![c1.clone()]),
            block(2, vec![c2.clone(), c3.clone()]),
        ];

        assert_eq!(flatten(&chain), vec![c2, c3, c1]);
    }

    #[test]
    fn test_flatten_length_matches_transaction_count() {
        let chain = vec![
            block(1, vec![]),
            block(2, vec![record(1), record(2)]),
            block(3, vec![record(3)]),
        ];

        let total: usize = chain.iter().map(|b| b.transactions.len()).sum();
        assert_eq!(flatten(&chain).len(), total);
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let chain = vec![block(1, vec![record(1)]), block(2, vec![record(2)])];

        assert_eq!(flatten(&chain), flatten(&chain));
    }
}
