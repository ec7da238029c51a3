use crate::L2Transaction;
use alloy_primitives::B256;

/// A block of the local L2 chain, as produced by the execution engine.
///
/// Outside of the genesis block, every block of the rollup chain holds exactly one transaction and
/// the block at height `n` holds the canonical transaction chain element at index `n - 1`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct L2Block {
    /// The block number.
    pub number: u64,
    /// The block hash.
    pub hash: B256,
    /// The state root after the execution of the block.
    pub state_root: B256,
    /// The gas used by the block.
    pub gas_used: u64,
    /// The block timestamp.
    pub timestamp: u64,
    /// The transactions in the block.
    pub transactions: Vec<L2Transaction>,
}

impl L2Block {
    /// Returns the block number holding the canonical transaction chain element at `index`.
    pub const fn number_for_index(index: u64) -> u64 {
        index + 1
    }

    /// Returns true if this is the genesis block.
    pub const fn is_genesis(&self) -> bool {
        self.number == 0
    }
}
