use crate::BlockBuilderConfig;

use rollup_sync_primitives::{RollupBlock, Transition};

/// The rollup block being accumulated by the [`crate::BlockBuilder`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildingBlock {
    /// The number of the first L2 block in the rollup block.
    pub first_block_number: u64,
    /// The number of the last L2 block in the rollup block.
    pub last_block_number: u64,
    /// The gas of the rollup block, buffers included.
    pub gas_used: u64,
    /// The accumulated transitions.
    pub rollup_block: RollupBlock,
}

impl BuildingBlock {
    /// Returns true if no block was added.
    pub fn is_empty(&self) -> bool {
        self.rollup_block.is_empty()
    }

    /// Returns the number of blocks added.
    pub fn len(&self) -> usize {
        self.rollup_block.len()
    }

    /// Returns true if a block with the provided gas can be added without exceeding the limits.
    pub fn fits(&self, gas: u64, config: &BlockBuilderConfig) -> bool {
        self.len() < config.max_rollup_block_transactions &&
            self.gas_used.saturating_add(gas) <= config.max_rollup_block_gas
    }

    /// Returns true if no further block can be added: the transaction limit is reached or the
    /// remaining gas is below the buffer of a single transition.
    pub fn is_full(&self, config: &BlockBuilderConfig) -> bool {
        self.len() >= config.max_rollup_block_transactions ||
            config.max_rollup_block_gas.saturating_sub(self.gas_used) < config.transition_gas_buffer
    }

    /// Adds the transition of the block at `number`.
    pub fn push(&mut self, number: u64, transition: Transition, gas: u64) {
        if self.is_empty() {
            self.first_block_number = number;
        }
        self.last_block_number = number;
        self.gas_used += gas;
        self.rollup_block.transitions.push(transition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use rollup_sync_primitives::L2Transaction;

    fn config(max_gas: u64, max_transactions: usize) -> BlockBuilderConfig {
        BlockBuilderConfig {
            max_rollup_block_gas: max_gas,
            max_rollup_block_transactions: max_transactions,
            transition_gas_buffer: 1_000,
            ..Default::default()
        }
    }

    fn transition() -> Transition {
        Transition::new(L2Transaction::default(), B256::ZERO)
    }

    #[test]
    fn test_building_block_tracks_range_and_gas() {
        let mut building = BuildingBlock::default();
        assert!(building.is_empty());

        building.push(7, transition(), 22_000);
        building.push(8, transition(), 30_000);

        assert_eq!(building.first_block_number, 7);
        assert_eq!(building.last_block_number, 8);
        assert_eq!(building.gas_used, 52_000);
        assert_eq!(building.len(), 2);
    }

    #[test]
    fn test_building_block_limits() {
        let config = config(50_000, 2);
        let mut building = BuildingBlock::default();
        assert!(building.fits(50_000, &config));
        assert!(!building.fits(50_001, &config));

        building.push(1, transition(), 22_000);
        assert!(!building.is_full(&config));
        assert!(building.fits(28_000, &config));
        assert!(!building.fits(28_001, &config));

        building.push(2, transition(), 22_000);
        assert!(building.is_full(&config));
        assert!(!building.fits(1, &config));
    }

    #[test]
    fn test_building_block_full_when_gas_left_is_below_buffer() {
        let config = config(22_500, 10);
        let mut building = BuildingBlock::default();
        building.push(1, transition(), 21_600);
        assert!(building.is_full(&config));
    }
}
