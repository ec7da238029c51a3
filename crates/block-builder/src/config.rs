use std::time::Duration;

/// The configuration of the [`crate::BlockBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockBuilderConfig {
    /// The maximum gas of a rollup block, buffers included.
    pub max_rollup_block_gas: u64,
    /// The maximum number of transactions in a rollup block.
    pub max_rollup_block_transactions: usize,
    /// The maximum time a non-empty rollup block is held before it is submitted.
    pub max_rollup_block_time: Duration,
    /// The gas added to the gas used by each block to account for the transition overhead on L1.
    pub transition_gas_buffer: u64,
    /// The maximum number of rollup blocks being submitted concurrently.
    pub max_inflight_submissions: usize,
    /// The interval at which the age of the building block is checked.
    pub timer_interval: Duration,
}

impl Default for BlockBuilderConfig {
    fn default() -> Self {
        Self {
            max_rollup_block_gas: 9_000_000,
            max_rollup_block_transactions: 100,
            max_rollup_block_time: Duration::from_secs(60),
            transition_gas_buffer: 10_000,
            max_inflight_submissions: 4,
            timer_interval: Duration::from_secs(1),
        }
    }
}
