use metrics::{Counter, Gauge, Histogram};
use metrics_derive::Metrics;

/// The metrics for the [`crate::BlockBuilder`].
#[derive(Metrics, Clone)]
#[metrics(scope = "block_builder")]
pub(crate) struct BlockBuilderMetrics {
    /// Number of rollup blocks handed to the submitter.
    #[metric(describe = "Number of rollup blocks submitted")]
    pub(crate) submitted_blocks: Counter,
    /// Number of failed submissions.
    #[metric(describe = "Number of failed rollup block submissions")]
    pub(crate) submission_failures: Counter,
    /// Number of duplicate blocks received from the block stream.
    #[metric(describe = "Number of duplicate blocks ignored")]
    pub(crate) duplicate_blocks: Counter,
    /// Number of transitions per rollup block.
    #[metric(describe = "Number of transitions per rollup block")]
    pub(crate) rollup_block_transitions: Histogram,
    /// Gas per rollup block.
    #[metric(describe = "Gas per rollup block, buffers included")]
    pub(crate) rollup_block_gas: Histogram,
    /// The duration of a submission.
    #[metric(describe = "Duration of a rollup block submission")]
    pub(crate) submission_duration: Histogram,
    /// The last block number persisted.
    #[metric(describe = "Last processed L2 block number")]
    pub(crate) last_processed_block_number: Gauge,
}
