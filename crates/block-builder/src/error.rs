use rollup_sync_db::DatabaseError;
use rollup_sync_providers::ProviderError;

/// A type that represents an error that occurred in the block builder.
#[derive(Debug, thiserror::Error)]
pub enum BlockBuilderError {
    /// An error occurred at the local chain.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    /// An error occurred while persisting the progress marker.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    /// A local block does not hold exactly one transaction.
    #[error("block {number} holds {count} transactions")]
    UnexpectedTransactionCount {
        /// The block number.
        number: u64,
        /// The number of transactions in the block.
        count: usize,
    },
    /// A single block does not fit in an empty rollup block.
    #[error("block {number} uses {gas} gas, exceeding the rollup block gas limit {limit}")]
    BlockExceedsGasLimit {
        /// The block number.
        number: u64,
        /// The gas of the block, buffer included.
        gas: u64,
        /// The configured limit.
        limit: u64,
    },
    /// The persisted marker is ahead of the local chain.
    #[error("last processed block {marker} is ahead of the chain head {head}")]
    MarkerAheadOfChain {
        /// The persisted marker.
        marker: u64,
        /// The head of the local chain.
        head: u64,
    },
    /// The submission slots were closed.
    #[error("submission slots closed")]
    SubmissionClosed,
    /// The builder task terminated abnormally.
    #[error("block builder task failed: {0}")]
    Task(String),
}
