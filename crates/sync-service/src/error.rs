use alloy_primitives::B256;
use rollup_sync_providers::{ProviderError, ValidationError};

/// The classification of a [`SyncServiceError`], deciding how the caller reacts to it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Remote or storage I/O failure, retried on the next poll.
    Transient,
    /// Admission failure, reported to the submitter of the transaction.
    Rejected,
    /// Protocol invariant violation, the service must stop.
    Fatal,
}

/// A type that represents an error that occurred in the sync service.
#[derive(Debug, thiserror::Error)]
pub enum SyncServiceError {
    /// An error occurred at one of the providers.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    /// The transaction failed the admission rules.
    #[error(transparent)]
    Rejected(#[from] ValidationError),
    /// The node is catching up with the canonical transaction chain.
    #[error("node is syncing")]
    Syncing,
    /// The node does not sequence transactions.
    #[error("node is not a sequencer")]
    NotSequencer,
    /// The new transactions feed has no subscriber.
    #[error("new transactions feed has no subscriber")]
    NoFeedSubscriber,
    /// The service was stopped.
    #[error("sync service stopped")]
    Stopped,
    /// The data transport service reported an element which it does not serve.
    #[error("canonical transaction chain element {0} not found")]
    TransactionNotFound(u64),
    /// The data transport service reported a queue element which it does not serve.
    #[error("queue element {0} not found")]
    EnqueueNotFound(u64),
    /// A canonical transaction chain element has no index.
    #[error("transaction {0} has no canonical transaction chain index")]
    MissingIndex(B256),
    /// An element was received out of order.
    #[error("out of order element: expected index {expected}, got {got}")]
    OutOfOrder {
        /// The next index of the cursor.
        expected: u64,
        /// The index of the element.
        got: u64,
    },
    /// A local block does not hold exactly one transaction.
    #[error("block {number} holds {count} transactions")]
    UnexpectedTransactionCount {
        /// The block number.
        number: u64,
        /// The number of transactions in the block.
        count: usize,
    },
    /// The initial reorg is deeper than the local chain.
    #[error("initial reorg depth {depth} exceeds chain height {height}")]
    ReorgTooDeep {
        /// The configured depth.
        depth: u64,
        /// The height of the chain.
        height: u64,
    },
    /// The service task terminated abnormally.
    #[error("sync service task failed: {0}")]
    Task(String),
}

impl SyncServiceError {
    /// Returns the [`ErrorKind`] of the error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Provider(ProviderError::BlockNotFound(_) | ProviderError::InvalidHead { .. }) |
            Self::MissingIndex(_) |
            Self::OutOfOrder { .. } |
            Self::UnexpectedTransactionCount { .. } |
            Self::ReorgTooDeep { .. } |
            Self::Task(_) => ErrorKind::Fatal,
            Self::Provider(_) |
            Self::NoFeedSubscriber |
            Self::Stopped |
            Self::TransactionNotFound(_) |
            Self::EnqueueNotFound(_) => ErrorKind::Transient,
            Self::Rejected(_) | Self::Syncing | Self::NotSequencer => ErrorKind::Rejected,
        }
    }

    /// Returns true if the error is fatal.
    pub const fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::Fatal)
    }
}
