use crate::TransactionMeta;

/// A snapshot of the L1 chain at a given height.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct EthContext {
    /// The L1 block number.
    pub block_number: u64,
    /// The L1 block timestamp.
    pub timestamp: u64,
}

impl EthContext {
    /// Returns a new [`EthContext`].
    pub const fn new(block_number: u64, timestamp: u64) -> Self {
        Self { block_number, timestamp }
    }
}

/// The progress of the node into the L1 to L2 queue and the canonical transaction chain, along with
/// the latest L1 context that was observed.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct SyncCursor {
    /// The latest L1 block number.
    pub block_number: u64,
    /// The latest L1 timestamp.
    pub timestamp: u64,
    /// The index of the latest applied L1 to L2 queue element.
    pub queue_index: Option<u64>,
    /// The index of the latest applied canonical transaction chain element.
    pub index: Option<u64>,
}

impl SyncCursor {
    /// Returns a cursor positioned before any element, anchored at the provided L1 context.
    pub const fn from_context(context: EthContext) -> Self {
        Self {
            block_number: context.block_number,
            timestamp: context.timestamp,
            queue_index: None,
            index: None,
        }
    }

    /// Returns the next canonical transaction chain index to apply.
    pub fn next_index(&self) -> u64 {
        self.index.map_or(0, |index| index + 1)
    }

    /// Returns the next L1 to L2 queue index to apply.
    pub fn next_queue_index(&self) -> u64 {
        self.queue_index.map_or(0, |index| index + 1)
    }

    /// Returns true if the canonical transaction chain element at `index` was already applied.
    pub fn has_index(&self, index: u64) -> bool {
        self.index.is_some_and(|current| index <= current)
    }

    /// Advances the cursor past the transaction with the provided metadata. The cursor never moves
    /// backwards.
    pub fn advance(&mut self, meta: &TransactionMeta) {
        if let Some(index) = meta.index {
            self.index = Some(self.index.map_or(index, |current| current.max(index)));
        }
        if meta.is_l1_to_l2() {
            if let Some(queue_index) = meta.queue_index {
                self.queue_index =
                    Some(self.queue_index.map_or(queue_index, |current| current.max(queue_index)));
            }
        }
        if meta.l1_block_number >= self.block_number {
            self.block_number = meta.l1_block_number;
            self.timestamp = self.timestamp.max(meta.l1_timestamp);
        }
    }
}
