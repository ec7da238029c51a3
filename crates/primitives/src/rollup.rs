use crate::L2Transaction;
use alloy_primitives::B256;

/// A transaction along with the state root obtained after its execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The executed transaction.
    pub transaction: L2Transaction,
    /// The state root after the execution of the transaction.
    pub post_state_root: B256,
}

impl Transition {
    /// Returns a new [`Transition`].
    pub const fn new(transaction: L2Transaction, post_state_root: B256) -> Self {
        Self { transaction, post_state_root }
    }
}

/// A finalized batch of transitions, ready to be submitted to L1.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RollupBlock {
    /// The transitions in the batch, ordered by canonical transaction chain index.
    pub transitions: Vec<Transition>,
}

impl RollupBlock {
    /// Returns the number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns true if the batch holds no transition.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
