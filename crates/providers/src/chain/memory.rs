use crate::{L2ChainProvider, ProviderError};
use std::sync::Arc;

use alloy_primitives::keccak256;
use parking_lot::Mutex;
use rollup_sync_primitives::{L2Block, L2Transaction};
use tokio::{sync::broadcast, task::JoinHandle};

/// The gas accounted to every block sealed by the executor of the [`InMemoryChain`].
pub const DEFAULT_BLOCK_GAS_USED: u64 = 21_000;

/// The capacity of the new blocks channel.
const NEW_BLOCKS_CAPACITY: usize = 1024;

/// A local chain held in memory, sealing every fed transaction in its own block on top of the
/// current head. It stands in for the execution engine: transactions are not executed and the
/// state root of a block commits to its parent state root and the transaction hash.
#[derive(Debug)]
pub struct InMemoryChain {
    blocks: Mutex<Vec<L2Block>>,
    new_blocks: broadcast::Sender<L2Block>,
}

impl Default for InMemoryChain {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryChain {
    /// Returns a new chain holding the genesis block only.
    pub fn new() -> Self {
        let genesis = L2Block { hash: keccak256(0u64.to_be_bytes()), ..Default::default() };
        Self {
            blocks: Mutex::new(vec![genesis]),
            new_blocks: broadcast::channel(NEW_BLOCKS_CAPACITY).0,
        }
    }

    /// Seals the transaction in a new block and returns it.
    pub fn push_transaction(&self, tx: L2Transaction, gas_used: u64) -> L2Block {
        let block = {
            let mut blocks = self.blocks.lock();
            let parent_root = blocks.last().map(|block| block.state_root).unwrap_or_default();
            let number = blocks.len() as u64;
            let block = L2Block {
                number,
                hash: keccak256(number.to_be_bytes()),
                state_root: keccak256([parent_root.as_slice(), tx.hash().as_slice()].concat()),
                gas_used,
                timestamp: tx.meta.l1_timestamp,
                transactions: vec![tx],
            };
            blocks.push(block.clone());
            block
        };
        tracing::trace!(target: "rollup_sync::providers", number = block.number, "Sealed block");
        let _ = self.new_blocks.send(block.clone());
        block
    }

    /// Returns all the blocks of the chain, genesis included.
    pub fn blocks(&self) -> Vec<L2Block> {
        self.blocks.lock().clone()
    }

    /// Returns the height of the chain.
    pub fn height(&self) -> u64 {
        self.blocks.lock().len() as u64 - 1
    }

    /// Returns a receiver for the blocks sealed after the call.
    pub fn subscribe_new_blocks(&self) -> broadcast::Receiver<L2Block> {
        self.new_blocks.subscribe()
    }

    /// Spawns a task sealing every transaction received on the feed, until the feed closes.
    pub fn spawn_executor(
        self: &Arc<Self>,
        mut feed: broadcast::Receiver<L2Transaction>,
    ) -> JoinHandle<()> {
        let chain = self.clone();
        tokio::spawn(async move {
            loop {
                match feed.recv().await {
                    Ok(tx) => {
                        chain.push_transaction(tx, DEFAULT_BLOCK_GAS_USED);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(target: "rollup_sync::providers", skipped, "Executor lagged behind the feed");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

#[async_trait::async_trait]
impl L2ChainProvider for InMemoryChain {
    async fn block_by_number(&self, number: u64) -> Result<Option<L2Block>, ProviderError> {
        Ok(self.blocks.lock().get(number as usize).cloned())
    }

    async fn current_block(&self) -> Result<L2Block, ProviderError> {
        self.blocks.lock().last().cloned().ok_or(ProviderError::BlockNotFound(0))
    }

    async fn set_head(&self, number: u64) -> Result<(), ProviderError> {
        let mut blocks = self.blocks.lock();
        let current = blocks.len() as u64 - 1;
        if number > current {
            return Err(ProviderError::InvalidHead { target: number, current })
        }
        blocks.truncate(number as usize + 1);
        Ok(())
    }
}
