use crate::ProviderError;

use rollup_sync_primitives::L2Block;

/// Implementers of the trait provide access to the local L2 chain built by the execution engine.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait L2ChainProvider: Send + Sync {
    /// Returns the block at the provided height, or [None].
    async fn block_by_number(&self, number: u64) -> Result<Option<L2Block>, ProviderError>;

    /// Returns the current head of the chain.
    async fn current_block(&self) -> Result<L2Block, ProviderError>;

    /// Rewinds the chain to the provided height.
    async fn set_head(&self, number: u64) -> Result<(), ProviderError>;
}

pub use memory::{InMemoryChain, DEFAULT_BLOCK_GAS_USED};
mod memory;
