use crate::ProviderError;

use rollup_sync_primitives::RollupBlock;

/// Implementers of the trait post rollup blocks to the canonical transaction chain on L1.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait BatchSubmitter: Send + Sync {
    /// Submits the rollup block.
    async fn submit(&self, block: RollupBlock) -> Result<(), ProviderError>;
}
