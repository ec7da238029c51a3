//! Exposes the [`RollupClient`] trait allowing to retrieve the L1 to L2 queue and the canonical
//! transaction chain from the data transport service.

pub(crate) mod http;
pub(crate) mod types;

use crate::ProviderError;

use rollup_sync_primitives::{EthContext, L2Transaction};

/// An implementation of the trait can provide the elements of the L1 to L2 queue and of the
/// canonical transaction chain. Elements which do not exist are returned as [`None`], distinct
/// from a transport error.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait RollupClient: Send + Sync {
    /// Returns the L1 to L2 queue element at `index`.
    async fn get_enqueue(&self, index: u64) -> Result<Option<L2Transaction>, ProviderError>;

    /// Returns the latest L1 to L2 queue element.
    async fn get_latest_enqueue(&self) -> Result<Option<L2Transaction>, ProviderError>;

    /// Returns the canonical transaction chain element at `index`.
    async fn get_transaction(&self, index: u64) -> Result<Option<L2Transaction>, ProviderError>;

    /// Returns the latest canonical transaction chain element.
    async fn get_latest_transaction(&self) -> Result<Option<L2Transaction>, ProviderError>;

    /// Returns the L1 context at the provided block number.
    async fn get_eth_context(&self, block_number: u64) -> Result<EthContext, ProviderError>;

    /// Returns the latest L1 context.
    async fn get_latest_eth_context(&self) -> Result<EthContext, ProviderError>;
}
