//! Contains an implementation of a data transport service client.

use super::{
    types::{EnqueueResponse, EthContextResponse, TransactionResponse},
    RollupClient,
};
use crate::ProviderError;
use std::time::Duration;

use reqwest::Client;
use rollup_sync_primitives::{EthContext, L2Transaction};
use serde::de::DeserializeOwned;

/// The enqueue by index method prefix.
const ENQUEUE_INDEX_METHOD_PREFIX: &str = "enqueue/index";

/// The latest enqueue method.
const ENQUEUE_LATEST_METHOD: &str = "enqueue/latest";

/// The transaction by index method prefix.
const TRANSACTION_INDEX_METHOD_PREFIX: &str = "transaction/index";

/// The latest transaction method.
const TRANSACTION_LATEST_METHOD: &str = "transaction/latest";

/// The eth context by block number method prefix.
const ETH_CONTEXT_BLOCK_NUMBER_METHOD_PREFIX: &str = "eth/context/blocknumber";

/// The latest eth context method.
const ETH_CONTEXT_LATEST_METHOD: &str = "eth/context/latest";

/// An online implementation of the [`RollupClient`] trait over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRollupClient {
    /// The base URL of the data transport service.
    pub base: String,
    /// The inner reqwest client.
    pub inner: Client,
}

impl HttpRollupClient {
    /// Creates a new [`HttpRollupClient`] from the provided base URL, applying `timeout` to every
    /// request.
    pub fn new_http(mut base: String, timeout: Duration) -> Result<Self, ProviderError> {
        // If base ends with a slash, remove it
        if base.ends_with('/') {
            base.remove(base.len() - 1);
        }
        let inner = Client::builder().timeout(timeout).build()?;
        Ok(Self { base, inner })
    }

    /// Returns the raw transaction response, including the batch of the element.
    pub async fn transaction_response(
        &self,
        index: Option<u64>,
    ) -> Result<TransactionResponse, ProviderError> {
        match index {
            Some(index) => self.get(&format!("{TRANSACTION_INDEX_METHOD_PREFIX}/{index}")).await,
            None => self.get(TRANSACTION_LATEST_METHOD).await,
        }
    }

    async fn get<T: DeserializeOwned>(&self, method: &str) -> Result<T, ProviderError> {
        tracing::trace!(target: "rollup_sync::providers", method, "Querying data transport service");
        let response =
            self.inner.get(format!("{}/{}", self.base, method)).send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait::async_trait]
impl RollupClient for HttpRollupClient {
    async fn get_enqueue(&self, index: u64) -> Result<Option<L2Transaction>, ProviderError> {
        self.get::<EnqueueResponse>(&format!("{ENQUEUE_INDEX_METHOD_PREFIX}/{index}"))
            .await?
            .into_transaction()
    }

    async fn get_latest_enqueue(&self) -> Result<Option<L2Transaction>, ProviderError> {
        self.get::<EnqueueResponse>(ENQUEUE_LATEST_METHOD).await?.into_transaction()
    }

    async fn get_transaction(&self, index: u64) -> Result<Option<L2Transaction>, ProviderError> {
        self.transaction_response(Some(index)).await?.into_transaction()
    }

    async fn get_latest_transaction(&self) -> Result<Option<L2Transaction>, ProviderError> {
        self.transaction_response(None).await?.into_transaction()
    }

    async fn get_eth_context(&self, block_number: u64) -> Result<EthContext, ProviderError> {
        let context: EthContextResponse =
            self.get(&format!("{ETH_CONTEXT_BLOCK_NUMBER_METHOD_PREFIX}/{block_number}")).await?;
        Ok(context.into())
    }

    async fn get_latest_eth_context(&self) -> Result<EthContext, ProviderError> {
        let context: EthContextResponse = self.get(ETH_CONTEXT_LATEST_METHOD).await?;
        Ok(context.into())
    }
}
