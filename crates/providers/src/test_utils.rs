//! Test utils for providers.

pub use crate::chain::{InMemoryChain, DEFAULT_BLOCK_GAS_USED};

use crate::{BatchSubmitter, ProviderError, RollupClient, TransactionValidator, ValidationError};
use std::{collections::BTreeMap, sync::Arc};

use parking_lot::Mutex;
use rollup_sync_primitives::{EthContext, L2Transaction, RollupBlock};
use tokio::sync::mpsc;

/// Installs a test subscriber honouring `RUST_LOG`. Subsequent calls are ignored.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default)]
struct MockRollupClientInner {
    enqueues: BTreeMap<u64, L2Transaction>,
    transactions: BTreeMap<u64, L2Transaction>,
    contexts: BTreeMap<u64, EthContext>,
    latest_context: EthContext,
    failures: usize,
}

impl MockRollupClientInner {
    fn maybe_fail(&mut self) -> Result<(), ProviderError> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(ProviderError::Other("mock rollup client failure"))
        }
        Ok(())
    }
}

/// Implementation of the [`RollupClient`] serving records held in memory.
#[derive(Debug, Default, Clone)]
pub struct MockRollupClient {
    inner: Arc<Mutex<MockRollupClientInner>>,
}

impl MockRollupClient {
    /// Adds an element to the L1 to L2 queue, keyed by its queue index.
    pub fn add_enqueue(&self, tx: L2Transaction) {
        let queue_index = tx.queue_index().unwrap_or_default();
        self.inner.lock().enqueues.insert(queue_index, tx);
    }

    /// Adds an element to the canonical transaction chain, keyed by its index. If the element
    /// originates from the queue, the queue element is marked as included.
    pub fn add_transaction(&self, tx: L2Transaction) {
        let index = tx.index().unwrap_or_default();
        let mut inner = self.inner.lock();
        if let Some(enqueue) = tx.queue_index().and_then(|i| inner.enqueues.get_mut(&i)) {
            enqueue.meta.index = Some(index);
        }
        inner.transactions.insert(index, tx);
    }

    /// Sets the L1 context at its block number and marks it as the latest.
    pub fn set_eth_context(&self, context: EthContext) {
        let mut inner = self.inner.lock();
        inner.contexts.insert(context.block_number, context);
        inner.latest_context = context;
    }

    /// Fails the next `n` requests.
    pub fn fail_next_requests(&self, n: usize) {
        self.inner.lock().failures = n;
    }
}

#[async_trait::async_trait]
impl RollupClient for MockRollupClient {
    async fn get_enqueue(&self, index: u64) -> Result<Option<L2Transaction>, ProviderError> {
        let mut inner = self.inner.lock();
        inner.maybe_fail()?;
        Ok(inner.enqueues.get(&index).cloned())
    }

    async fn get_latest_enqueue(&self) -> Result<Option<L2Transaction>, ProviderError> {
        let mut inner = self.inner.lock();
        inner.maybe_fail()?;
        Ok(inner.enqueues.last_key_value().map(|(_, tx)| tx.clone()))
    }

    async fn get_transaction(&self, index: u64) -> Result<Option<L2Transaction>, ProviderError> {
        let mut inner = self.inner.lock();
        inner.maybe_fail()?;
        Ok(inner.transactions.get(&index).cloned())
    }

    async fn get_latest_transaction(&self) -> Result<Option<L2Transaction>, ProviderError> {
        let mut inner = self.inner.lock();
        inner.maybe_fail()?;
        Ok(inner.transactions.last_key_value().map(|(_, tx)| tx.clone()))
    }

    async fn get_eth_context(&self, block_number: u64) -> Result<EthContext, ProviderError> {
        let mut inner = self.inner.lock();
        inner.maybe_fail()?;
        Ok(inner.contexts.get(&block_number).copied().unwrap_or(EthContext::new(block_number, 0)))
    }

    async fn get_latest_eth_context(&self) -> Result<EthContext, ProviderError> {
        let mut inner = self.inner.lock();
        inner.maybe_fail()?;
        Ok(inner.latest_context)
    }
}

/// A [`TransactionValidator`] admitting every transaction.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAllValidator;

#[async_trait::async_trait]
impl TransactionValidator for AcceptAllValidator {
    async fn validate_transaction(&self, _tx: &L2Transaction) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// A [`TransactionValidator`] rejecting every transaction.
#[derive(Debug, Default, Clone, Copy)]
pub struct RejectAllValidator;

#[async_trait::async_trait]
impl TransactionValidator for RejectAllValidator {
    async fn validate_transaction(&self, tx: &L2Transaction) -> Result<(), ValidationError> {
        Err(ValidationError { hash: tx.hash(), reason: "rejected by test validator".to_string() })
    }
}

/// A [`BatchSubmitter`] forwarding every submitted block on a channel.
#[derive(Debug, Clone)]
pub struct ChannelSubmitter {
    sender: mpsc::UnboundedSender<RollupBlock>,
}

impl ChannelSubmitter {
    /// Returns the submitter along with the receiving half of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RollupBlock>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait::async_trait]
impl BatchSubmitter for ChannelSubmitter {
    async fn submit(&self, block: RollupBlock) -> Result<(), ProviderError> {
        self.sender.send(block).map_err(|_| ProviderError::Submission("channel closed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client_marks_included_enqueues() -> eyre::Result<()> {
        let client = MockRollupClient::default();
        let mut enqueue = L2Transaction::default();
        enqueue.meta.queue_index = Some(0);
        client.add_enqueue(enqueue.clone());
        assert_eq!(client.get_latest_enqueue().await?.and_then(|tx| tx.index()), None);

        enqueue.meta.index = Some(3);
        client.add_transaction(enqueue);
        assert_eq!(client.get_enqueue(0).await?.and_then(|tx| tx.index()), Some(3));

        client.fail_next_requests(1);
        assert!(client.get_transaction(3).await.is_err());
        assert!(client.get_transaction(3).await?.is_some());
        Ok(())
    }
}
