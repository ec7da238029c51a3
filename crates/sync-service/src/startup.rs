use crate::{SyncService, SyncServiceError};

use rollup_sync_primitives::{L2Block, SyncCursor};
use rollup_sync_providers::{L2ChainProvider, RollupClient, TransactionValidator};

impl<C, P, V> SyncService<C, P, V>
where
    C: RollupClient + 'static,
    P: L2ChainProvider + 'static,
    V: TransactionValidator + 'static,
{
    /// Prepares the service for the sync loop: rolls back the local chain by the configured depth
    /// and positions the cursor after the elements already in the local chain.
    pub(crate) async fn initialize(&self) -> Result<(), SyncServiceError> {
        let chain = &self.inner.chain;
        let mut head = chain.current_block().await?;

        let depth = self.inner.config.initial_reorg_depth;
        if depth > 0 {
            if depth > head.number {
                return Err(SyncServiceError::ReorgTooDeep { depth, height: head.number })
            }
            let target = head.number - depth;
            tracing::info!(target: "rollup_sync::service", from = head.number, to = target, "Rolling back local chain");
            chain.set_head(target).await?;
            head = chain.current_block().await?;
        }

        let mut cursor = self.cursor_from_head(&head).await?;
        cursor.queue_index = cursor.queue_index.max(self.last_included_queue_index(&cursor).await?);

        tracing::info!(target: "rollup_sync::service", head = head.number, ?cursor, "Initialized sync cursor");
        self.inner.state.set_cursor(cursor);
        self.record_cursor(&cursor);
        Ok(())
    }

    /// Returns the cursor positioned after the element held by the head block. An empty chain is
    /// anchored at the L1 height of the canonical transaction chain deployment.
    async fn cursor_from_head(&self, head: &L2Block) -> Result<SyncCursor, SyncServiceError> {
        if head.is_genesis() {
            let height = self.inner.config.ctc_deploy_height;
            let context = self
                .inner
                .config
                .remote_retry
                .retry("get_eth_context", || self.inner.client.get_eth_context(height))
                .await?;
            return Ok(SyncCursor::from_context(context))
        }

        let [tx] = head.transactions.as_slice() else {
            return Err(SyncServiceError::UnexpectedTransactionCount {
                number: head.number,
                count: head.transactions.len(),
            })
        };

        let mut meta = tx.meta.clone();
        meta.index = Some(head.number - 1);
        let mut cursor = SyncCursor::default();
        cursor.advance(&meta);
        Ok(cursor)
    }

    /// Walks the L1 to L2 queue backwards from its latest element and returns the queue index of
    /// the first element whose canonical transaction chain index is covered by the cursor.
    async fn last_included_queue_index(
        &self,
        cursor: &SyncCursor,
    ) -> Result<Option<u64>, SyncServiceError> {
        if cursor.index.is_none() {
            return Ok(None)
        }

        let retry = self.inner.config.remote_retry;
        let client = &self.inner.client;
        let latest = retry.retry("get_latest_enqueue", || client.get_latest_enqueue()).await?;
        let Some(mut queue_index) = latest.and_then(|tx| tx.queue_index()) else { return Ok(None) };

        loop {
            let enqueue = retry
                .retry("get_enqueue", || client.get_enqueue(queue_index))
                .await?
                .ok_or(SyncServiceError::EnqueueNotFound(queue_index))?;

            if enqueue.index().is_some_and(|index| cursor.has_index(index)) {
                tracing::debug!(target: "rollup_sync::service", queue_index, "Found last included queue element");
                return Ok(Some(queue_index))
            }
            if queue_index == 0 {
                return Ok(None)
            }
            queue_index -= 1;
        }
    }
}
