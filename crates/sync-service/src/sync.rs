use crate::{SyncService, SyncServiceError};

use rollup_sync_providers::{L2ChainProvider, RollupClient, TransactionValidator};

impl<C, P, V> SyncService<C, P, V>
where
    C: RollupClient + 'static,
    P: L2ChainProvider + 'static,
    V: TransactionValidator + 'static,
{
    /// Applies every canonical transaction chain element after the cursor, up to and including the
    /// latest element served by the data transport service.
    pub(crate) async fn sync_transactions_to_tip(&self) -> Result<(), SyncServiceError> {
        let retry = self.inner.config.remote_retry;
        let client = &self.inner.client;

        let Some(latest) =
            retry.retry("get_latest_transaction", || client.get_latest_transaction()).await?
        else {
            return Ok(())
        };
        let latest_index =
            latest.index().ok_or_else(|| SyncServiceError::MissingIndex(latest.hash()))?;

        let start = self.cursor().next_index();
        if start > latest_index {
            return Ok(())
        }
        tracing::debug!(target: "rollup_sync::service", start, latest_index, "Syncing canonical transaction chain");

        for index in start..=latest_index {
            if self.is_cancelled() {
                break
            }
            let tx = retry
                .retry("get_transaction", || client.get_transaction(index))
                .await?
                .ok_or(SyncServiceError::TransactionNotFound(index))?;
            self.apply_transaction(tx).await?;
        }
        Ok(())
    }

    /// Applies every L1 to L2 queue element after the cursor, up to and including the latest
    /// element served by the data transport service.
    pub(crate) async fn sync_queue_to_tip(&self) -> Result<(), SyncServiceError> {
        let retry = self.inner.config.remote_retry;
        let client = &self.inner.client;

        let latest = retry.retry("get_latest_enqueue", || client.get_latest_enqueue()).await?;
        let Some(latest_queue_index) = latest.and_then(|tx| tx.queue_index()) else {
            return Ok(())
        };

        let start = self.cursor().next_queue_index();
        if start > latest_queue_index {
            return Ok(())
        }
        tracing::debug!(target: "rollup_sync::service", start, latest_queue_index, "Syncing L1 to L2 queue");

        for queue_index in start..=latest_queue_index {
            if self.is_cancelled() {
                break
            }
            let enqueue = retry
                .retry("get_enqueue", || client.get_enqueue(queue_index))
                .await?
                .ok_or(SyncServiceError::EnqueueNotFound(queue_index))?;
            self.apply_enqueue(enqueue).await?;
        }
        Ok(())
    }
}
