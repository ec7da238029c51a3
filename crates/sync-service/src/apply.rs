use crate::{SyncService, SyncServiceError};

use rollup_sync_codec::CtcTransaction;
use rollup_sync_primitives::{L2Block, L2Transaction, QueueOrigin, TransactionMeta};
use rollup_sync_providers::{L2ChainProvider, RollupClient, TransactionValidator, ValidationError};

/// The outcome of the application of a canonical transaction chain element.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The transaction was published on the new transactions feed.
    Applied,
    /// The element is at or below the cursor.
    Skipped,
    /// The local chain already holds a block for the element, the cursor was advanced past it.
    AlreadyInChain,
}

impl<C, P, V> SyncService<C, P, V>
where
    C: RollupClient + 'static,
    P: L2ChainProvider + 'static,
    V: TransactionValidator + 'static,
{
    /// Applies the canonical transaction chain element. Elements must be applied in index order
    /// and an element is never published twice.
    pub async fn apply_transaction(
        &self,
        tx: L2Transaction,
    ) -> Result<ApplyOutcome, SyncServiceError> {
        let _guard = self.inner.apply_lock.lock().await;
        self.apply_locked(tx).await
    }

    /// Validates a transaction submitted over RPC and sequences it at the next canonical
    /// transaction chain index, anchored at the latest L1 context of the cursor. Returns the
    /// sequenced transaction.
    ///
    /// Transactions without a compressed batch form are rejected before they take an index.
    pub async fn validate_and_apply_sequencer_transaction(
        &self,
        mut tx: L2Transaction,
    ) -> Result<L2Transaction, SyncServiceError> {
        if !self.inner.config.role.is_sequencer() {
            return Err(SyncServiceError::NotSequencer)
        }
        if self.is_syncing() {
            return Err(SyncServiceError::Syncing)
        }
        if let Err(err) = CtcTransaction::try_from(&tx) {
            self.inner.metrics.rejected_transactions.increment(1);
            return Err(ValidationError { hash: tx.hash(), reason: err.to_string() }.into())
        }

        let _guard = self.inner.apply_lock.lock().await;
        let cursor = self.cursor();
        tx.meta = TransactionMeta {
            index: Some(cursor.next_index()),
            ..TransactionMeta::new(
                cursor.block_number,
                cursor.timestamp,
                None,
                tx.meta.signature_hash_type,
                QueueOrigin::Sequencer,
            )
        };

        self.apply_locked(tx.clone()).await?;
        Ok(tx)
    }

    /// Sequences the L1 to L2 queue element at the next canonical transaction chain index.
    pub(crate) async fn apply_enqueue(
        &self,
        mut tx: L2Transaction,
    ) -> Result<ApplyOutcome, SyncServiceError> {
        let _guard = self.inner.apply_lock.lock().await;
        let cursor = self.cursor();

        if tx.queue_index().is_some_and(|queue_index| queue_index < cursor.next_queue_index()) {
            self.inner.metrics.skipped_transactions.increment(1);
            return Ok(ApplyOutcome::Skipped)
        }

        tx.meta.index = Some(cursor.next_index());
        tracing::trace!(
            target: "rollup_sync::service",
            queue_index = ?tx.queue_index(),
            index = ?tx.index(),
            "Applying queue element"
        );
        self.apply_locked(tx).await
    }

    /// Applies the transaction. The caller must hold the apply lock.
    async fn apply_locked(&self, tx: L2Transaction) -> Result<ApplyOutcome, SyncServiceError> {
        let metrics = &self.inner.metrics;
        let index = tx.index().ok_or_else(|| SyncServiceError::MissingIndex(tx.hash()))?;
        let cursor = self.cursor();

        if cursor.has_index(index) {
            tracing::trace!(target: "rollup_sync::service", index, "Skipping applied element");
            metrics.skipped_transactions.increment(1);
            return Ok(ApplyOutcome::Skipped)
        }
        let expected = cursor.next_index();
        if index != expected {
            return Err(SyncServiceError::OutOfOrder { expected, got: index })
        }

        let number = L2Block::number_for_index(index);
        if let Some(block) = self.inner.chain.block_by_number(number).await? {
            let [local] = block.transactions.as_slice() else {
                return Err(SyncServiceError::UnexpectedTransactionCount {
                    number,
                    count: block.transactions.len(),
                })
            };
            if !local.matches_l1_commitment(&tx) {
                metrics.mismatched_transactions.increment(1);
                tracing::warn!(
                    target: "rollup_sync::service",
                    index,
                    local = ?local.hash(),
                    remote = ?tx.hash(),
                    "Local block does not match the canonical transaction chain"
                );
            }
            let cursor = self.inner.state.advance(&tx.meta);
            self.record_cursor(&cursor);
            return Ok(ApplyOutcome::AlreadyInChain)
        }

        // the verifier reproduces whatever L1 recorded.
        if self.inner.config.role.is_sequencer() && !tx.meta.is_l1_to_l2() {
            if let Err(err) = self.inner.validator.validate_transaction(&tx).await {
                metrics.rejected_transactions.increment(1);
                tracing::debug!(target: "rollup_sync::service", index, ?err, "Rejected transaction");
                return Err(err.into())
            }
        }

        let meta = tx.meta.clone();
        self.inner.state.publish(tx)?;
        let cursor = self.inner.state.advance(&meta);
        self.record_cursor(&cursor);
        metrics.applied_transactions.increment(1);
        tracing::trace!(target: "rollup_sync::service", index, "Applied transaction");

        Ok(ApplyOutcome::Applied)
    }
}
