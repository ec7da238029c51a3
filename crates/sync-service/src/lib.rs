//! The sync service reconciles the local L2 chain with the canonical transaction chain and the L1
//! to L2 queue served by the data transport service.
//!
//! A verifier replays the canonical transaction chain in index order. A sequencer first replays
//! the canonical transaction chain, then includes the L1 to L2 queue and accepts new transactions
//! over RPC. Applied transactions are published on a broadcast feed consumed by the execution
//! engine, which seals each of them in its own block: the element at index `i` lives in block
//! `i + 1`.

pub use config::{NodeRole, SyncServiceConfig};
mod config;

pub use error::{ErrorKind, SyncServiceError};
mod error;

pub use handle::SyncServiceHandle;
mod handle;

mod apply;
pub use apply::ApplyOutcome;

mod metrics;
use metrics::SyncServiceMetrics;

pub use retry::Retry;
mod retry;

mod startup;

mod state;
use state::SyncState;

mod sync;

use std::sync::Arc;

use rollup_sync_primitives::{L2Transaction, SyncCursor};
use rollup_sync_providers::{L2ChainProvider, RollupClient, TransactionValidator};
use tokio::sync::{broadcast, Mutex};

/// The sync service.
///
/// The service is cheap to clone: clones share the cursor, the feed and the apply lock, which
/// allows RPC handlers to submit transactions while the sync loop runs.
#[derive(Debug)]
pub struct SyncService<C, P, V> {
    inner: Arc<SyncServiceInner<C, P, V>>,
}

#[derive(Debug)]
struct SyncServiceInner<C, P, V> {
    /// The configuration of the service.
    config: SyncServiceConfig,
    /// The data transport service client.
    client: C,
    /// The local chain.
    chain: P,
    /// The mempool admission rules.
    validator: V,
    /// The state shared with the handle.
    state: Arc<SyncState>,
    /// Serializes all applications so that indices are assigned in order.
    apply_lock: Mutex<()>,
    /// The metrics of the service.
    metrics: SyncServiceMetrics,
}

impl<C, P, V> Clone for SyncService<C, P, V> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<C, P, V> SyncService<C, P, V>
where
    C: RollupClient + 'static,
    P: L2ChainProvider + 'static,
    V: TransactionValidator + 'static,
{
    /// Returns a new [`SyncService`]. The service is syncing until it first reaches the tip of the
    /// canonical transaction chain.
    pub fn new(config: SyncServiceConfig, client: C, chain: P, validator: V) -> Self {
        let state = Arc::new(SyncState::new(config.feed_capacity));
        Self {
            inner: Arc::new(SyncServiceInner {
                config,
                client,
                chain,
                validator,
                state,
                apply_lock: Mutex::new(()),
                metrics: SyncServiceMetrics::default(),
            }),
        }
    }

    /// Returns the configuration of the service.
    pub fn config(&self) -> &SyncServiceConfig {
        &self.inner.config
    }

    /// Returns a snapshot of the cursor.
    pub fn cursor(&self) -> SyncCursor {
        self.inner.state.cursor()
    }

    /// Returns true if the node is catching up with the canonical transaction chain.
    pub fn is_syncing(&self) -> bool {
        self.inner.state.is_syncing()
    }

    /// Returns a receiver for the transactions applied after the call, or [`None`] if the service
    /// was stopped.
    pub fn subscribe_new_transactions(&self) -> Option<broadcast::Receiver<L2Transaction>> {
        self.inner.state.subscribe()
    }

    /// Initializes the service and spawns the sync loop.
    ///
    /// Initialization errors are returned to the caller: the loop never starts from an
    /// inconsistent cursor.
    pub async fn spawn(self) -> Result<SyncServiceHandle, SyncServiceError> {
        self.initialize().await?;

        let state = self.inner.state.clone();
        let task = tokio::spawn(self.run());
        Ok(SyncServiceHandle::new(state, task))
    }

    /// Runs the sync loop until the service is stopped, returning the first fatal error.
    pub async fn run(self) -> Result<(), SyncServiceError> {
        let role = self.inner.config.role;
        tracing::info!(target: "rollup_sync::service", %role, cursor = ?self.cursor(), "Starting sync loop");

        loop {
            if let Err(err) = self.sync_iteration().await {
                match err.kind() {
                    ErrorKind::Transient => {
                        self.inner.metrics.transient_errors.increment(1);
                        tracing::warn!(target: "rollup_sync::service", ?err, "Transient error in sync loop, retrying on next poll");
                    }
                    ErrorKind::Rejected | ErrorKind::Fatal => {
                        tracing::error!(target: "rollup_sync::service", ?err, "Fatal error in sync loop");
                        return Err(err)
                    }
                }
            }

            tokio::select! {
                biased;

                _ = self.inner.state.cancellation().cancelled() => break,
                _ = tokio::time::sleep(self.inner.config.poll_interval) => {}
            }
        }

        tracing::info!(target: "rollup_sync::service", cursor = ?self.cursor(), "Sync loop stopped");
        Ok(())
    }

    /// Runs a single iteration of the sync loop.
    async fn sync_iteration(&self) -> Result<(), SyncServiceError> {
        if self.inner.config.role.is_sequencer() && !self.is_syncing() {
            self.sync_queue_to_tip().await?;
        }
        self.sync_transactions_to_tip().await?;

        if self.is_syncing() && !self.is_cancelled() {
            tracing::info!(target: "rollup_sync::service", cursor = ?self.cursor(), "Reached the tip of the canonical transaction chain");
            self.inner.state.set_syncing(false);
        }
        Ok(())
    }

    /// Stops the service.
    pub fn stop(&self) {
        self.inner.state.stop();
    }

    fn is_cancelled(&self) -> bool {
        self.inner.state.cancellation().is_cancelled()
    }

    fn record_cursor(&self, cursor: &SyncCursor) {
        let metrics = &self.inner.metrics;
        metrics.index.set(cursor.index.map_or(-1.0, |index| index as f64));
        metrics.queue_index.set(cursor.queue_index.map_or(-1.0, |index| index as f64));
        metrics.l1_block_number.set(cursor.block_number as f64);
    }
}
