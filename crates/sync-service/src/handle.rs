use crate::{state::SyncState, SyncServiceError};
use std::sync::Arc;

use rollup_sync_primitives::{L2Transaction, SyncCursor};
use tokio::{sync::broadcast, task::JoinHandle};

/// A handle to interact with a running [`crate::SyncService`].
#[derive(Debug)]
pub struct SyncServiceHandle {
    /// The state shared with the service.
    state: Arc<SyncState>,
    /// The task running the sync loop.
    task: JoinHandle<Result<(), SyncServiceError>>,
}

impl SyncServiceHandle {
    pub(crate) const fn new(
        state: Arc<SyncState>,
        task: JoinHandle<Result<(), SyncServiceError>>,
    ) -> Self {
        Self { state, task }
    }

    /// Stops the service. The sync loop exits at its next checkpoint and every subscriber of the
    /// new transactions feed observes the closing of the feed.
    pub fn stop(&self) {
        tracing::info!(target: "rollup_sync::service", "Stopping sync service");
        self.state.stop();
    }

    /// Returns a receiver for the transactions applied after the call, or [`None`] if the service
    /// was stopped.
    pub fn subscribe_new_transactions(&self) -> Option<broadcast::Receiver<L2Transaction>> {
        self.state.subscribe()
    }

    /// Returns a snapshot of the cursor.
    pub fn cursor(&self) -> SyncCursor {
        self.state.cursor()
    }

    /// Returns true if the node is catching up with the canonical transaction chain.
    pub fn is_syncing(&self) -> bool {
        self.state.is_syncing()
    }

    /// Returns true if the sync loop exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the sync loop to exit, returning the fatal error that stopped it if any.
    pub async fn join(self) -> Result<(), SyncServiceError> {
        self.task.await.map_err(|err| SyncServiceError::Task(err.to_string()))?
    }
}
