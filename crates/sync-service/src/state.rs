use crate::SyncServiceError;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use rollup_sync_primitives::{L2Transaction, SyncCursor, TransactionMeta};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// The state shared between the sync service, its handle and the RPC handlers.
#[derive(Debug)]
pub(crate) struct SyncState {
    /// The progress into both remote streams.
    cursor: RwLock<SyncCursor>,
    /// Whether the node is catching up with the canonical transaction chain.
    syncing: AtomicBool,
    /// The feed of applied transactions, taken on stop.
    feed: RwLock<Option<broadcast::Sender<L2Transaction>>>,
    /// The lifecycle of the service.
    cancellation: CancellationToken,
}

impl SyncState {
    pub(crate) fn new(feed_capacity: usize) -> Self {
        Self {
            cursor: RwLock::new(SyncCursor::default()),
            syncing: AtomicBool::new(true),
            feed: RwLock::new(Some(broadcast::channel(feed_capacity.max(1)).0)),
            cancellation: CancellationToken::new(),
        }
    }

    /// Returns a snapshot of the cursor.
    pub(crate) fn cursor(&self) -> SyncCursor {
        *self.cursor.read()
    }

    pub(crate) fn set_cursor(&self, cursor: SyncCursor) {
        *self.cursor.write() = cursor;
    }

    /// Advances the cursor past the provided transaction and returns the new snapshot.
    pub(crate) fn advance(&self, meta: &TransactionMeta) -> SyncCursor {
        let mut cursor = self.cursor.write();
        cursor.advance(meta);
        *cursor
    }

    pub(crate) fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    pub(crate) fn set_syncing(&self, syncing: bool) {
        self.syncing.store(syncing, Ordering::Release);
    }

    pub(crate) fn subscribe(&self) -> Option<broadcast::Receiver<L2Transaction>> {
        self.feed.read().as_ref().map(broadcast::Sender::subscribe)
    }

    /// Publishes the transaction on the feed.
    pub(crate) fn publish(&self, tx: L2Transaction) -> Result<(), SyncServiceError> {
        let feed = self.feed.read();
        let sender = feed.as_ref().ok_or(SyncServiceError::Stopped)?;
        sender.send(tx).map(|_| ()).map_err(|_| SyncServiceError::NoFeedSubscriber)
    }

    pub(crate) const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Cancels the service and closes the feed for all subscribers.
    pub(crate) fn stop(&self) {
        self.cancellation.cancel();
        self.feed.write().take();
    }
}
