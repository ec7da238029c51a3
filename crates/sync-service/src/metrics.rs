use metrics::{Counter, Gauge};
use metrics_derive::Metrics;

/// The metrics for the [`crate::SyncService`].
#[derive(Metrics, Clone)]
#[metrics(scope = "sync_service")]
pub(crate) struct SyncServiceMetrics {
    /// Number of transactions published on the feed.
    #[metric(describe = "Number of transactions applied")]
    pub(crate) applied_transactions: Counter,
    /// Number of elements skipped because they were already applied.
    #[metric(describe = "Number of elements skipped as already applied")]
    pub(crate) skipped_transactions: Counter,
    /// Number of local blocks not matching the remote element.
    #[metric(describe = "Number of local blocks mismatching the canonical transaction chain")]
    pub(crate) mismatched_transactions: Counter,
    /// Number of transactions failing the admission rules.
    #[metric(describe = "Number of transactions rejected at admission")]
    pub(crate) rejected_transactions: Counter,
    /// Number of transient errors in the sync loop.
    #[metric(describe = "Number of transient errors in the sync loop")]
    pub(crate) transient_errors: Counter,
    /// The canonical transaction chain index of the cursor.
    #[metric(describe = "Latest applied canonical transaction chain index")]
    pub(crate) index: Gauge,
    /// The queue index of the cursor.
    #[metric(describe = "Latest applied queue index")]
    pub(crate) queue_index: Gauge,
    /// The L1 block number of the cursor.
    #[metric(describe = "Latest L1 block number")]
    pub(crate) l1_block_number: Gauge,
}
