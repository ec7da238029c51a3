use metrics::{Counter, Histogram};
use metrics_derive::Metrics;

/// The metrics for the [`super::Database`].
#[derive(Metrics, Clone)]
#[metrics(scope = "database")]
pub(crate) struct DatabaseMetrics {
    /// Time (ms) spent reading an entry.
    #[metric(describe = "Time to read a metadata entry (ms)")]
    pub(crate) get_duration: Histogram,
    /// Time (ms) spent writing an entry.
    #[metric(describe = "Time to write a metadata entry (ms)")]
    pub(crate) put_duration: Histogram,
    /// Number of failed operations.
    #[metric(describe = "Number of failed database operations")]
    pub(crate) failed_operations: Counter,
}
