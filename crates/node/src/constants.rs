/// The default url of the data transport service.
pub(crate) const DEFAULT_ROLLUP_CLIENT_URL: &str = "http://localhost:7878";

/// The default timeout in seconds of a request to the data transport service.
pub(crate) const DEFAULT_ROLLUP_CLIENT_TIMEOUT_SECS: u64 = 10;

/// The default url of the database. The local chain of the node is held in memory, so the progress
/// marker is kept in memory too unless a persistent chain backs the node.
pub(crate) const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

/// The default interval in milliseconds between two polls of the data transport service.
pub(crate) const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// The default max retries of a call to the data transport service.
pub(crate) const DEFAULT_REMOTE_MAX_RETRIES: usize = 3;

/// The default initial backoff in milliseconds of a call to the data transport service.
pub(crate) const DEFAULT_REMOTE_INITIAL_BACKOFF_MS: u64 = 100;

/// The default gas limit of a rollup block.
pub(crate) const DEFAULT_MAX_ROLLUP_BLOCK_GAS: u64 = 9_000_000;

/// The default max number of transitions of a rollup block.
pub(crate) const DEFAULT_MAX_ROLLUP_BLOCK_TRANSACTIONS: usize = 100;

/// The default max age in seconds of a rollup block.
pub(crate) const DEFAULT_MAX_ROLLUP_BLOCK_TIME_SECS: u64 = 60;

/// The default gas accounted to every transition on top of its execution gas.
pub(crate) const DEFAULT_TRANSITION_GAS_BUFFER: u64 = 10_000;

/// The default max number of in-flight batch submissions.
pub(crate) const DEFAULT_MAX_INFLIGHT_SUBMISSIONS: usize = 4;

/// The default interval in milliseconds of the block builder timer.
pub(crate) const DEFAULT_BUILDER_TIMER_INTERVAL_MS: u64 = 1000;

/// The default gas limit accepted by the transaction validator, the largest value of the 2 bytes
/// `gasLimit` field of a compressed batch transaction.
pub(crate) const DEFAULT_MAX_TRANSACTION_GAS_LIMIT: u64 = u16::MAX as u64;

/// The default max size of the data of a transaction accepted by the validator.
pub(crate) const DEFAULT_MAX_TRANSACTION_DATA_SIZE: usize = 128 * 1024;

/// The interval at which the node checks its components are still running.
pub(crate) const COMPONENT_CHECK_INTERVAL_MS: u64 = 500;
