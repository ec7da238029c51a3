use crate::constants;
use std::{path::PathBuf, time::Duration};

use rollup_sync_block_builder::BlockBuilderConfig;
use rollup_sync_providers::{BasicTransactionValidator, HttpRollupClient, ProviderError};
use rollup_sync_service::{NodeRole, Retry, SyncServiceConfig};

/// A struct that represents the arguments for the rollup sync node.
#[derive(Debug, Clone, clap::Args)]
pub struct RollupSyncNodeConfig {
    /// Sync service args.
    #[command(flatten)]
    pub sync_args: SyncServiceArgs,
    /// Block builder args.
    #[command(flatten)]
    pub builder_args: BlockBuilderArgs,
    /// The data transport service arguments.
    #[command(flatten)]
    pub rollup_client_args: RollupClientArgs,
    /// Database args.
    #[command(flatten)]
    pub database_args: DatabaseArgs,
    /// Transaction validator args.
    #[command(flatten)]
    pub validator_args: ValidatorArgs,
    /// Batch submitter args.
    #[command(flatten)]
    pub submitter_args: SubmitterArgs,
}

impl RollupSyncNodeConfig {
    /// Validates the combination of the arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.sync_args.poll_interval == 0 {
            return Err("Poll interval must be greater than zero".to_string());
        }

        let builder = &self.builder_args;
        if builder.max_transactions == 0 {
            return Err("Rollup blocks must hold at least one transaction".to_string());
        }
        if builder.max_inflight_submissions == 0 {
            return Err("At least one in-flight submission is required".to_string());
        }
        if builder.timer_interval == 0 {
            return Err("Builder timer interval must be greater than zero".to_string());
        }
        if builder.transition_gas_buffer >= builder.max_gas {
            return Err(format!(
                "Transition gas buffer {} must be lower than the rollup block gas limit {}",
                builder.transition_gas_buffer, builder.max_gas
            ));
        }

        if self.validator_args.max_gas_limit == 0 {
            return Err("Transaction gas limit must be greater than zero".to_string());
        }

        Ok(())
    }
}

/// The arguments of the sync service.
#[derive(Debug, Clone, clap::Args)]
pub struct SyncServiceArgs {
    /// The role of the node: "verifier" or "sequencer".
    #[arg(long = "sync.role", id = "sync_role", value_name = "ROLE", env = "ROLLUP_SYNC_ROLE", default_value_t = NodeRole::Verifier)]
    pub role: NodeRole,
    /// The number of blocks the local chain is rolled back by at startup.
    #[arg(long = "sync.initial-reorg-depth", id = "sync_initial_reorg_depth", value_name = "DEPTH", env = "ROLLUP_SYNC_INITIAL_REORG_DEPTH", default_value_t = 0)]
    pub initial_reorg_depth: u64,
    /// The L1 height at which the canonical transaction chain was deployed.
    #[arg(long = "sync.ctc-deploy-height", id = "sync_ctc_deploy_height", value_name = "HEIGHT", env = "ROLLUP_SYNC_CTC_DEPLOY_HEIGHT", default_value_t = 0)]
    pub ctc_deploy_height: u64,
    /// The interval between two polls of the data transport service (milliseconds).
    #[arg(long = "sync.poll-interval", id = "sync_poll_interval", value_name = "MILLIS", env = "ROLLUP_SYNC_POLL_INTERVAL", default_value_t = constants::DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval: u64,
    /// The max retries of a call to the data transport service.
    #[arg(long = "sync.max-retries", id = "sync_max_retries", value_name = "RETRIES", env = "ROLLUP_SYNC_MAX_RETRIES", default_value_t = constants::DEFAULT_REMOTE_MAX_RETRIES)]
    pub max_retries: usize,
    /// The initial backoff of a call to the data transport service (milliseconds).
    #[arg(long = "sync.initial-backoff", id = "sync_initial_backoff", value_name = "MILLIS", env = "ROLLUP_SYNC_INITIAL_BACKOFF", default_value_t = constants::DEFAULT_REMOTE_INITIAL_BACKOFF_MS)]
    pub initial_backoff: u64,
}

impl Default for SyncServiceArgs {
    fn default() -> Self {
        Self {
            role: NodeRole::Verifier,
            initial_reorg_depth: 0,
            ctc_deploy_height: 0,
            poll_interval: constants::DEFAULT_POLL_INTERVAL_MS,
            max_retries: constants::DEFAULT_REMOTE_MAX_RETRIES,
            initial_backoff: constants::DEFAULT_REMOTE_INITIAL_BACKOFF_MS,
        }
    }
}

impl SyncServiceArgs {
    /// Returns the [`SyncServiceConfig`] described by the arguments.
    pub fn config(&self) -> SyncServiceConfig {
        SyncServiceConfig {
            role: self.role,
            initial_reorg_depth: self.initial_reorg_depth,
            ctc_deploy_height: self.ctc_deploy_height,
            poll_interval: Duration::from_millis(self.poll_interval),
            remote_retry: Retry::new(Some(self.max_retries), self.initial_backoff, true),
            ..Default::default()
        }
    }
}

/// The arguments of the block builder.
#[derive(Debug, Clone, clap::Args)]
pub struct BlockBuilderArgs {
    /// The gas limit of a rollup block.
    #[arg(long = "builder.max-gas", id = "builder_max_gas", value_name = "GAS", env = "ROLLUP_SYNC_BUILDER_MAX_GAS", default_value_t = constants::DEFAULT_MAX_ROLLUP_BLOCK_GAS)]
    pub max_gas: u64,
    /// The max number of transitions of a rollup block.
    #[arg(long = "builder.max-transactions", id = "builder_max_transactions", value_name = "COUNT", env = "ROLLUP_SYNC_BUILDER_MAX_TRANSACTIONS", default_value_t = constants::DEFAULT_MAX_ROLLUP_BLOCK_TRANSACTIONS)]
    pub max_transactions: usize,
    /// The max age of a rollup block (seconds).
    #[arg(long = "builder.max-time", id = "builder_max_time", value_name = "SECONDS", env = "ROLLUP_SYNC_BUILDER_MAX_TIME", default_value_t = constants::DEFAULT_MAX_ROLLUP_BLOCK_TIME_SECS)]
    pub max_time: u64,
    /// The gas accounted to every transition on top of its execution gas.
    #[arg(long = "builder.transition-gas-buffer", id = "builder_transition_gas_buffer", value_name = "GAS", env = "ROLLUP_SYNC_BUILDER_TRANSITION_GAS_BUFFER", default_value_t = constants::DEFAULT_TRANSITION_GAS_BUFFER)]
    pub transition_gas_buffer: u64,
    /// The max number of in-flight batch submissions.
    #[arg(long = "builder.max-inflight-submissions", id = "builder_max_inflight_submissions", value_name = "COUNT", env = "ROLLUP_SYNC_BUILDER_MAX_INFLIGHT_SUBMISSIONS", default_value_t = constants::DEFAULT_MAX_INFLIGHT_SUBMISSIONS)]
    pub max_inflight_submissions: usize,
    /// The interval of the builder timer (milliseconds).
    #[arg(long = "builder.timer-interval", id = "builder_timer_interval", value_name = "MILLIS", env = "ROLLUP_SYNC_BUILDER_TIMER_INTERVAL", default_value_t = constants::DEFAULT_BUILDER_TIMER_INTERVAL_MS)]
    pub timer_interval: u64,
}

impl Default for BlockBuilderArgs {
    fn default() -> Self {
        Self {
            max_gas: constants::DEFAULT_MAX_ROLLUP_BLOCK_GAS,
            max_transactions: constants::DEFAULT_MAX_ROLLUP_BLOCK_TRANSACTIONS,
            max_time: constants::DEFAULT_MAX_ROLLUP_BLOCK_TIME_SECS,
            transition_gas_buffer: constants::DEFAULT_TRANSITION_GAS_BUFFER,
            max_inflight_submissions: constants::DEFAULT_MAX_INFLIGHT_SUBMISSIONS,
            timer_interval: constants::DEFAULT_BUILDER_TIMER_INTERVAL_MS,
        }
    }
}

impl BlockBuilderArgs {
    /// Returns the [`BlockBuilderConfig`] described by the arguments.
    pub const fn config(&self) -> BlockBuilderConfig {
        BlockBuilderConfig {
            max_rollup_block_gas: self.max_gas,
            max_rollup_block_transactions: self.max_transactions,
            max_rollup_block_time: Duration::from_secs(self.max_time),
            transition_gas_buffer: self.transition_gas_buffer,
            max_inflight_submissions: self.max_inflight_submissions,
            timer_interval: Duration::from_millis(self.timer_interval),
        }
    }
}

/// The arguments of the data transport service client.
#[derive(Debug, Clone, clap::Args)]
pub struct RollupClientArgs {
    /// The url of the data transport service.
    #[arg(long = "rollup-client.url", id = "rollup_client_url", value_name = "URL", env = "ROLLUP_SYNC_ROLLUP_CLIENT_URL", default_value = constants::DEFAULT_ROLLUP_CLIENT_URL)]
    pub url: String,
    /// The timeout of a request to the data transport service (seconds).
    #[arg(long = "rollup-client.timeout", id = "rollup_client_timeout", value_name = "SECONDS", env = "ROLLUP_SYNC_ROLLUP_CLIENT_TIMEOUT", default_value_t = constants::DEFAULT_ROLLUP_CLIENT_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl Default for RollupClientArgs {
    fn default() -> Self {
        Self {
            url: constants::DEFAULT_ROLLUP_CLIENT_URL.to_string(),
            timeout: constants::DEFAULT_ROLLUP_CLIENT_TIMEOUT_SECS,
        }
    }
}

impl RollupClientArgs {
    /// Returns the HTTP client of the data transport service.
    pub fn client(&self) -> Result<HttpRollupClient, ProviderError> {
        HttpRollupClient::new_http(self.url.clone(), Duration::from_secs(self.timeout))
    }
}

/// The database arguments.
#[derive(Debug, Clone, clap::Args)]
pub struct DatabaseArgs {
    /// Database path. Takes precedence over the database url.
    #[arg(long = "db.path", id = "db_path", value_name = "DB_PATH", env = "ROLLUP_SYNC_DB_PATH")]
    pub path: Option<PathBuf>,
    /// Database url.
    #[arg(long = "db.url", id = "db_url", value_name = "DB_URL", env = "ROLLUP_SYNC_DB_URL", default_value = constants::DEFAULT_DATABASE_URL)]
    pub url: String,
}

impl Default for DatabaseArgs {
    fn default() -> Self {
        Self { path: None, url: constants::DEFAULT_DATABASE_URL.to_string() }
    }
}

impl DatabaseArgs {
    /// Returns the url of the database.
    pub fn database_url(&self) -> String {
        match &self.path {
            Some(path) => format!("sqlite://{}?mode=rwc", path.display()),
            None => self.url.clone(),
        }
    }
}

/// The arguments of the transaction validator used in the sequencer role.
#[derive(Debug, Clone, clap::Args)]
pub struct ValidatorArgs {
    /// The max gas limit of an admitted transaction.
    #[arg(long = "validator.max-gas-limit", id = "validator_max_gas_limit", value_name = "GAS", env = "ROLLUP_SYNC_VALIDATOR_MAX_GAS_LIMIT", default_value_t = constants::DEFAULT_MAX_TRANSACTION_GAS_LIMIT)]
    pub max_gas_limit: u64,
    /// The max size of the data of an admitted transaction (bytes).
    #[arg(long = "validator.max-data-size", id = "validator_max_data_size", value_name = "BYTES", env = "ROLLUP_SYNC_VALIDATOR_MAX_DATA_SIZE", default_value_t = constants::DEFAULT_MAX_TRANSACTION_DATA_SIZE)]
    pub max_data_size: usize,
}

impl Default for ValidatorArgs {
    fn default() -> Self {
        Self {
            max_gas_limit: constants::DEFAULT_MAX_TRANSACTION_GAS_LIMIT,
            max_data_size: constants::DEFAULT_MAX_TRANSACTION_DATA_SIZE,
        }
    }
}

impl ValidatorArgs {
    /// Returns the validator described by the arguments.
    pub const fn validator(&self) -> BasicTransactionValidator {
        BasicTransactionValidator::new(self.max_gas_limit, self.max_data_size)
    }
}

/// The arguments of the batch submitter.
#[derive(Debug, Default, Clone, clap::Args)]
pub struct SubmitterArgs {
    /// The directory the encoded batches are written to. Batches are only logged when unset.
    #[arg(long = "submitter.output-dir", id = "submitter_output_dir", value_name = "DIR", env = "ROLLUP_SYNC_SUBMITTER_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        config: RollupSyncNodeConfig,
    }

    fn parse(args: &[&str]) -> RollupSyncNodeConfig {
        Cli::parse_from(std::iter::once("rollup-sync").chain(args.iter().copied())).config
    }

    #[test]
    fn test_parse_dotted_arguments() {
        let config = parse(&[
            "--sync.role",
            "sequencer",
            "--sync.initial-reorg-depth",
            "2",
            "--builder.max-transactions",
            "7",
            "--rollup-client.url",
            "http://dtl:7878",
            "--db.path",
            "/tmp/rollup.db",
        ]);

        assert_eq!(config.sync_args.role, NodeRole::Sequencer);
        assert_eq!(config.sync_args.config().initial_reorg_depth, 2);
        assert_eq!(config.builder_args.config().max_rollup_block_transactions, 7);
        assert_eq!(config.rollup_client_args.url, "http://dtl:7878");
        assert_eq!(config.database_args.database_url(), "sqlite:///tmp/rollup.db?mode=rwc");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let res = Cli::try_parse_from(["rollup-sync", "--sync.role", "proposer"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_validate() {
        let valid = parse(&[]);
        assert!(valid.validate().is_ok());
        assert_eq!(valid.database_args.database_url(), constants::DEFAULT_DATABASE_URL);

        let mut config = valid.clone();
        config.builder_args.transition_gas_buffer = config.builder_args.max_gas;
        assert!(config.validate().is_err());

        let mut config = valid.clone();
        config.builder_args.max_inflight_submissions = 0;
        assert!(config.validate().is_err());

        let mut config = valid;
        config.sync_args.poll_interval = 0;
        assert!(config.validate().is_err());
    }
}
