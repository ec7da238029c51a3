use crate::{constants, CallDataSubmitter, RollupSyncNodeConfig};
use std::{future::Future, sync::Arc, time::Duration};

use eyre::OptionExt;
use rollup_sync_block_builder::{BlockBuilder, BlockBuilderHandle};
use rollup_sync_db::Database;
use rollup_sync_migration::{Migrator, MigratorTrait};
use rollup_sync_providers::{
    BasicTransactionValidator, HttpRollupClient, InMemoryChain, RollupClient,
};
use rollup_sync_service::{SyncService, SyncServiceHandle};
use tokio::task::JoinHandle;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

/// The sync service as wired by the node.
pub type NodeSyncService<C> = SyncService<C, Arc<InMemoryChain>, BasicTransactionValidator>;

/// A running rollup sync node: the sync service feeding the local chain and, in the sequencer
/// role, the block builder batching the local chain.
#[derive(Debug)]
pub struct RollupSyncNode<C> {
    service: NodeSyncService<C>,
    sync: SyncServiceHandle,
    executor: JoinHandle<()>,
    builder: Option<BlockBuilderHandle>,
    chain: Arc<InMemoryChain>,
}

impl RollupSyncNode<HttpRollupClient> {
    /// Launches the node against the data transport service configured in the arguments.
    pub async fn launch(config: RollupSyncNodeConfig) -> eyre::Result<Self> {
        config.validate().map_err(eyre::Report::msg)?;
        let client = config.rollup_client_args.client()?;
        Self::launch_with_client(config, client).await
    }
}

impl<C: RollupClient + 'static> RollupSyncNode<C> {
    /// Launches the node against the provided data transport service client.
    pub async fn launch_with_client(config: RollupSyncNodeConfig, client: C) -> eyre::Result<Self> {
        tracing::info!(target: "rollup_sync::node", ?config, "Launching rollup sync node");

        let database_url = config.database_args.database_url();
        let database = Arc::new(Database::new(&database_url).await?);
        Migrator::up(database.connection(), None).await?;

        let chain = Arc::new(InMemoryChain::new());
        let service = SyncService::new(
            config.sync_args.config(),
            client,
            chain.clone(),
            config.validator_args.validator(),
        );
        let feed = service.subscribe_new_transactions().ok_or_eyre("transaction feed closed")?;
        let executor = chain.spawn_executor(feed);

        // the builder subscribes to the chain before the sync service starts feeding it.
        let builder = if config.sync_args.role.is_sequencer() {
            let blocks = BroadcastStream::new(chain.subscribe_new_blocks()).filter_map(Result::ok);
            let submitter = CallDataSubmitter::new(config.submitter_args.output_dir.clone());
            let builder =
                BlockBuilder::new(config.builder_args.config(), chain.clone(), submitter, database);
            Some(builder.spawn(blocks).await?)
        } else {
            None
        };

        let sync = match service.clone().spawn().await {
            Ok(sync) => sync,
            Err(err) => {
                if let Some(builder) = builder {
                    builder.shutdown().await?;
                }
                return Err(err.into())
            }
        };

        Ok(Self { service, sync, executor, builder, chain })
    }

    /// Returns the sync service, through which the sequencer admits new transactions.
    pub const fn service(&self) -> &NodeSyncService<C> {
        &self.service
    }

    /// Returns the handle of the running sync service.
    pub const fn sync_handle(&self) -> &SyncServiceHandle {
        &self.sync
    }

    /// Returns the local chain.
    pub const fn chain(&self) -> &Arc<InMemoryChain> {
        &self.chain
    }

    /// Returns true if any component of the node exited.
    pub fn is_finished(&self) -> bool {
        self.sync.is_finished() ||
            self.executor.is_finished() ||
            self.builder.as_ref().is_some_and(BlockBuilderHandle::is_finished)
    }

    /// Runs the node until the signal resolves or one of its components exits, then shuts it
    /// down.
    pub async fn run_until<F: Future<Output = ()>>(self, signal: F) -> eyre::Result<()> {
        tokio::pin!(signal);
        let mut check =
            tokio::time::interval(Duration::from_millis(constants::COMPONENT_CHECK_INTERVAL_MS));

        loop {
            tokio::select! {
                _ = &mut signal => {
                    tracing::info!(target: "rollup_sync::node", "Received shutdown signal");
                    break
                }
                _ = check.tick() => {
                    if self.is_finished() {
                        tracing::warn!(target: "rollup_sync::node", "Node component exited");
                        break
                    }
                }
            }
        }

        self.shutdown().await
    }

    /// Stops the sync service, which closes the feed of the local chain, then shuts down the
    /// block builder.
    pub async fn shutdown(self) -> eyre::Result<()> {
        self.sync.stop();
        let sync = self.sync.join().await;
        let executor = self.executor.await;
        let builder = match self.builder {
            Some(builder) => builder.shutdown().await,
            None => Ok(()),
        };

        sync?;
        executor?;
        builder?;
        tracing::info!(target: "rollup_sync::node", "Rollup sync node stopped");
        Ok(())
    }
}
