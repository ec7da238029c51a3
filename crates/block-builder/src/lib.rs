//! The block builder aggregates the single transaction blocks of the local chain into rollup
//! blocks bounded in gas, transaction count and age, and hands them to the batch submitter.
//!
//! The number of the last block of every finalized rollup block is persisted before the rollup
//! block is submitted. On restart the blocks after the marker are replayed from the local chain, so
//! no block is batched twice. A crash between the persistence of the marker and the end of the
//! submission loses that rollup block: the submitter is not re-driven.

pub use building::BuildingBlock;
mod building;

pub use config::BlockBuilderConfig;
mod config;

pub use error::BlockBuilderError;
mod error;

pub use handle::BlockBuilderHandle;
mod handle;

mod metrics;
use metrics::BlockBuilderMetrics;

use std::sync::Arc;

use futures::{Stream, StreamExt};
use rollup_sync_db::{DatabaseOperations, KeyValueStore};
use rollup_sync_primitives::{L2Block, L2Transaction, Transition};
use rollup_sync_providers::{BatchSubmitter, L2ChainProvider, ProviderError};
use tokio::{
    sync::Semaphore,
    task::JoinSet,
    time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

/// The block builder.
#[derive(Debug)]
pub struct BlockBuilder<P, S, D> {
    /// The configuration of the builder.
    config: BlockBuilderConfig,
    /// The local chain.
    chain: P,
    /// The batch submitter.
    submitter: Arc<S>,
    /// The store of the progress marker.
    database: D,
    /// Bounds the number of in-flight submissions.
    submission_slots: Arc<Semaphore>,
    /// The metrics of the builder.
    metrics: BlockBuilderMetrics,
}

/// The state of the builder loop.
#[derive(Debug)]
struct BuilderState {
    /// The rollup block being accumulated.
    building: BuildingBlock,
    /// The number of the last block added to a rollup block.
    last_block_number: u64,
    /// The time of the last finalization.
    last_submission: Instant,
    /// The in-flight submissions.
    submissions: JoinSet<()>,
}

impl BuilderState {
    fn new(last_block_number: u64) -> Self {
        Self {
            building: BuildingBlock::default(),
            last_block_number,
            last_submission: Instant::now(),
            submissions: JoinSet::new(),
        }
    }
}

impl<P, S, D> BlockBuilder<P, S, D>
where
    P: L2ChainProvider + 'static,
    S: BatchSubmitter + 'static,
    D: KeyValueStore + 'static,
{
    /// Returns a new [`BlockBuilder`].
    pub fn new(config: BlockBuilderConfig, chain: P, submitter: S, database: D) -> Self {
        Self {
            submission_slots: Arc::new(Semaphore::new(config.max_inflight_submissions.max(1))),
            config,
            chain,
            submitter: Arc::new(submitter),
            database,
            metrics: BlockBuilderMetrics::default(),
        }
    }

    /// Spawns the builder loop, which first replays the blocks of the local chain after the
    /// persisted marker and then consumes the provided stream of new blocks.
    pub async fn spawn<St>(self, blocks: St) -> Result<BlockBuilderHandle, BlockBuilderError>
    where
        St: Stream<Item = L2Block> + Send + Unpin + 'static,
    {
        let last_processed = self.database.get_last_processed_block_number().await?;
        let cancellation = CancellationToken::new();
        let last_processed = last_processed.unwrap_or_default();
        let task = tokio::spawn(self.run(blocks, last_processed, cancellation.clone()));
        Ok(BlockBuilderHandle::new(cancellation, task))
    }

    async fn run<St>(
        self,
        mut blocks: St,
        last_processed: u64,
        cancellation: CancellationToken,
    ) -> Result<(), BlockBuilderError>
    where
        St: Stream<Item = L2Block> + Send + Unpin + 'static,
    {
        tracing::info!(target: "rollup_sync::builder", last_processed, "Starting block builder");
        let mut state = BuilderState::new(last_processed);

        let result = self.build(&mut blocks, &mut state, &cancellation).await;
        if let Err(err) = &result {
            tracing::error!(target: "rollup_sync::builder", ?err, "Block builder failed");
        }

        if !state.building.is_empty() {
            tracing::info!(
                target: "rollup_sync::builder",
                first = state.building.first_block_number,
                last = state.building.last_block_number,
                "Dropping building block"
            );
        }
        while let Some(res) = state.submissions.join_next().await {
            if let Err(err) = res {
                tracing::warn!(target: "rollup_sync::builder", ?err, "Submission task failed");
            }
        }

        result
    }

    async fn build<St>(
        &self,
        blocks: &mut St,
        state: &mut BuilderState,
        cancellation: &CancellationToken,
    ) -> Result<(), BlockBuilderError>
    where
        St: Stream<Item = L2Block> + Unpin,
    {
        let head = self.chain.current_block().await?.number;
        if head < state.last_block_number {
            return Err(BlockBuilderError::MarkerAheadOfChain {
                marker: state.last_block_number,
                head,
            })
        }
        if head > state.last_block_number {
            tracing::info!(target: "rollup_sync::builder", from = state.last_block_number + 1, to = head, "Replaying local blocks");
        }
        for number in state.last_block_number + 1..=head {
            if cancellation.is_cancelled() {
                return Ok(())
            }
            let block = self.block_by_number(number).await?;
            self.handle_block(state, block).await?;
        }

        let mut timer = tokio::time::interval(self.config.timer_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = cancellation.cancelled() => return Ok(()),
                Some(res) = state.submissions.join_next(), if !state.submissions.is_empty() => {
                    if let Err(err) = res {
                        tracing::warn!(target: "rollup_sync::builder", ?err, "Submission task failed");
                    }
                }
                block = blocks.next() => {
                    let Some(block) = block else {
                        tracing::info!(target: "rollup_sync::builder", "Block stream closed");
                        return Ok(())
                    };
                    self.on_new_block(state, block).await?;
                }
                _ = timer.tick() => self.on_tick(state).await?,
            }
        }
    }

    /// Handles a block from the stream, filling any gap from the local chain.
    async fn on_new_block(
        &self,
        state: &mut BuilderState,
        block: L2Block,
    ) -> Result<(), BlockBuilderError> {
        if block.number <= state.last_block_number {
            self.metrics.duplicate_blocks.increment(1);
            tracing::trace!(target: "rollup_sync::builder", number = block.number, "Ignoring duplicate block");
            return Ok(())
        }

        for number in state.last_block_number + 1..block.number {
            tracing::debug!(target: "rollup_sync::builder", number, "Filling gap from local chain");
            let missing = self.block_by_number(number).await?;
            self.handle_block(state, missing).await?;
        }
        self.handle_block(state, block).await
    }

    /// Finalizes the building block once it exceeds its maximum age.
    async fn on_tick(&self, state: &mut BuilderState) -> Result<(), BlockBuilderError> {
        if !state.building.is_empty() &&
            state.last_submission.elapsed() >= self.config.max_rollup_block_time
        {
            tracing::debug!(target: "rollup_sync::builder", "Rollup block time elapsed");
            self.finalize(state).await?;
        }
        Ok(())
    }

    /// Adds the block to the building block, finalizing it first if the block does not fit and
    /// after if no further block can fit.
    async fn handle_block(
        &self,
        state: &mut BuilderState,
        block: L2Block,
    ) -> Result<(), BlockBuilderError> {
        let (number, state_root) = (block.number, block.state_root);
        let count = block.transactions.len();
        let Ok([tx]) = <[L2Transaction; 1]>::try_from(block.transactions) else {
            return Err(BlockBuilderError::UnexpectedTransactionCount { number, count })
        };

        let gas = block.gas_used.saturating_add(self.config.transition_gas_buffer);
        let limit = self.config.max_rollup_block_gas;
        if gas > limit {
            return Err(BlockBuilderError::BlockExceedsGasLimit { number, gas, limit })
        }

        if !state.building.fits(gas, &self.config) {
            self.finalize(state).await?;
        }
        state.building.push(number, Transition::new(tx, state_root), gas);
        state.last_block_number = number;

        if state.building.is_full(&self.config) {
            self.finalize(state).await?;
        }
        Ok(())
    }

    /// Persists the progress marker and submits the building block in the background.
    async fn finalize(&self, state: &mut BuilderState) -> Result<(), BlockBuilderError> {
        if state.building.is_empty() {
            return Ok(())
        }
        let building = std::mem::take(&mut state.building);
        state.last_submission = Instant::now();

        self.database.set_last_processed_block_number(building.last_block_number).await?;
        self.metrics.last_processed_block_number.set(building.last_block_number as f64);
        self.metrics.rollup_block_transitions.record(building.len() as f64);
        self.metrics.rollup_block_gas.record(building.gas_used as f64);

        tracing::info!(
            target: "rollup_sync::builder",
            first = building.first_block_number,
            last = building.last_block_number,
            transitions = building.len(),
            gas = building.gas_used,
            "Submitting rollup block"
        );

        let permit = self
            .submission_slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| BlockBuilderError::SubmissionClosed)?;
        let submitter = self.submitter.clone();
        let metrics = self.metrics.clone();

        state.submissions.spawn(async move {
            let _permit = permit;
            let start = Instant::now();
            match submitter.submit(building.rollup_block).await {
                Ok(()) => metrics.submitted_blocks.increment(1),
                Err(err) => {
                    metrics.submission_failures.increment(1);
                    tracing::error!(
                        target: "rollup_sync::builder",
                        first = building.first_block_number,
                        last = building.last_block_number,
                        ?err,
                        "Rollup block submission failed"
                    );
                }
            }
            metrics.submission_duration.record(start.elapsed().as_secs_f64());
        });
        Ok(())
    }

    async fn block_by_number(&self, number: u64) -> Result<L2Block, BlockBuilderError> {
        Ok(self.chain.block_by_number(number).await?.ok_or(ProviderError::BlockNotFound(number))?)
    }
}
