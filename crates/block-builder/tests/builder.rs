//! Tests for the block builder against the in-memory chain and an in-memory database.

use std::{sync::Arc, time::Duration};

use alloy_primitives::{Address, TxKind, U256};
use rollup_sync_block_builder::{BlockBuilder, BlockBuilderConfig, BlockBuilderError};
use rollup_sync_db::{test_utils::setup_test_db, Database, DatabaseOperations};
use rollup_sync_primitives::{
    L2Block, L2Transaction, QueueOrigin, RollupBlock, SignatureHashType, TransactionMeta,
    Transition, TxLegacy,
};
use rollup_sync_providers::test_utils::{
    init_test_tracing, ChannelSubmitter, InMemoryChain, DEFAULT_BLOCK_GAS_USED,
};
use tokio::{
    sync::mpsc::{self, error::TryRecvError},
    time::timeout,
};
use tokio_stream::wrappers::UnboundedReceiverStream;

const TIMEOUT: Duration = Duration::from_secs(5);
const BUFFER: u64 = 1_000;

fn config(max_gas: u64, max_transactions: usize) -> BlockBuilderConfig {
    BlockBuilderConfig {
        max_rollup_block_gas: max_gas,
        max_rollup_block_transactions: max_transactions,
        max_rollup_block_time: Duration::from_secs(3600),
        transition_gas_buffer: BUFFER,
        max_inflight_submissions: 2,
        timer_interval: Duration::from_millis(10),
    }
}

fn transaction(index: u64) -> L2Transaction {
    let mut meta = TransactionMeta::new(
        10,
        120,
        None,
        SignatureHashType::Eip155,
        QueueOrigin::Sequencer,
    );
    meta.index = Some(index);
    let tx = TxLegacy {
        nonce: index,
        gas_limit: 21_000,
        to: TxKind::Call(Address::repeat_byte(0x11)),
        value: U256::from(index),
        ..Default::default()
    };
    L2Transaction::new(tx, None, meta)
}

fn transitions(blocks: &[L2Block]) -> Vec<Transition> {
    blocks
        .iter()
        .map(|block| Transition::new(block.transactions[0].clone(), block.state_root))
        .collect()
}

struct TestContext {
    chain: Arc<InMemoryChain>,
    database: Arc<Database>,
    blocks: mpsc::UnboundedSender<L2Block>,
    submitted: mpsc::UnboundedReceiver<RollupBlock>,
    stream: Option<UnboundedReceiverStream<L2Block>>,
    submitter: Option<ChannelSubmitter>,
}

impl TestContext {
    async fn new() -> Self {
        init_test_tracing();
        let (blocks, rx) = mpsc::unbounded_channel();
        let (submitter, submitted) = ChannelSubmitter::new();
        Self {
            chain: Arc::new(InMemoryChain::new()),
            database: Arc::new(setup_test_db().await),
            blocks,
            submitted,
            stream: Some(UnboundedReceiverStream::new(rx)),
            submitter: Some(submitter),
        }
    }

    fn builder(
        &mut self,
        config: BlockBuilderConfig,
    ) -> eyre::Result<(
        BlockBuilder<Arc<InMemoryChain>, ChannelSubmitter, Arc<Database>>,
        UnboundedReceiverStream<L2Block>,
    )> {
        let submitter = self.submitter.take().ok_or_else(|| eyre::eyre!("builder already built"))?;
        let stream = self.stream.take().ok_or_else(|| eyre::eyre!("builder already built"))?;
        let builder =
            BlockBuilder::new(config, self.chain.clone(), submitter, self.database.clone());
        Ok((builder, stream))
    }

    /// Seals blocks holding the transactions at the indices, without feeding them to the builder.
    fn seal(&self, indices: std::ops::Range<u64>) -> Vec<L2Block> {
        indices
            .map(|index| self.chain.push_transaction(transaction(index), DEFAULT_BLOCK_GAS_USED))
            .collect()
    }

    /// Seals a new block holding the transaction and feeds it to the builder.
    fn produce(&self, tx: L2Transaction) -> eyre::Result<L2Block> {
        let block = self.chain.push_transaction(tx, DEFAULT_BLOCK_GAS_USED);
        self.blocks.send(block.clone())?;
        Ok(block)
    }

    async fn next_submission(&mut self) -> eyre::Result<RollupBlock> {
        timeout(TIMEOUT, self.submitted.recv())
            .await?
            .ok_or_else(|| eyre::eyre!("submitter channel closed"))
    }
}

#[tokio::test]
async fn test_single_transaction_rollup_blocks() -> eyre::Result<()> {
    let mut ctx = TestContext::new().await;
    let (builder, stream) = ctx.builder(config(1_000_000, 1))?;
    let handle = builder.spawn(stream).await?;

    let block = ctx.produce(transaction(0))?;
    let submitted = ctx.next_submission().await?;
    assert_eq!(submitted.transitions, transitions(&[block]));
    assert_eq!(ctx.database.get_last_processed_block_number().await?, Some(1));

    assert!(timeout(Duration::from_millis(100), ctx.submitted.recv()).await.is_err());
    handle.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn test_rollup_block_submitted_when_gas_limit_reached() -> eyre::Result<()> {
    let mut ctx = TestContext::new().await;
    let (builder, stream) = ctx.builder(config(DEFAULT_BLOCK_GAS_USED + BUFFER, 100))?;
    let handle = builder.spawn(stream).await?;

    let block = ctx.produce(transaction(0))?;
    let submitted = ctx.next_submission().await?;
    assert_eq!(submitted.transitions, transitions(&[block]));

    handle.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn test_rollup_block_split_on_gas_limit() -> eyre::Result<()> {
    let mut ctx = TestContext::new().await;
    // two blocks fit, and the remaining gas still exceeds the buffer.
    let block_gas = DEFAULT_BLOCK_GAS_USED + BUFFER;
    let (builder, stream) = ctx.builder(config(2 * block_gas + block_gas / 2, 100))?;
    let handle = builder.spawn(stream).await?;

    let mut blocks = Vec::new();
    for index in 0..5 {
        blocks.push(ctx.produce(transaction(index))?);
    }

    // every third block does not fit and finalizes the rollup block before it.
    assert_eq!(ctx.next_submission().await?.transitions, transitions(&blocks[..2]));
    assert_eq!(ctx.next_submission().await?.transitions, transitions(&blocks[2..4]));
    assert!(timeout(Duration::from_millis(100), ctx.submitted.recv()).await.is_err());

    handle.shutdown().await?;
    assert_eq!(ctx.database.get_last_processed_block_number().await?, Some(4));
    Ok(())
}

#[tokio::test]
async fn test_block_above_gas_limit_is_never_submitted() -> eyre::Result<()> {
    let mut ctx = TestContext::new().await;
    let (builder, stream) = ctx.builder(config(DEFAULT_BLOCK_GAS_USED + BUFFER - 1, 100))?;
    let handle = builder.spawn(stream).await?;

    ctx.produce(transaction(0))?;
    let submission = timeout(Duration::from_millis(200), ctx.submitted.recv()).await;
    assert!(!matches!(submission, Ok(Some(_))));

    let err = timeout(TIMEOUT, handle.join()).await?.unwrap_err();
    assert!(matches!(err, BlockBuilderError::BlockExceedsGasLimit { number: 1, .. }));
    assert_eq!(ctx.database.get_last_processed_block_number().await?, None);
    Ok(())
}

#[tokio::test]
async fn test_rollup_block_split_on_transaction_limit() -> eyre::Result<()> {
    let mut ctx = TestContext::new().await;
    let (builder, stream) = ctx.builder(config(1_000_000, 2))?;
    let handle = builder.spawn(stream).await?;

    let mut blocks = Vec::new();
    for index in 0..4 {
        blocks.push(ctx.produce(transaction(index))?);
    }

    assert_eq!(ctx.next_submission().await?.transitions, transitions(&blocks[..2]));
    assert_eq!(ctx.next_submission().await?.transitions, transitions(&blocks[2..]));

    handle.shutdown().await?;
    assert_eq!(ctx.database.get_last_processed_block_number().await?, Some(4));
    Ok(())
}

#[tokio::test]
async fn test_timer_submits_partial_rollup_block() -> eyre::Result<()> {
    let mut ctx = TestContext::new().await;
    let config = BlockBuilderConfig {
        max_rollup_block_time: Duration::from_millis(50),
        ..config(1_000_000, 100)
    };
    let (builder, stream) = ctx.builder(config)?;
    let handle = builder.spawn(stream).await?;

    let blocks = vec![ctx.produce(transaction(0))?, ctx.produce(transaction(1))?];
    let submitted = ctx.next_submission().await?;
    assert_eq!(submitted.transitions, transitions(&blocks));

    handle.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn test_restart_replays_blocks_after_marker() -> eyre::Result<()> {
    let mut ctx = TestContext::new().await;
    let blocks = ctx.seal(0..3);
    ctx.database.set_last_processed_block_number(1).await?;

    let (builder, stream) = ctx.builder(config(1_000_000, 2))?;
    let handle = builder.spawn(stream).await?;

    // the blocks already in the chain may also arrive from the stream.
    for block in &blocks {
        ctx.blocks.send(block.clone())?;
    }

    assert_eq!(ctx.next_submission().await?.transitions, transitions(&blocks[1..]));
    assert!(timeout(Duration::from_millis(100), ctx.submitted.recv()).await.is_err());

    handle.shutdown().await?;
    assert_eq!(ctx.database.get_last_processed_block_number().await?, Some(3));
    Ok(())
}

#[tokio::test]
async fn test_gaps_are_filled_from_chain() -> eyre::Result<()> {
    let mut ctx = TestContext::new().await;
    let (builder, stream) = ctx.builder(config(1_000_000, 3))?;
    let handle = builder.spawn(stream).await?;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let mut blocks = ctx.seal(0..2);
    blocks.push(ctx.produce(transaction(2))?);

    assert_eq!(ctx.next_submission().await?.transitions, transitions(&blocks));

    handle.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn test_shutdown_drops_building_block() -> eyre::Result<()> {
    let mut ctx = TestContext::new().await;
    let (builder, stream) = ctx.builder(config(1_000_000, 10))?;
    let handle = builder.spawn(stream).await?;

    ctx.produce(transaction(0))?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.shutdown().await?;

    assert_eq!(ctx.submitted.try_recv(), Err(TryRecvError::Disconnected));
    assert_eq!(ctx.database.get_last_processed_block_number().await?, None);
    Ok(())
}

#[tokio::test]
async fn test_marker_ahead_of_chain_is_fatal() -> eyre::Result<()> {
    let mut ctx = TestContext::new().await;
    ctx.database.set_last_processed_block_number(5).await?;

    let (builder, stream) = ctx.builder(config(1_000_000, 10))?;
    let err = builder.spawn(stream).await?.join().await.unwrap_err();
    assert!(matches!(err, BlockBuilderError::MarkerAheadOfChain { marker: 5, head: 0 }));
    Ok(())
}
