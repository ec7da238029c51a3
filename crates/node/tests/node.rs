//! Tests for the wiring of the rollup sync node against a mocked data transport service.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use alloy_primitives::{Address, Signature, TxKind, U256};
use rollup_sync_node::{
    commands, BlockBuilderArgs, DatabaseArgs, RollupClientArgs, RollupSyncNode,
    RollupSyncNodeConfig, SubmitterArgs, SyncServiceArgs, ValidatorArgs,
};
use rollup_sync_primitives::{
    L2Transaction, QueueOrigin, SignatureHashType, TransactionMeta, TxLegacy,
};
use rollup_sync_providers::test_utils::{init_test_tracing, MockRollupClient};
use rollup_sync_service::{NodeRole, SyncServiceError};
use tokio::time::{sleep, timeout, Instant};

const TIMEOUT: Duration = Duration::from_secs(5);

fn config(role: NodeRole, output_dir: Option<PathBuf>) -> RollupSyncNodeConfig {
    RollupSyncNodeConfig {
        sync_args: SyncServiceArgs {
            role,
            poll_interval: 10,
            max_retries: 0,
            ..Default::default()
        },
        builder_args: BlockBuilderArgs {
            max_transactions: 1,
            timer_interval: 10,
            ..Default::default()
        },
        rollup_client_args: RollupClientArgs::default(),
        database_args: DatabaseArgs::default(),
        validator_args: ValidatorArgs::default(),
        submitter_args: SubmitterArgs { output_dir },
    }
}

fn sequencer_transaction(nonce: u64, origin: QueueOrigin) -> L2Transaction {
    let mut meta = TransactionMeta::new(0, 0, None, SignatureHashType::Eip155, origin);
    let signature = match origin {
        QueueOrigin::Sequencer => {
            Some(Signature::new(U256::from(1), U256::from(nonce + 1), false))
        }
        QueueOrigin::L1ToL2 => {
            meta.l1_message_sender = Some(Address::repeat_byte(0xaa));
            meta.queue_index = Some(nonce);
            None
        }
    };
    let tx = TxLegacy {
        nonce,
        gas_limit: 21_000,
        to: TxKind::Call(Address::repeat_byte(0x11)),
        ..Default::default()
    };
    L2Transaction::new(tx, signature, meta)
}

/// Returns a fresh directory under the system temporary directory.
async fn output_dir(name: &str) -> eyre::Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("rollup-sync-{name}-{}", std::process::id()));
    let _ = tokio::fs::remove_dir_all(&dir).await;
    tokio::fs::create_dir_all(&dir).await?;
    Ok(dir)
}

/// Waits until the batch file starting at `start` is written and returns its content.
async fn wait_for_batch(dir: &Path, start: u64) -> eyre::Result<String> {
    let path = dir.join(format!("batch-{start:012}.hex"));
    let deadline = Instant::now() + TIMEOUT;
    loop {
        if let Ok(content) = tokio::fs::read_to_string(&path).await {
            if !content.is_empty() {
                return Ok(content)
            }
        }
        if Instant::now() > deadline {
            eyre::bail!("batch {start} was not written")
        }
        sleep(Duration::from_millis(10)).await;
    }
}

async fn wait_until<F: Fn() -> bool>(condition: F) -> eyre::Result<()> {
    timeout(TIMEOUT, async {
        while !condition() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await?;
    Ok(())
}

#[tokio::test]
async fn test_verifier_replays_remote_chain() -> eyre::Result<()> {
    init_test_tracing();
    let client = MockRollupClient::default();
    for index in 0..3 {
        let mut tx = sequencer_transaction(index, QueueOrigin::Sequencer);
        tx.meta.index = Some(index);
        client.add_transaction(tx);
    }

    let node =
        RollupSyncNode::launch_with_client(config(NodeRole::Verifier, None), client).await?;
    wait_until(|| node.chain().height() == 3).await?;
    assert_eq!(node.sync_handle().cursor().index, Some(2));

    node.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn test_sequencer_batches_queue_and_rpc_transactions() -> eyre::Result<()> {
    init_test_tracing();
    let dir = output_dir("sequencer").await?;
    let client = MockRollupClient::default();
    client.add_enqueue(sequencer_transaction(0, QueueOrigin::L1ToL2));

    let node = RollupSyncNode::launch_with_client(
        config(NodeRole::Sequencer, Some(dir.clone())),
        client,
    )
    .await?;

    // the enqueue is applied at index 0 and batched on its own.
    let first = commands::decode_batch(&wait_for_batch(&dir, 0).await?)?;
    assert_eq!(first.should_start_at_batch, 0);
    assert_eq!(first.contexts[0].num_subsequent_queue_transactions, 1);

    wait_until(|| !node.service().is_syncing()).await?;
    let applied = node
        .service()
        .validate_and_apply_sequencer_transaction(sequencer_transaction(1, QueueOrigin::Sequencer))
        .await?;
    assert_eq!(applied.index(), Some(1));

    let second = commands::decode_batch(&wait_for_batch(&dir, 1).await?)?;
    assert_eq!(second.should_start_at_batch, 1);
    assert_eq!(second.contexts[0].num_sequenced_transactions, 1);

    node.shutdown().await?;
    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}

#[tokio::test]
async fn test_sequencer_rejects_transactions_the_batch_cannot_carry() -> eyre::Result<()> {
    init_test_tracing();
    let dir = output_dir("unencodable").await?;
    let node = RollupSyncNode::launch_with_client(
        config(NodeRole::Sequencer, Some(dir.clone())),
        MockRollupClient::default(),
    )
    .await?;
    wait_until(|| !node.service().is_syncing()).await?;

    let mut high_gas = sequencer_transaction(0, QueueOrigin::Sequencer);
    high_gas.tx.gas_limit = 100_000;
    let mut fractional_price = sequencer_transaction(0, QueueOrigin::Sequencer);
    fractional_price.tx.gas_price = 1_500_000_000;
    for tx in [high_gas, fractional_price] {
        let err = node.service().validate_and_apply_sequencer_transaction(tx).await.unwrap_err();
        assert!(matches!(err, SyncServiceError::Rejected(_)));
    }
    assert_eq!(node.chain().height(), 0);

    // the next valid transaction still takes the first index and is batched.
    let applied = node
        .service()
        .validate_and_apply_sequencer_transaction(sequencer_transaction(0, QueueOrigin::Sequencer))
        .await?;
    assert_eq!(applied.index(), Some(0));
    let batch = commands::decode_batch(&wait_for_batch(&dir, 0).await?)?;
    assert_eq!(batch.contexts[0].num_sequenced_transactions, 1);

    node.shutdown().await?;
    let _ = tokio::fs::remove_dir_all(&dir).await;
    Ok(())
}

#[tokio::test]
async fn test_verifier_rejects_rpc_transactions() -> eyre::Result<()> {
    init_test_tracing();
    let node = RollupSyncNode::launch_with_client(
        config(NodeRole::Verifier, None),
        MockRollupClient::default(),
    )
    .await?;

    let err = node
        .service()
        .validate_and_apply_sequencer_transaction(sequencer_transaction(0, QueueOrigin::Sequencer))
        .await
        .unwrap_err();
    assert!(matches!(err, SyncServiceError::NotSequencer));

    node.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn test_launch_fails_on_startup_error() {
    init_test_tracing();
    let mut config = config(NodeRole::Sequencer, None);
    config.sync_args.initial_reorg_depth = 5;

    let res = RollupSyncNode::launch_with_client(config, MockRollupClient::default()).await;
    assert!(res.is_err());
}

#[tokio::test]
async fn test_run_until_signal() -> eyre::Result<()> {
    init_test_tracing();
    let node = RollupSyncNode::launch_with_client(
        config(NodeRole::Verifier, None),
        MockRollupClient::default(),
    )
    .await?;

    timeout(TIMEOUT, node.run_until(sleep(Duration::from_millis(50)))).await??;
    Ok(())
}
