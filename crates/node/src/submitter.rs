use std::path::PathBuf;

use alloy_primitives::{hex, Bytes};
use rollup_sync_codec::AppendSequencerBatchCallData;
use rollup_sync_primitives::RollupBlock;
use rollup_sync_providers::{BatchSubmitter, ProviderError};

/// A [`BatchSubmitter`] encoding rollup blocks into `appendSequencerBatch` call data. The call
/// data is logged and, if an output directory is configured, written there as a hex file named
/// after the index of its first element.
#[derive(Debug, Clone, Default)]
pub struct CallDataSubmitter {
    output_dir: Option<PathBuf>,
}

impl CallDataSubmitter {
    /// Returns a new [`CallDataSubmitter`].
    pub const fn new(output_dir: Option<PathBuf>) -> Self {
        Self { output_dir }
    }

    /// Returns the index of the first element of the rollup block and its encoded call data.
    pub fn call_data(block: &RollupBlock) -> Result<(u64, Bytes), ProviderError> {
        let start = block
            .transitions
            .first()
            .and_then(|transition| transition.transaction.index())
            .ok_or_else(|| {
                ProviderError::Submission("rollup block has no indexed transition".into())
            })?;
        let call_data = AppendSequencerBatchCallData::from_rollup_block(start, block)
            .and_then(|call_data| call_data.encode())
            .map_err(|err| ProviderError::Submission(err.to_string()))?;
        Ok((start, call_data))
    }
}

#[async_trait::async_trait]
impl BatchSubmitter for CallDataSubmitter {
    async fn submit(&self, block: RollupBlock) -> Result<(), ProviderError> {
        let (start, call_data) = Self::call_data(&block)?;
        tracing::info!(
            target: "rollup_sync::submitter",
            start,
            elements = block.len(),
            size = call_data.len(),
            "Encoded batch"
        );
        tracing::debug!(target: "rollup_sync::submitter", call_data = %call_data, "Batch call data");

        if let Some(dir) = &self.output_dir {
            let path = dir.join(format!("batch-{start:012}.hex"));
            let partial = path.with_extension("partial");
            let write = async {
                tokio::fs::write(&partial, hex::encode_prefixed(&call_data)).await?;
                tokio::fs::rename(&partial, &path).await
            };
            write.await.map_err(|err| ProviderError::Submission(err.to_string()))?;
            tracing::debug!(target: "rollup_sync::submitter", path = %path.display(), "Wrote batch");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Signature, TxKind, U256};
    use rollup_sync_primitives::{
        L2Transaction, QueueOrigin, SignatureHashType, TransactionMeta, Transition, TxLegacy,
    };

    fn transition(index: u64, origin: QueueOrigin) -> Transition {
        let mut meta = TransactionMeta::new(5, 60, None, SignatureHashType::Eip155, origin);
        meta.index = Some(index);
        let signature = (origin == QueueOrigin::Sequencer)
            .then(|| Signature::new(U256::from(1), U256::from(2), false));
        let tx = TxLegacy {
            nonce: index,
            gas_limit: 21_000,
            to: TxKind::Call(Address::repeat_byte(0x42)),
            ..Default::default()
        };
        Transition::new(L2Transaction::new(tx, signature, meta), Default::default())
    }

    #[test]
    fn test_call_data_starts_at_first_index() -> eyre::Result<()> {
        let block = RollupBlock {
            transitions: vec![
                transition(7, QueueOrigin::Sequencer),
                transition(8, QueueOrigin::Sequencer),
                transition(9, QueueOrigin::L1ToL2),
            ],
        };

        let (start, call_data) = CallDataSubmitter::call_data(&block)?;
        assert_eq!(start, 7);

        let decoded = AppendSequencerBatchCallData::decode(&call_data)?;
        assert_eq!(decoded.should_start_at_batch, 7);
        assert_eq!(decoded.total_elements_to_append, 3);
        assert_eq!(decoded.contexts.len(), 1);
        assert_eq!(decoded.contexts[0].num_sequenced_transactions, 2);
        assert_eq!(decoded.contexts[0].num_subsequent_queue_transactions, 1);
        Ok(())
    }

    #[test]
    fn test_empty_block_is_rejected() {
        let res = CallDataSubmitter::call_data(&RollupBlock::default());
        assert!(matches!(res, Err(ProviderError::Submission(_))));
    }
}
