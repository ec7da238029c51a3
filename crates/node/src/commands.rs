//! The one-shot commands of the binary.

use std::fmt::Write;

use alloy_primitives::hex;
use rollup_sync_codec::{AppendSequencerBatchCallData, CtcTransaction};
use rollup_sync_primitives::{EthContext, L2Transaction};
use rollup_sync_providers::RollupClient;

/// Decodes a hex encoded `appendSequencerBatch` payload, with or without its `0x` prefix.
pub fn decode_batch(input: &str) -> eyre::Result<AppendSequencerBatchCallData> {
    let bytes = hex::decode(input.trim())?;
    Ok(AppendSequencerBatchCallData::decode(&bytes)?)
}

/// Returns a human readable description of the batch, one line per context and per element.
pub fn format_batch(batch: &AppendSequencerBatchCallData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "should start at batch: {}", batch.should_start_at_batch);
    let _ = writeln!(out, "total elements to append: {}", batch.total_elements_to_append);
    let _ = writeln!(out, "contexts: {}", batch.contexts.len());
    for (i, context) in batch.contexts.iter().enumerate() {
        let _ = writeln!(
            out,
            "  context {i}: sequenced={} queued={} timestamp={} block={}",
            context.num_sequenced_transactions,
            context.num_subsequent_queue_transactions,
            context.timestamp,
            context.block_number,
        );
    }

    let _ = writeln!(out, "elements: {}", batch.chain_elements.len());
    for (i, element) in batch.chain_elements.iter().enumerate() {
        let Some(data) = element.tx_data.as_ref().filter(|_| element.is_sequenced) else {
            let _ = writeln!(out, "  element {i}: queued");
            continue
        };
        let _ = write!(
            out,
            "  element {i}: sequenced timestamp={} block={} size={}",
            element.timestamp.unwrap_or_default(),
            element.block_number.unwrap_or_default(),
            data.len(),
        );
        match CtcTransaction::decode(data) {
            Ok(tx) => {
                let _ = writeln!(out, " type={:?} gas_price={}", tx.tx_type(), tx.gas_price());
            }
            Err(err) => {
                let _ = writeln!(out, " undecodable: {err}");
            }
        }
    }
    out
}

/// The view of the data transport service returned by [`status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteStatus {
    /// The latest element of the L1 to L2 queue.
    pub latest_enqueue: Option<L2Transaction>,
    /// The latest element of the canonical transaction chain.
    pub latest_transaction: Option<L2Transaction>,
    /// The latest L1 context.
    pub latest_eth_context: EthContext,
}

impl std::fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.latest_enqueue {
            Some(tx) => writeln!(
                f,
                "latest enqueue: queue index {:?}, ctc index {:?}, l1 block {}",
                tx.queue_index(),
                tx.index(),
                tx.meta.l1_block_number
            )?,
            None => writeln!(f, "latest enqueue: none")?,
        }
        match &self.latest_transaction {
            Some(tx) => writeln!(
                f,
                "latest transaction: index {:?}, origin {}, l1 block {}",
                tx.index(),
                tx.meta.queue_origin,
                tx.meta.l1_block_number
            )?,
            None => writeln!(f, "latest transaction: none")?,
        }
        write!(
            f,
            "latest l1 context: block {}, timestamp {}",
            self.latest_eth_context.block_number, self.latest_eth_context.timestamp
        )
    }
}

/// Queries the latest state of the data transport service.
pub async fn status<C: RollupClient>(client: &C) -> eyre::Result<RemoteStatus> {
    let (latest_enqueue, latest_transaction, latest_eth_context) = tokio::try_join!(
        client.get_latest_enqueue(),
        client.get_latest_transaction(),
        client.get_latest_eth_context(),
    )?;
    Ok(RemoteStatus { latest_enqueue, latest_transaction, latest_eth_context })
}
