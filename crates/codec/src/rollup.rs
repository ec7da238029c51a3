use crate::{
    AppendSequencerBatchCallData, ChainElement, CtcBatchContext, CtcTransaction, EncodingError,
};

use rollup_sync_primitives::RollupBlock;

impl AppendSequencerBatchCallData {
    /// Builds the call data appending the transitions of the rollup block to the canonical
    /// transaction chain, starting at `should_start_at_batch`.
    ///
    /// Consecutive sequencer transactions sharing the same L1 anchor are grouped in a single
    /// context, and the queue transactions that follow them are counted as the subsequent queue
    /// transactions of that context.
    pub fn from_rollup_block(
        should_start_at_batch: u64,
        block: &RollupBlock,
    ) -> Result<Self, EncodingError> {
        let mut contexts: Vec<CtcBatchContext> = Vec::new();
        let mut chain_elements = Vec::with_capacity(block.len());

        for transition in &block.transitions {
            let tx = &transition.transaction;
            let (timestamp, block_number) = (tx.meta.l1_timestamp, tx.meta.l1_block_number);

            if tx.meta.is_l1_to_l2() {
                match contexts.last_mut() {
                    Some(context) => context.num_subsequent_queue_transactions += 1,
                    None => contexts.push(CtcBatchContext::new(0, 1, timestamp, block_number)),
                }
                chain_elements.push(ChainElement::queued());
                continue
            }

            match contexts.last_mut() {
                Some(context)
                    if context.num_subsequent_queue_transactions == 0 &&
                        context.timestamp == timestamp &&
                        context.block_number == block_number =>
                {
                    context.num_sequenced_transactions += 1
                }
                _ => contexts.push(CtcBatchContext::new(1, 0, timestamp, block_number)),
            }
            let tx_data = CtcTransaction::try_from(tx)?.encode()?;
            chain_elements.push(ChainElement::sequenced(timestamp, block_number, tx_data));
        }

        Ok(Self {
            should_start_at_batch,
            total_elements_to_append: chain_elements.len() as u64,
            contexts,
            chain_elements,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{AppendSequencerBatchCallData, CtcBatchContext, CtcTransaction};

    use alloy_primitives::{Address, Signature, TxKind, B256, U256};
    use rollup_sync_primitives::{
        L2Transaction, QueueOrigin, RollupBlock, SignatureHashType, TransactionMeta, Transition,
        TxLegacy,
    };

    fn transition(origin: QueueOrigin, l1_block_number: u64) -> Transition {
        let signature = match origin {
            QueueOrigin::Sequencer => {
                Some(Signature::new(U256::from(1), U256::from(1), false))
            }
            QueueOrigin::L1ToL2 => None,
        };
        let tx = L2Transaction {
            tx: TxLegacy {
                gas_limit: 21_000,
                to: TxKind::Call(Address::repeat_byte(0x42)),
                ..Default::default()
            },
            signature,
            meta: TransactionMeta::new(
                l1_block_number,
                l1_block_number * 12,
                None,
                SignatureHashType::Eip155,
                origin,
            ),
        };
        Transition::new(tx, B256::ZERO)
    }

    #[test]
    fn test_should_group_transitions_into_contexts() -> eyre::Result<()> {
        use QueueOrigin::{L1ToL2, Sequencer};

        let block = RollupBlock {
            transitions: vec![
                transition(L1ToL2, 9),
                transition(Sequencer, 10),
                transition(Sequencer, 10),
                transition(L1ToL2, 10),
                transition(Sequencer, 10),
                transition(Sequencer, 11),
            ],
        };

        let call_data = AppendSequencerBatchCallData::from_rollup_block(40, &block)?;

        assert_eq!(call_data.should_start_at_batch, 40);
        assert_eq!(call_data.total_elements_to_append, 6);
        assert_eq!(
            call_data.contexts,
            vec![
                CtcBatchContext::new(0, 1, 108, 9),
                CtcBatchContext::new(2, 1, 120, 10),
                CtcBatchContext::new(1, 0, 120, 10),
                CtcBatchContext::new(1, 0, 132, 11),
            ]
        );
        let flags: Vec<_> = call_data.chain_elements.iter().map(|e| e.is_sequenced).collect();
        assert_eq!(flags, vec![false, true, true, false, true, true]);

        let tx_data = call_data.chain_elements[1].tx_data.clone().unwrap_or_default();
        assert!(matches!(CtcTransaction::decode(&tx_data)?, CtcTransaction::Eip155 { .. }));

        let decoded = AppendSequencerBatchCallData::decode(&call_data.encode()?)?;
        assert_eq!(decoded, call_data);
        Ok(())
    }
}
