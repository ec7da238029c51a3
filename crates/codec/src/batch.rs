use crate::{
    from_be_bytes_slice_and_advance_buf, macros::put_uint_checked, DecodingError, EncodingError,
};

use alloy_primitives::{
    bytes::{Buf, BufMut},
    Bytes,
};

/// The size in bytes of the `shouldStartAtBatch` header field.
const SHOULD_START_AT_BATCH_BYTES: usize = 5;
/// The size in bytes of the `totalElementsToAppend` header field.
const TOTAL_ELEMENTS_TO_APPEND_BYTES: usize = 3;
/// The size in bytes of the context count header field.
const CONTEXT_COUNT_BYTES: usize = 3;
/// The size in bytes of the length prefix of a sequenced transaction.
const TX_DATA_LENGTH_BYTES: usize = 3;

/// The upper bound on the number of chain elements allocated upfront during decoding. Queue
/// elements do not take any space in the payload, so the announced count can't be trusted for
/// allocation.
const MAX_PREALLOCATED_ELEMENTS: usize = 1024;

/// A contiguous run of chain elements sharing the same L1 anchor.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CtcBatchContext {
    /// The number of sequenced transactions at the start of the run.
    pub num_sequenced_transactions: u64,
    /// The number of queue transactions following the sequenced transactions.
    pub num_subsequent_queue_transactions: u64,
    /// The L1 timestamp of the run.
    pub timestamp: u64,
    /// The L1 block number of the run.
    pub block_number: u64,
}

impl CtcBatchContext {
    /// The encoded size of a context.
    pub const BYTES_LENGTH: usize = 16;

    /// Returns a new [`CtcBatchContext`].
    pub const fn new(
        num_sequenced_transactions: u64,
        num_subsequent_queue_transactions: u64,
        timestamp: u64,
        block_number: u64,
    ) -> Self {
        Self {
            num_sequenced_transactions,
            num_subsequent_queue_transactions,
            timestamp,
            block_number,
        }
    }

    /// Returns the total count of chain elements covered by the context.
    pub const fn element_count(&self) -> u64 {
        self.num_sequenced_transactions + self.num_subsequent_queue_transactions
    }

    /// Tries to read from the input buffer into the [`CtcBatchContext`].
    /// Returns [`DecodingError::Eof`] if the buffer.len() < [`CtcBatchContext::BYTES_LENGTH`].
    pub fn try_from_buf(buf: &mut &[u8]) -> Result<Self, DecodingError> {
        if buf.len() < Self::BYTES_LENGTH {
            return Err(DecodingError::Eof)
        }

        let num_sequenced_transactions = from_be_bytes_slice_and_advance_buf!(u64, 3, buf);
        let num_subsequent_queue_transactions = from_be_bytes_slice_and_advance_buf!(u64, 3, buf);
        let timestamp = from_be_bytes_slice_and_advance_buf!(u64, 5, buf);
        let block_number = from_be_bytes_slice_and_advance_buf!(u64, 5, buf);

        Ok(Self {
            num_sequenced_transactions,
            num_subsequent_queue_transactions,
            timestamp,
            block_number,
        })
    }

    /// Writes the encoded context to the output buffer.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), EncodingError> {
        put_uint_checked!(out, "numSequencedTransactions", self.num_sequenced_transactions, 3);
        put_uint_checked!(
            out,
            "numSubsequentQueueTransactions",
            self.num_subsequent_queue_transactions,
            3
        );
        put_uint_checked!(out, "timestamp", self.timestamp, 5);
        put_uint_checked!(out, "blockNumber", self.block_number, 5);
        Ok(())
    }
}

/// A single position in the canonical transaction chain.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChainElement {
    /// Whether the element was sequenced, as opposed to being pulled from the L1 queue.
    pub is_sequenced: bool,
    /// The L1 timestamp of a sequenced element.
    pub timestamp: Option<u64>,
    /// The L1 block number of a sequenced element.
    pub block_number: Option<u64>,
    /// The serialized [`crate::CtcTransaction`] of a sequenced element.
    pub tx_data: Option<Bytes>,
}

impl ChainElement {
    /// Returns a sequenced element carrying the provided transaction data.
    pub const fn sequenced(timestamp: u64, block_number: u64, tx_data: Bytes) -> Self {
        Self {
            is_sequenced: true,
            timestamp: Some(timestamp),
            block_number: Some(block_number),
            tx_data: Some(tx_data),
        }
    }

    /// Returns a queue element, which carries no data.
    pub const fn queued() -> Self {
        Self { is_sequenced: false, timestamp: None, block_number: None, tx_data: None }
    }
}

/// The payload of an `appendSequencerBatch` call to the canonical transaction chain.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AppendSequencerBatchCallData {
    /// The expected index of the first appended element, used by the contract to reject
    /// concurrent submissions.
    pub should_start_at_batch: u64,
    /// The total count of appended elements.
    pub total_elements_to_append: u64,
    /// The contexts describing the appended elements.
    pub contexts: Vec<CtcBatchContext>,
    /// The appended elements.
    pub chain_elements: Vec<ChainElement>,
}

impl AppendSequencerBatchCallData {
    /// The encoded size of the header.
    pub const HEADER_BYTES_LENGTH: usize =
        SHOULD_START_AT_BATCH_BYTES + TOTAL_ELEMENTS_TO_APPEND_BYTES + CONTEXT_COUNT_BYTES;

    /// Returns the count of elements described by the contexts.
    pub fn context_element_count(&self) -> u64 {
        self.contexts.iter().map(CtcBatchContext::element_count).sum()
    }

    /// Encodes the call data into its wire format.
    pub fn encode(&self) -> Result<Bytes, EncodingError> {
        let expected = self.total_elements_to_append;
        let described = self.context_element_count();
        if described != expected {
            return Err(EncodingError::ElementCountMismatch { expected, got: described })
        }
        if self.chain_elements.len() as u64 != expected {
            return Err(EncodingError::ElementCountMismatch {
                expected,
                got: self.chain_elements.len() as u64,
            })
        }

        let payload_length: usize = self
            .chain_elements
            .iter()
            .filter_map(|element| element.tx_data.as_ref())
            .map(|data| TX_DATA_LENGTH_BYTES + data.len())
            .sum();
        let mut out = Vec::with_capacity(
            Self::HEADER_BYTES_LENGTH +
                self.contexts.len() * CtcBatchContext::BYTES_LENGTH +
                payload_length,
        );
        let buf = &mut out;

        put_uint_checked!(
            buf,
            "shouldStartAtBatch",
            self.should_start_at_batch,
            SHOULD_START_AT_BATCH_BYTES
        );
        put_uint_checked!(buf, "totalElementsToAppend", expected, TOTAL_ELEMENTS_TO_APPEND_BYTES);
        put_uint_checked!(buf, "contextCount", self.contexts.len() as u64, CONTEXT_COUNT_BYTES);

        for context in &self.contexts {
            context.encode_into(buf)?;
        }

        // walk the elements along the contexts, only the sequenced transactions are written.
        let mut elements = self.chain_elements.iter().enumerate();
        for context in &self.contexts {
            for _ in 0..context.num_sequenced_transactions {
                let (index, element) = elements
                    .next()
                    .ok_or(EncodingError::ElementCountMismatch { expected, got: described })?;
                if !element.is_sequenced {
                    return Err(EncodingError::UnexpectedElement { index, is_sequenced: false })
                }
                let data =
                    element.tx_data.as_ref().ok_or(EncodingError::MissingTransactionData(index))?;
                put_uint_checked!(buf, "txDataLength", data.len() as u64, TX_DATA_LENGTH_BYTES);
                buf.put_slice(data);
            }
            for _ in 0..context.num_subsequent_queue_transactions {
                let (index, element) = elements
                    .next()
                    .ok_or(EncodingError::ElementCountMismatch { expected, got: described })?;
                if element.is_sequenced {
                    return Err(EncodingError::UnexpectedElement { index, is_sequenced: true })
                }
            }
        }

        Ok(out.into())
    }

    /// Decodes the call data from its wire format.
    pub fn decode(input: &[u8]) -> Result<Self, DecodingError> {
        let buf = &mut &*input;
        if buf.len() < Self::HEADER_BYTES_LENGTH {
            return Err(DecodingError::Eof)
        }

        let should_start_at_batch =
            from_be_bytes_slice_and_advance_buf!(u64, SHOULD_START_AT_BATCH_BYTES, buf);
        let total_elements_to_append =
            from_be_bytes_slice_and_advance_buf!(u64, TOTAL_ELEMENTS_TO_APPEND_BYTES, buf);
        let context_count = from_be_bytes_slice_and_advance_buf!(u64, CONTEXT_COUNT_BYTES, buf);

        // each context takes a fixed amount of bytes.
        if (buf.len() as u64) < context_count * CtcBatchContext::BYTES_LENGTH as u64 {
            return Err(DecodingError::Eof)
        }
        let mut contexts = Vec::with_capacity(context_count as usize);
        for _ in 0..context_count {
            contexts.push(CtcBatchContext::try_from_buf(buf)?);
        }

        let tx_count: u64 = contexts.iter().map(CtcBatchContext::element_count).sum();
        if tx_count != total_elements_to_append {
            return Err(DecodingError::LengthMismatch {
                expected: total_elements_to_append,
                got: tx_count,
            })
        }

        let mut chain_elements =
            Vec::with_capacity((tx_count as usize).min(MAX_PREALLOCATED_ELEMENTS));
        for context in &contexts {
            for _ in 0..context.num_sequenced_transactions {
                if buf.len() < TX_DATA_LENGTH_BYTES {
                    return Err(DecodingError::Eof)
                }
                let length =
                    from_be_bytes_slice_and_advance_buf!(u64, TX_DATA_LENGTH_BYTES, buf) as usize;
                if buf.len() < length {
                    return Err(DecodingError::Eof)
                }
                let tx_data = Bytes::copy_from_slice(&buf[..length]);
                buf.advance(length);

                chain_elements.push(ChainElement::sequenced(
                    context.timestamp,
                    context.block_number,
                    tx_data,
                ));
            }
            for _ in 0..context.num_subsequent_queue_transactions {
                chain_elements.push(ChainElement::queued());
            }
        }

        if !buf.is_empty() {
            return Err(DecodingError::TrailingBytes(buf.len()))
        }

        Ok(Self { should_start_at_batch, total_elements_to_append, contexts, chain_elements })
    }
}
