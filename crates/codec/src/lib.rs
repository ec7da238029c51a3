//! The codec for the batches appended by the sequencer to the canonical transaction chain.
//!
//! The payload is byte packed and big-endian: an 11 bytes header, a list of fixed size
//! [`CtcBatchContext`] and the length prefixed sequenced transactions. Queue origin elements do not
//! contribute any byte to the payload as they are resolved from the L1 queue.

pub use batch::{AppendSequencerBatchCallData, ChainElement, CtcBatchContext};
mod batch;

pub use error::{CodecError, DecodingError, EncodingError};
mod error;

mod macros;

mod rollup;

pub use transaction::{CtcTransaction, CtcTransactionType, GAS_PRICE_SCALE_UNIT};
mod transaction;
