//! The crate exposes the external collaborators of the sync service and the block builder: the
//! data transport service client, the local chain, the transaction validator and the batch
//! submitter.

pub use chain::{InMemoryChain, L2ChainProvider, DEFAULT_BLOCK_GAS_USED};
mod chain;

pub use error::ProviderError;
mod error;

pub use rollup::{
    http::HttpRollupClient,
    types::{
        BatchResponse, DecodedTransactionResponse, EnqueueResponse, EthContextResponse,
        QueueOriginResponse, SignatureResponse, SignatureTypeResponse, TransactionRecord,
        TransactionResponse,
    },
    RollupClient,
};
mod rollup;

pub use submitter::BatchSubmitter;
mod submitter;

pub use validator::{BasicTransactionValidator, TransactionValidator, ValidationError};
mod validator;

#[cfg(any(test, feature = "test-utils"))]
/// Common test helpers
pub mod test_utils;
