//! Primitive types for the rollup sync node.

pub use alloy_consensus::TxLegacy;

pub use block::L2Block;
mod block;

pub use context::{EthContext, SyncCursor};
mod context;

pub use rollup::{RollupBlock, Transition};
mod rollup;

pub use transaction::{L2Transaction, QueueOrigin, SignatureHashType, TransactionMeta};
mod transaction;
