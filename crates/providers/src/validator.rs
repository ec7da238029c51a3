use alloy_primitives::B256;
use rollup_sync_primitives::L2Transaction;

/// The error returned when a transaction fails the admission rules of the mempool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transaction {hash} rejected: {reason}")]
pub struct ValidationError {
    /// The hash of the rejected transaction.
    pub hash: B256,
    /// The reason of the rejection.
    pub reason: String,
}

/// Implementers of the trait validate transactions against the mempool admission rules.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait TransactionValidator: Send + Sync {
    /// Validates the transaction.
    async fn validate_transaction(&self, tx: &L2Transaction) -> Result<(), ValidationError>;
}

/// A [`TransactionValidator`] enforcing the stateless admission rules of the sequencer: the
/// transaction must be signed, its gas limit must be positive and within the configured bound, and
/// its input data must not exceed the configured size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicTransactionValidator {
    /// The maximum gas limit of a transaction.
    pub max_gas_limit: u64,
    /// The maximum size of the input data of a transaction.
    pub max_data_size: usize,
}

impl BasicTransactionValidator {
    /// Returns a new [`BasicTransactionValidator`].
    pub const fn new(max_gas_limit: u64, max_data_size: usize) -> Self {
        Self { max_gas_limit, max_data_size }
    }

    fn check(&self, tx: &L2Transaction) -> Result<(), String> {
        if tx.signature.is_none() {
            return Err("missing signature".to_string())
        }
        let (gas_limit, data_size) = (tx.tx.gas_limit, tx.tx.input.len());
        if gas_limit == 0 || gas_limit > self.max_gas_limit {
            return Err(format!("gas limit {gas_limit} outside of (0, {}]", self.max_gas_limit))
        }
        if data_size > self.max_data_size {
            return Err(format!("data size {data_size} exceeds {}", self.max_data_size))
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TransactionValidator for BasicTransactionValidator {
    async fn validate_transaction(&self, tx: &L2Transaction) -> Result<(), ValidationError> {
        self.check(tx).map_err(|reason| ValidationError { hash: tx.hash(), reason })
    }
}
