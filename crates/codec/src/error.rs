use alloy_primitives::B256;

/// An error occurring during the codec process.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// An error occurring at the decoding stage.
    #[error(transparent)]
    Decoding(#[from] DecodingError),
    /// An error occurring at the encoding stage.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// An error occurring during the decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodingError {
    #[error("end of file")]
    Eof,
    #[error("element count mismatch: header announces {expected}, contexts sum to {got}")]
    LengthMismatch { expected: u64, got: u64 },
    #[error("missing transaction type")]
    MissingTransactionType,
    #[error("unknown transaction type {0}")]
    UnknownTransactionType(u8),
    #[error("{0} trailing bytes after payload")]
    TrailingBytes(usize),
}

/// An error occurring during the encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("value {value} of field {field} does not fit in {size} bytes")]
    FieldOverflow { field: &'static str, value: u64, size: usize },
    #[error("element count mismatch: expected {expected}, got {got}")]
    ElementCountMismatch { expected: u64, got: u64 },
    #[error(
        "chain element {index} has an unexpected sequencing flag (is_sequenced = {is_sequenced})"
    )]
    UnexpectedElement { index: usize, is_sequenced: bool },
    #[error("sequenced chain element {0} is missing its transaction data")]
    MissingTransactionData(usize),
    #[error("transaction {0} is not signed")]
    MissingSignature(B256),
    #[error("transaction {0} is a contract creation, which has no compressed form")]
    ContractCreation(B256),
    #[error("gas price of transaction {0} is not a multiple of the gas price scale unit")]
    InexactGasPrice(B256),
}
