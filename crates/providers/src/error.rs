/// An error occurring at one of the providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Error at the HTTP transport.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// A record returned by the data transport service is missing a required field.
    #[error("malformed {kind} record: missing {field}")]
    MalformedRecord {
        /// The kind of record.
        kind: &'static str,
        /// The missing field.
        field: &'static str,
    },
    /// The chain has no block at the requested height.
    #[error("no block at height {0}")]
    BlockNotFound(u64),
    /// The chain could not be rewound to the requested height.
    #[error("cannot set head to {target}, current head is {current}")]
    InvalidHead {
        /// The requested head.
        target: u64,
        /// The current head.
        current: u64,
    },
    /// The batch submission failed.
    #[error("batch submission failed: {0}")]
    Submission(String),
    /// Other error.
    #[error("{0}")]
    Other(&'static str),
}
