use super::DatabaseError;

/// The key of the last block number processed by the block builder.
pub const LAST_PROCESSED_BLOCK_NUMBER_KEY: &str = "last_processed_block_number";

/// A durable key/value store.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc)]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored at `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, DatabaseError>;

    /// Stores `value` at `key`, overriding any previous value.
    async fn put(&self, key: &str, value: String) -> Result<(), DatabaseError>;
}

/// The [`DatabaseOperations`] trait provides typed access to the progress markers persisted in a
/// [`KeyValueStore`].
#[async_trait::async_trait]
pub trait DatabaseOperations: KeyValueStore {
    /// Returns the last block number processed by the block builder.
    async fn get_last_processed_block_number(&self) -> Result<Option<u64>, DatabaseError> {
        self.get(LAST_PROCESSED_BLOCK_NUMBER_KEY)
            .await?
            .map(|value| {
                value.parse().map_err(|_| DatabaseError::InvalidValue {
                    key: LAST_PROCESSED_BLOCK_NUMBER_KEY,
                    value,
                })
            })
            .transpose()
    }

    /// Sets the last block number processed by the block builder.
    async fn set_last_processed_block_number(&self, number: u64) -> Result<(), DatabaseError> {
        tracing::trace!(target: "rollup_sync::db", number, "Updating last processed block number");
        self.put(LAST_PROCESSED_BLOCK_NUMBER_KEY, number.to_string()).await
    }
}

impl<T: KeyValueStore + ?Sized> DatabaseOperations for T {}
