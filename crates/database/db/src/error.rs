/// The error type for database operations.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// A database error occurred.
    #[error("database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),
    /// A stored value could not be parsed into its expected type.
    #[error("invalid value {value} stored for key {key}")]
    InvalidValue {
        /// The metadata key.
        key: &'static str,
        /// The raw stored value.
        value: String,
    },
}
