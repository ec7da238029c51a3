//! A library responsible for persisting the progress markers of the rollup sync node.

mod db;
pub use db::Database;

mod error;
pub use error::DatabaseError;

mod metrics;

mod models;

mod operations;
pub use operations::{DatabaseOperations, KeyValueStore, LAST_PROCESSED_BLOCK_NUMBER_KEY};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use sea_orm::DbErr;
