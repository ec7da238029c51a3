//! Test utilities for the database crate.

use super::Database;
use rollup_sync_migration::{Migrator, MigratorTrait};

/// Instantiates a new in-memory database and runs the migrations to set up the schema.
pub async fn setup_test_db() -> Database {
    let database_url = "sqlite::memory:";
    let database = Database::new(database_url).await.unwrap();
    Migrator::up(database.connection(), None).await.unwrap();

    database
}
