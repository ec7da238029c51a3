use crate::{error::DatabaseError, metrics::DatabaseMetrics, models, KeyValueStore};

use std::time::Instant;

use sea_orm::{
    sea_query::OnConflict, Database as SeaOrmDatabase, DatabaseConnection, EntityTrait,
};

/// The [`Database`] struct is responsible for interacting with the database.
///
/// The [`Database`] type wraps a [`sea_orm::DatabaseConnection`] and implements the
/// [`KeyValueStore`] over the metadata table. The schema is expected to be set up by the
/// migrations before the first operation.
#[derive(Debug)]
pub struct Database {
    /// The underlying database connection.
    connection: DatabaseConnection,
    /// The database metrics.
    metrics: DatabaseMetrics,
}

impl Database {
    /// Creates a new [`Database`] instance associated with the provided database URL.
    pub async fn new(database_url: &str) -> Result<Self, DatabaseError> {
        tracing::info!(target: "rollup_sync::db", database_url, "Connecting to database");
        let connection = SeaOrmDatabase::connect(database_url).await?;
        Ok(connection.into())
    }

    /// Returns a reference to the underlying connection.
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

impl From<DatabaseConnection> for Database {
    fn from(connection: DatabaseConnection) -> Self {
        Self { connection, metrics: DatabaseMetrics::default() }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for Database {
    async fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let now = Instant::now();
        let res = models::metadata::Entity::find_by_id(key.to_owned())
            .one(&self.connection)
            .await
            .map(|entry| entry.map(|entry| entry.value));
        self.metrics.get_duration.record(now.elapsed().as_secs_f64() * 1000.0);

        res.map_err(|err| {
            self.metrics.failed_operations.increment(1);
            err.into()
        })
    }

    async fn put(&self, key: &str, value: String) -> Result<(), DatabaseError> {
        tracing::trace!(target: "rollup_sync::db", key, value, "Writing metadata entry");
        let now = Instant::now();
        let res = models::metadata::Entity::insert(models::metadata::ActiveModel::entry(
            key, value,
        ))
        .on_conflict(
            OnConflict::column(models::metadata::Column::Key)
                .update_column(models::metadata::Column::Value)
                .to_owned(),
        )
        .exec(&self.connection)
        .await
        .map(|_| ());
        self.metrics.put_duration.record(now.elapsed().as_secs_f64() * 1000.0);

        res.map_err(|err| {
            self.metrics.failed_operations.increment(1);
            err.into()
        })
    }
}
