//! Database migrations of the rollup sync node.

#![allow(missing_docs, unreachable_pub)]

pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_metadata_table;

#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250901_000001_create_metadata_table::Migration)]
    }
}
