use sea_orm::{entity::prelude::*, ActiveValue};

/// A key/value entry of the metadata table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "metadata")]
pub struct Model {
    /// The metadata key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// The metadata value.
    pub value: String,
}

/// The relation for the metadata model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Returns the active model for the provided entry.
    pub(crate) fn entry(key: &str, value: String) -> Self {
        Self { key: ActiveValue::Set(key.to_owned()), value: ActiveValue::Set(value) }
    }
}
