//! Consumption entity - A stock withdrawal, either manual or caused by a production run.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Consumption database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "consumptions")]
pub struct Model {
    /// Unique identifier for the consumption
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Business date of the consumption
    pub date: Date,
    /// Production run that caused it, None for manual consumption
    pub production_id: Option<i64>,
    /// Free-text notes
    pub notes: String,
    /// When the row was written
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Consumption and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One consumption has many items
    #[sea_orm(has_many = "super::consumption_item::Entity")]
    Items,
    /// Optionally caused by one production run
    #[sea_orm(
        belongs_to = "super::production::Entity",
        from = "Column::ProductionId",
        to = "super::production::Column::Id"
    )]
    Production,
}

impl Related<super::consumption_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::production::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Production.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
