//! Consumption item entity - How much of one ingredient a consumption withdrew.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Consumption item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "consumption_items")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Consumption this line belongs to
    pub consumption_id: i64,
    /// Ingredient withdrawn
    pub ingredient_id: i64,
    /// Quantity withdrawn, in the ingredient's unit
    pub quantity: f64,
}

/// Defines relationships between `ConsumptionItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one consumption
    #[sea_orm(
        belongs_to = "super::consumption::Entity",
        from = "Column::ConsumptionId",
        to = "super::consumption::Column::Id"
    )]
    Consumption,
}

impl Related<super::consumption::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Consumption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
