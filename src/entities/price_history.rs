//! Price history entity - One row per price an ingredient has had.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Price history database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_history")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Ingredient whose price changed
    pub ingredient_id: i64,
    /// Unit price from this date on
    pub price: f64,
    /// Business date the price was recorded for
    pub recorded_on: Date,
    /// When the row was written
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `PriceHistory` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one ingredient; removed together with it
    #[sea_orm(
        belongs_to = "super::ingredient::Entity",
        from = "Column::IngredientId",
        to = "super::ingredient::Column::Id",
        on_delete = "Cascade"
    )]
    Ingredient,
}

impl Related<super::ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
