//! Production entity - A run that turned ingredients into units of a recipe.
//!
//! `total_cost` is frozen at registration time, unlike the recipe cost itself.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Production database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "productions")]
pub struct Model {
    /// Unique identifier for the run
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Recipe that was produced
    pub recipe_id: i64,
    /// Business date of the run
    pub date: Date,
    /// Units produced, at least 1
    pub quantity: i64,
    /// Unit cost at registration time times quantity
    pub total_cost: f64,
    /// Free-text notes
    pub notes: String,
    /// When the row was written
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Production and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each run belongs to one recipe
    #[sea_orm(
        belongs_to = "super::recipe::Entity",
        from = "Column::RecipeId",
        to = "super::recipe::Column::Id"
    )]
    Recipe,
    /// A run records its stock withdrawal as a consumption
    #[sea_orm(has_many = "super::consumption::Entity")]
    Consumptions,
}

impl Related<super::recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipe.def()
    }
}

impl Related<super::consumption::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Consumptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
