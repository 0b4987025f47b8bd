//! Recipe additional cost entity - Flat costs such as labor or fuel attached to a recipe.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recipe additional cost database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe_additional_costs")]
pub struct Model {
    /// Unique identifier for the cost
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Recipe this cost applies to
    pub recipe_id: i64,
    /// What the cost is for (e.g., "labor")
    pub concept: String,
    /// Flat amount per unit produced, never negative
    pub cost: f64,
}

/// Defines relationships between `RecipeAdditionalCost` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each cost belongs to one recipe
    #[sea_orm(
        belongs_to = "super::recipe::Entity",
        from = "Column::RecipeId",
        to = "super::recipe::Column::Id"
    )]
    Recipe,
}

impl Related<super::recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipe.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
