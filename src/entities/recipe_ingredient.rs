//! Recipe ingredient entity - How much of one ingredient a single unit of a recipe needs.
//!
//! `ingredient_id` is not a foreign key: an ingredient can be removed
//! while recipes still mention it, and the cost calculator skips such rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recipe ingredient database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe_ingredients")]
pub struct Model {
    /// Unique identifier for the association
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Recipe this line belongs to
    pub recipe_id: i64,
    /// Ingredient used (may no longer exist)
    pub ingredient_id: i64,
    /// Amount needed per unit of recipe produced
    pub quantity: f64,
    /// Unit the quantity is expressed in
    pub unit: String,
}

/// Defines relationships between `RecipeIngredient` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one recipe
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
