//! Recipe entity - A sellable product defined by a bill of ingredients.
//!
//! The cost of a recipe is never stored here. It is recomputed on demand from
//! the current ingredient prices, see `core::costing`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recipe database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    /// Unique identifier for the recipe
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product name (e.g., "Chocolate Cake"), unique
    #[sea_orm(unique)]
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Price one unit sells for, always positive
    pub sale_price: f64,
    /// When the recipe was created
    pub created_at: DateTimeUtc,
    /// When the recipe was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Recipe and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One recipe lists many ingredients
    #[sea_orm(has_many = "super::recipe_ingredient::Entity")]
    RecipeIngredients,
    /// One recipe carries many flat additional costs
    #[sea_orm(has_many = "super::recipe_additional_cost::Entity")]
    AdditionalCosts,
    /// One recipe has many production runs
    #[sea_orm(has_many = "super::production::Entity")]
    Productions,
}

impl Related<super::recipe_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeIngredients.def()
    }
}

impl Related<super::recipe_additional_cost::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdditionalCosts.def()
    }
}

impl Related<super::production::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Productions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
