//! Ingredient entity - A raw material with a current price and stock level.
//!
//! `unit_price` always holds the latest known price. Every change to it is
//! mirrored by a row in `price_history`, which is what the price trend report reads.
//! `current_stock` is raised by purchases and lowered by consumptions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ingredient database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    /// Unique identifier for the ingredient
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the ingredient (e.g., "Flour", "Butter"), unique
    #[sea_orm(unique)]
    pub name: String,
    /// Optional category this ingredient belongs to
    pub category_id: Option<i64>,
    /// Current price per unit of measure
    pub unit_price: f64,
    /// Quantity currently in stock, in `unit`
    pub current_stock: f64,
    /// Stock level below which the ingredient is reported as low
    pub minimum_stock: f64,
    /// Unit of measure (e.g., "kg", "unit", "l")
    pub unit: String,
    /// When the ingredient was registered
    pub created_at: DateTimeUtc,
    /// When the ingredient was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Ingredient and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each ingredient optionally belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// One ingredient has many recorded prices
    #[sea_orm(has_many = "super::price_history::Entity")]
    PriceHistory,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::price_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
