//! Purchase item entity - One ingredient line of a purchase.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_items")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Purchase this line belongs to
    pub purchase_id: i64,
    /// Ingredient bought
    pub ingredient_id: i64,
    /// Quantity bought, in the ingredient's unit
    pub quantity: f64,
    /// Price paid per unit
    pub unit_price: f64,
    /// `quantity * unit_price`, rounded to cents
    pub subtotal: f64,
}

/// Defines relationships between `PurchaseItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one purchase
    #[sea_orm(
        belongs_to = "super::purchase::Entity",
        from = "Column::PurchaseId",
        to = "super::purchase::Column::Id"
    )]
    Purchase,
}

impl Related<super::purchase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Purchase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
