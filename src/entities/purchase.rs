//! Purchase entity - One buying trip, possibly covering several ingredients.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a purchase was part of the regular restock or an unplanned one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PurchaseKind {
    /// Planned restock
    #[sea_orm(string_value = "regular")]
    Regular,
    /// Unplanned, extra purchase
    #[sea_orm(string_value = "extra")]
    Extra,
}

impl PurchaseKind {
    /// Lowercase label used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Extra => "extra",
        }
    }
}

/// Purchase database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Unique identifier for the purchase
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Business date of the purchase
    pub date: Date,
    /// Supplier name, may be empty
    pub supplier: String,
    /// Regular or extra purchase
    pub kind: PurchaseKind,
    /// Free-text notes
    pub notes: String,
    /// Sum of the rounded item subtotals
    pub total: f64,
    /// When the row was written
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Purchase and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One purchase has many items
    #[sea_orm(has_many = "super::purchase_item::Entity")]
    Items,
}

impl Related<super::purchase_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
