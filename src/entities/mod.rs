//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod consumption;
pub mod consumption_item;
pub mod ingredient;
pub mod price_history;
pub mod production;
pub mod purchase;
pub mod purchase_item;
pub mod recipe;
pub mod recipe_additional_cost;
pub mod recipe_ingredient;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use consumption::{
    Column as ConsumptionColumn, Entity as Consumption, Model as ConsumptionModel,
};
pub use consumption_item::{
    Column as ConsumptionItemColumn, Entity as ConsumptionItem, Model as ConsumptionItemModel,
};
pub use ingredient::{Column as IngredientColumn, Entity as Ingredient, Model as IngredientModel};
pub use price_history::{
    Column as PriceHistoryColumn, Entity as PriceHistory, Model as PriceHistoryModel,
};
pub use production::{Column as ProductionColumn, Entity as Production, Model as ProductionModel};
pub use purchase::{Column as PurchaseColumn, Entity as Purchase, Model as PurchaseModel};
pub use purchase_item::{
    Column as PurchaseItemColumn, Entity as PurchaseItem, Model as PurchaseItemModel,
};
pub use recipe::{Column as RecipeColumn, Entity as Recipe, Model as RecipeModel};
pub use recipe_additional_cost::{
    Column as RecipeAdditionalCostColumn, Entity as RecipeAdditionalCost,
    Model as RecipeAdditionalCostModel,
};
pub use recipe_ingredient::{
    Column as RecipeIngredientColumn, Entity as RecipeIngredient, Model as RecipeIngredientModel,
};
