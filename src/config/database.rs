//! Database configuration module for `BakeryBuddy`.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated with `Schema::create_table_from_entity` from the entity
//! models, so the schema always matches the Rust struct definitions without
//! hand-written SQL.

use crate::entities::{
    Category, Consumption, ConsumptionItem, Ingredient, PriceHistory, Production, Purchase,
    PurchaseItem, Recipe, RecipeAdditionalCost, RecipeIngredient,
};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

/// Establishes a connection to the database at `database_url`.
///
/// Any URL supported by `SeaORM` works; the default settings point at a local
/// `SQLite` file.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at {database_url}");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet.
///
/// Statements are generated from the entity definitions with `IF NOT EXISTS`,
/// so calling this on every startup is safe.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(Category),
        schema.create_table_from_entity(Ingredient),
        schema.create_table_from_entity(PriceHistory),
        schema.create_table_from_entity(Recipe),
        schema.create_table_from_entity(RecipeIngredient),
        schema.create_table_from_entity(RecipeAdditionalCost),
        schema.create_table_from_entity(Production),
        schema.create_table_from_entity(Consumption),
        schema.create_table_from_entity(ConsumptionItem),
        schema.create_table_from_entity(Purchase),
        schema.create_table_from_entity(PurchaseItem),
    ];

    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    info!("Database tables ensured ({} tables).", statements.len());
    Ok(())
}
