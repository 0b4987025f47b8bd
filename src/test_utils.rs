//! Shared test utilities for `BakeryBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        catalog_cache::CatalogCache,
        ingredient::{self, NewIngredient},
        recipe::{self, NewRecipe, RecipeIngredientInput},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::time::Duration;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes `tracing` output through the test harness so it shows up on failure.
/// Safe to call from every test; only the first call installs the subscriber.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("bakery_buddy=debug")
        .with_test_writer()
        .try_init();
}

/// A catalog cache with the production default TTL.
#[must_use]
pub fn test_cache() -> CatalogCache {
    CatalogCache::new(Duration::from_secs(300))
}

/// Creates a test ingredient with sensible defaults.
///
/// # Defaults
/// * `current_stock`: 100.0
/// * `minimum_stock`: 10.0
/// * `unit`: "kg"
/// * no category
pub async fn create_test_ingredient(
    db: &DatabaseConnection,
    catalog: &CatalogCache,
    name: &str,
    unit_price: f64,
) -> Result<entities::ingredient::Model> {
    create_custom_ingredient(db, catalog, name, unit_price, 100.0, 10.0, "kg").await
}

/// Creates a test ingredient with custom stock levels and unit.
pub async fn create_custom_ingredient(
    db: &DatabaseConnection,
    catalog: &CatalogCache,
    name: &str,
    unit_price: f64,
    current_stock: f64,
    minimum_stock: f64,
    unit: &str,
) -> Result<entities::ingredient::Model> {
    ingredient::create_ingredient(
        db,
        catalog,
        NewIngredient {
            name: name.to_string(),
            category_id: None,
            unit_price,
            current_stock,
            minimum_stock,
            unit: unit.to_string(),
        },
    )
    .await
}

/// Creates a test recipe from `(ingredient_id, quantity)` pairs, without
/// additional costs. Units default to each ingredient's own unit.
pub async fn create_test_recipe(
    db: &DatabaseConnection,
    catalog: &CatalogCache,
    name: &str,
    sale_price: f64,
    ingredients: &[(i64, f64)],
) -> Result<entities::recipe::Model> {
    recipe::create_recipe(
        db,
        catalog,
        NewRecipe {
            name: name.to_string(),
            description: None,
            sale_price,
            ingredients: ingredients
                .iter()
                .map(|&(ingredient_id, quantity)| RecipeIngredientInput {
                    ingredient_id,
                    quantity,
                    unit: None,
                })
                .collect(),
            additional_costs: Vec::new(),
        },
    )
    .await
}
