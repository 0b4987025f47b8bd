//! Catalog seeding from `config.toml`.
//!
//! Seeding only ever inserts. Entries whose name already exists are left
//! untouched, so prices and stock edited through the bot survive a restart.

use crate::{
    config::catalog::CatalogConfig,
    core::{
        catalog_cache::CatalogCache,
        category::{create_category, get_category_by_name},
        ingredient::{NewIngredient, create_ingredient, get_ingredient_by_name},
    },
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use tracing::{debug, info};

/// What a seeding pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Categories inserted
    pub categories_created: usize,
    /// Ingredients inserted
    pub ingredients_created: usize,
    /// Entries skipped because they already existed
    pub skipped: usize,
}

/// Inserts the configured categories and ingredients that are missing.
///
/// # Errors
/// Returns `Error::Config` if an ingredient names a category that is neither
/// configured nor stored, and any error from the underlying inserts.
pub async fn seed_catalog(
    db: &DatabaseConnection,
    catalog: &CatalogCache,
    config: &CatalogConfig,
) -> Result<SeedSummary> {
    info!(
        "Seeding catalog: {} categories and {} ingredients configured.",
        config.categories.len(),
        config.ingredients.len()
    );
    let mut summary = SeedSummary::default();

    for category in &config.categories {
        if get_category_by_name(db, &category.name).await?.is_some() {
            debug!("Category '{}' already exists. Skipping.", category.name);
            summary.skipped += 1;
            continue;
        }
        create_category(db, &category.name).await?;
        summary.categories_created += 1;
    }

    for entry in &config.ingredients {
        if get_ingredient_by_name(db, &entry.name).await?.is_some() {
            debug!("Ingredient '{}' already exists. Skipping.", entry.name);
            summary.skipped += 1;
            continue;
        }

        let category_id = match entry.category.as_deref() {
            Some(name) => Some(
                get_category_by_name(db, name)
                    .await?
                    .ok_or_else(|| Error::Config {
                        message: format!(
                            "Ingredient '{}' refers to unknown category '{name}'",
                            entry.name
                        ),
                    })?
                    .id,
            ),
            None => None,
        };

        create_ingredient(
            db,
            catalog,
            NewIngredient {
                name: entry.name.clone(),
                category_id,
                unit_price: entry.unit_price,
                current_stock: entry.current_stock,
                minimum_stock: entry.minimum_stock,
                unit: entry.unit.clone(),
            },
        )
        .await?;
        summary.ingredients_created += 1;
    }

    info!(
        "Catalog seeded: {} categories and {} ingredients created, {} skipped.",
        summary.categories_created, summary.ingredients_created, summary.skipped
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        config::catalog::parse_config,
        core::ingredient::{IngredientFilter, list_ingredients, update_ingredient_price},
        test_utils::*,
    };

    const SEED: &str = r#"
        [[categories]]
        name = "Flours"

        [[categories]]
        name = "Dairy"

        [[ingredients]]
        name = "Wheat flour"
        category = "Flours"
        unit_price = 2.5
        unit = "kg"
        current_stock = 25.0
        minimum_stock = 5.0

        [[ingredients]]
        name = "Butter"
        category = "Dairy"
        unit_price = 9.0
        unit = "kg"
    "#;

    #[tokio::test]
    async fn test_seed_inserts_missing_entries_once() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let cache = test_cache();
        let config = parse_config(SEED)?;

        let first = seed_catalog(&db, &cache, &config).await?;
        assert_eq!(
            first,
            SeedSummary {
                categories_created: 2,
                ingredients_created: 2,
                skipped: 0,
            }
        );

        let flour = get_ingredient_by_name(&db, "Wheat flour").await?.unwrap();
        update_ingredient_price(&db, &cache, flour.id, 3.1).await?;

        let second = seed_catalog(&db, &cache, &config).await?;
        assert_eq!(second.skipped, 4);
        assert_eq!(second.ingredients_created, 0);

        // The edited price survives reseeding
        let flour = get_ingredient_by_name(&db, "Wheat flour").await?.unwrap();
        assert_eq!(flour.unit_price, 3.1);
        assert!(flour.category_id.is_some());
        assert_eq!(
            list_ingredients(&db, &IngredientFilter::default()).await?.len(),
            2
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_rejects_unknown_category() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = test_cache();
        let config = parse_config(
            r#"
            [[ingredients]]
            name = "Cocoa"
            category = "Imports"
            unit_price = 30.0
            unit = "kg"
        "#,
        )?;

        let result = seed_catalog(&db, &cache, &config).await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        Ok(())
    }
}
