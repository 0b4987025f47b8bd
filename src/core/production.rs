//! Production runs.
//!
//! Registering a run prices it at the recipe's current unit cost, checks that
//! every ingredient has enough stock for the whole batch, and then records the
//! run together with the stock it consumed.
//!
//! Stock is checked twice: once against the cached catalog to reject obvious
//! shortages early, and again inside the write transaction against fresh rows.
//! The deduction itself is a relative `UPDATE`, so two runs committing close
//! together cannot overwrite each other's withdrawal.

use crate::{
    core::{
        catalog_cache::CatalogCache,
        costing::{RecipeCost, list_recipe_ingredient_rows, recipe_cost},
        ingredient::adjust_stock_atomic,
    },
    entities::{
        Ingredient, Production, Recipe, consumption, consumption_item, ingredient, production,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// An ingredient that cannot cover a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockShortage {
    /// Ingredient that is short
    pub ingredient_id: i64,
    /// Its name, for messages
    pub ingredient_name: String,
    /// Unit of the amounts below
    pub unit: String,
    /// Amount the request needs
    pub required: f64,
    /// Amount in stock
    pub available: f64,
}

impl StockShortage {
    /// How much is missing.
    #[must_use]
    pub fn missing(&self) -> f64 {
        self.required - self.available
    }
}

/// Total amount of one ingredient a batch needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Requirement {
    /// Ingredient needed
    pub ingredient_id: i64,
    /// Amount for the whole batch
    pub required: f64,
}

/// A registered run with the stock withdrawal it caused.
#[derive(Debug, Clone)]
pub struct ProductionRecord {
    /// The stored run
    pub production: production::Model,
    /// The consumption linked to it
    pub consumption: consumption::Model,
    /// Cost of one unit at registration time
    pub unit_cost: f64,
    /// Cost breakdown scaled to the batch size
    pub cost: RecipeCost,
}

/// Sums per-unit recipe lines into batch requirements, one per ingredient,
/// in the order each ingredient first appears.
#[must_use]
pub fn batch_requirements(
    lines: &[(i64, f64)],
    batch_size: f64,
) -> Vec<Requirement> {
    let mut requirements: Vec<Requirement> = Vec::new();
    for &(ingredient_id, per_unit) in lines {
        let amount = per_unit * batch_size;
        match requirements
            .iter_mut()
            .find(|r| r.ingredient_id == ingredient_id)
        {
            Some(existing) => existing.required += amount,
            None => requirements.push(Requirement {
                ingredient_id,
                required: amount,
            }),
        }
    }
    requirements
}

/// Every requirement the given stock levels cannot cover.
///
/// Requirements whose ingredient is unknown to `stock` are ignored, matching
/// how the cost calculator treats deleted ingredients.
#[must_use]
pub fn find_shortages(
    requirements: &[Requirement],
    stock: &HashMap<i64, ingredient::Model>,
) -> Vec<StockShortage> {
    requirements
        .iter()
        .filter_map(|req| {
            let ingredient = stock.get(&req.ingredient_id)?;
            (req.required > ingredient.current_stock).then(|| StockShortage {
                ingredient_id: ingredient.id,
                ingredient_name: ingredient.name.clone(),
                unit: ingredient.unit.clone(),
                required: req.required,
                available: ingredient.current_stock,
            })
        })
        .collect()
}

/// Registers a production run of `quantity` units of a recipe.
///
/// # Errors
/// Returns an error if:
/// - `quantity` is below 1 (`Error::InvalidQuantity`)
/// - The recipe does not exist (`Error::RecipeNotFound`)
/// - Any ingredient is short; every shortage is reported (`Error::InsufficientStock`)
/// - The database operation fails
pub async fn register_production(
    db: &DatabaseConnection,
    catalog: &CatalogCache,
    recipe_id: i64,
    quantity: i64,
    notes: &str,
    on: NaiveDate,
) -> Result<ProductionRecord> {
    #[allow(clippy::cast_precision_loss)]
    let batch_size = quantity as f64;
    if quantity < 1 {
        return Err(Error::InvalidQuantity {
            quantity: batch_size,
        });
    }

    let recipe = Recipe::find_by_id(recipe_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::RecipeNotFound {
            name: recipe_id.to_string(),
        })?;

    let unit_cost = recipe_cost(db, catalog, recipe_id).await?;
    let lines: Vec<(i64, f64)> = list_recipe_ingredient_rows(db, recipe_id)
        .await?
        .into_iter()
        .map(|row| (row.ingredient_id, row.quantity))
        .collect();

    let cached: HashMap<i64, ingredient::Model> = catalog
        .ingredients(db)
        .await?
        .iter()
        .map(|i| (i.id, i.clone()))
        .collect();
    let requirements: Vec<Requirement> = batch_requirements(&lines, batch_size)
        .into_iter()
        .filter(|req| {
            let known = cached.contains_key(&req.ingredient_id);
            if !known {
                warn!(
                    "Recipe '{}' references missing ingredient {}, nothing withdrawn for it",
                    recipe.name, req.ingredient_id
                );
            }
            known
        })
        .collect();

    let shortages = find_shortages(&requirements, &cached);
    if !shortages.is_empty() {
        return Err(Error::InsufficientStock { shortages });
    }

    let txn = db.begin().await?;

    let ids: Vec<i64> = requirements.iter().map(|r| r.ingredient_id).collect();
    let fresh: HashMap<i64, ingredient::Model> = Ingredient::find()
        .filter(ingredient::Column::Id.is_in(ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|i| (i.id, i))
        .collect();
    let shortages = find_shortages(&requirements, &fresh);
    if !shortages.is_empty() {
        return Err(Error::InsufficientStock { shortages });
    }

    let now = chrono::Utc::now();
    let total_cost = unit_cost.total_cost * batch_size;
    let stored = production::ActiveModel {
        recipe_id: Set(recipe_id),
        date: Set(on),
        quantity: Set(quantity),
        total_cost: Set(total_cost),
        notes: Set(notes.trim().to_string()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let withdrawal = consumption::ActiveModel {
        date: Set(on),
        production_id: Set(Some(stored.id)),
        notes: Set(format!("Consumption for production #{}", stored.id)),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for req in &requirements {
        // Deleted since the check above; same as a dangling recipe line
        if !fresh.contains_key(&req.ingredient_id) {
            continue;
        }
        consumption_item::ActiveModel {
            consumption_id: Set(withdrawal.id),
            ingredient_id: Set(req.ingredient_id),
            quantity: Set(req.required),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        adjust_stock_atomic(&txn, req.ingredient_id, -req.required).await?;
    }

    txn.commit().await?;
    catalog.invalidate().await;

    info!(
        "Registered production #{}: {} x '{}' at {} each (total {})",
        stored.id, quantity, recipe.name, unit_cost.total_cost, total_cost
    );
    Ok(ProductionRecord {
        production: stored,
        consumption: withdrawal,
        unit_cost: unit_cost.total_cost,
        cost: unit_cost.scaled(batch_size),
    })
}

/// Production runs dated within `from..=to`, oldest first.
pub async fn list_productions(
    db: &DatabaseConnection,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<production::Model>> {
    Production::find()
        .filter(production::Column::Date.between(from, to))
        .order_by_asc(production::Column::Date)
        .order_by_asc(production::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::{consumption::get_consumption_items, ingredient::get_ingredient_by_id, today},
        entities::ConsumptionItem,
        test_utils::*,
    };
    use sea_orm::PaginatorTrait;

    fn stock_of(name: &str, id: i64, current_stock: f64) -> ingredient::Model {
        let now = chrono::Utc::now();
        ingredient::Model {
            id,
            name: name.to_string(),
            category_id: None,
            unit_price: 1.0,
            current_stock,
            minimum_stock: 0.0,
            unit: "kg".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_batch_requirements_merge_repeated_ingredients() {
        let requirements = batch_requirements(&[(1, 0.5), (2, 0.1), (1, 0.25)], 4.0);
        assert_eq!(
            requirements,
            vec![
                Requirement {
                    ingredient_id: 1,
                    required: 3.0
                },
                Requirement {
                    ingredient_id: 2,
                    required: 0.4
                },
            ]
        );
    }

    #[test]
    fn test_find_shortages_reports_every_short_ingredient() {
        let stock: HashMap<i64, ingredient::Model> = [
            (1, stock_of("Flour", 1, 10.0)),
            (2, stock_of("Butter", 2, 1.0)),
            (3, stock_of("Sugar", 3, 0.0)),
        ]
        .into_iter()
        .collect();
        let requirements = vec![
            Requirement {
                ingredient_id: 1,
                required: 10.0,
            },
            Requirement {
                ingredient_id: 2,
                required: 1.5,
            },
            Requirement {
                ingredient_id: 3,
                required: 2.0,
            },
            Requirement {
                ingredient_id: 9,
                required: 100.0,
            },
        ];

        let shortages = find_shortages(&requirements, &stock);
        assert_eq!(shortages.len(), 2);
        assert_eq!(shortages[0].ingredient_name, "Butter");
        assert_eq!(shortages[0].missing(), 0.5);
        assert_eq!(shortages[1].ingredient_name, "Sugar");
        assert_eq!(shortages[1].available, 0.0);
    }

    #[tokio::test]
    async fn test_register_production_deducts_stock() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let cache = test_cache();
        let flour = create_custom_ingredient(&db, &cache, "Flour", 2.5, 10.0, 1.0, "kg").await?;
        let sugar = create_custom_ingredient(&db, &cache, "Sugar", 4.0, 5.0, 1.0, "kg").await?;
        let bread = create_test_recipe(
            &db,
            &cache,
            "Bread",
            20.0,
            &[(flour.id, 2.0), (sugar.id, 0.5)],
        )
        .await?;

        let record = register_production(&db, &cache, bread.id, 3, " morning batch ", today()).await?;

        assert_eq!(record.unit_cost, 7.0);
        assert_eq!(record.production.total_cost, 21.0);
        assert_eq!(record.production.quantity, 3);
        assert_eq!(record.production.notes, "morning batch");
        assert_eq!(record.cost.total_cost, 21.0);
        assert_eq!(record.cost.line_items[0].quantity, 6.0);
        assert_eq!(record.cost.line_items[1].quantity, 1.5);

        assert_eq!(record.consumption.production_id, Some(record.production.id));
        assert_eq!(
            record.consumption.notes,
            format!("Consumption for production #{}", record.production.id)
        );
        let items = get_consumption_items(&db, record.consumption.id).await?;
        assert_eq!(items.len(), 2);

        assert_eq!(get_ingredient_by_id(&db, flour.id).await?.unwrap().current_stock, 4.0);
        assert_eq!(get_ingredient_by_id(&db, sugar.id).await?.unwrap().current_stock, 3.5);
        // The cache sees the deduction too
        assert_eq!(cache.ingredient(&db, flour.id).await?.unwrap().current_stock, 4.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_register_production_rejects_whole_run_on_shortage() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = test_cache();
        let flour = create_custom_ingredient(&db, &cache, "Flour", 2.5, 3.0, 1.0, "kg").await?;
        let eggs = create_custom_ingredient(&db, &cache, "Eggs", 0.5, 4.0, 1.0, "unit").await?;
        let salt = create_custom_ingredient(&db, &cache, "Salt", 0.8, 10.0, 1.0, "kg").await?;
        let cake = create_test_recipe(
            &db,
            &cache,
            "Cake",
            30.0,
            &[(flour.id, 1.0), (eggs.id, 3.0), (salt.id, 0.01)],
        )
        .await?;

        let result = register_production(&db, &cache, cake.id, 2, "", today()).await;
        let Err(Error::InsufficientStock { shortages }) = result else {
            panic!("expected InsufficientStock");
        };
        assert_eq!(shortages.len(), 1);
        assert_eq!(shortages[0].ingredient_name, "Eggs");
        assert_eq!(shortages[0].required, 6.0);
        assert_eq!(shortages[0].available, 4.0);
        assert_eq!(shortages[0].missing(), 2.0);

        // Nothing was written
        assert_eq!(get_ingredient_by_id(&db, flour.id).await?.unwrap().current_stock, 3.0);
        assert_eq!(get_ingredient_by_id(&db, salt.id).await?.unwrap().current_stock, 10.0);
        assert!(list_productions(&db, today(), today()).await?.is_empty());
        assert_eq!(ConsumptionItem::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_stale_cache_is_caught_inside_transaction() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = test_cache();
        let flour = create_custom_ingredient(&db, &cache, "Flour", 2.5, 10.0, 1.0, "kg").await?;
        let bread = create_test_recipe(&db, &cache, "Bread", 20.0, &[(flour.id, 2.0)]).await?;

        // Warm the cache, then drain stock behind its back
        cache.ingredients(&db).await?;
        adjust_stock_atomic(&db, flour.id, -9.0).await?;

        let result = register_production(&db, &cache, bread.id, 1, "", today()).await;
        let Err(Error::InsufficientStock { shortages }) = result else {
            panic!("expected InsufficientStock");
        };
        assert_eq!(shortages[0].available, 1.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_register_production_input_errors() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = test_cache();
        let flour = create_test_ingredient(&db, &cache, "Flour", 2.5).await?;
        let bread = create_test_recipe(&db, &cache, "Bread", 20.0, &[(flour.id, 2.0)]).await?;

        let zero = register_production(&db, &cache, bread.id, 0, "", today()).await;
        assert!(matches!(zero.unwrap_err(), Error::InvalidQuantity { quantity: _ }));

        let unknown = register_production(&db, &cache, bread.id + 40, 1, "", today()).await;
        assert!(matches!(unknown.unwrap_err(), Error::RecipeNotFound { name: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_dangling_ingredient_is_not_withdrawn() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = test_cache();
        let flour = create_custom_ingredient(&db, &cache, "Flour", 2.5, 10.0, 1.0, "kg").await?;
        let saffron = create_custom_ingredient(&db, &cache, "Saffron", 90.0, 0.0, 0.0, "g").await?;
        let bread = create_test_recipe(
            &db,
            &cache,
            "Bread",
            20.0,
            &[(flour.id, 1.0), (saffron.id, 5.0)],
        )
        .await?;
        crate::core::ingredient::delete_ingredient(&db, &cache, saffron.id).await?;

        let record = register_production(&db, &cache, bread.id, 2, "", today()).await?;
        assert_eq!(record.unit_cost, 2.5);
        assert_eq!(get_consumption_items(&db, record.consumption.id).await?.len(), 1);
        assert_eq!(get_ingredient_by_id(&db, flour.id).await?.unwrap().current_stock, 8.0);

        Ok(())
    }
}
