//! Ingredient business logic - registration, lookup, pricing and stock levels.
//!
//! Every price change goes through [`apply_price_change`], which keeps the price
//! history log in step with `unit_price`. Stock changes use
//! [`adjust_stock_atomic`] so concurrent writers never overwrite each other's
//! deltas.

use crate::{
    core::{
        catalog_cache::CatalogCache,
        price_history, today,
        validation::{
            require_name, require_non_negative_quantity, require_positive_amount,
        },
    },
    entities::{Ingredient, PriceHistory, ingredient, price_history as price_history_entity},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::info;

/// Input for registering a new ingredient.
#[derive(Debug, Clone)]
pub struct NewIngredient {
    /// Unique name
    pub name: String,
    /// Optional category
    pub category_id: Option<i64>,
    /// Initial unit price, must be positive
    pub unit_price: f64,
    /// Opening stock
    pub current_stock: f64,
    /// Minimum stock before the ingredient is reported as low
    pub minimum_stock: f64,
    /// Unit of measure
    pub unit: String,
}

/// Optional narrowing for [`list_ingredients`].
#[derive(Debug, Clone, Default)]
pub struct IngredientFilter {
    /// Only ingredients of this category
    pub category_id: Option<i64>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
}

/// Registers a new ingredient and records its opening price in the price history.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or already used
/// - The price is not strictly positive
/// - A stock level is negative
/// - The unit is empty
/// - The database insert fails
pub async fn create_ingredient(
    db: &DatabaseConnection,
    catalog: &CatalogCache,
    new: NewIngredient,
) -> Result<ingredient::Model> {
    let name = require_name(&new.name, "Ingredient")?;
    let unit_price = require_positive_amount(new.unit_price)?;
    let current_stock = require_non_negative_quantity(new.current_stock)?;
    let minimum_stock = require_non_negative_quantity(new.minimum_stock)?;
    let unit = require_name(&new.unit, "Unit")?;

    if get_ingredient_by_name(db, &name).await?.is_some() {
        return Err(Error::Validation {
            message: format!("An ingredient named '{name}' already exists"),
        });
    }

    let txn = db.begin().await?;
    let now = chrono::Utc::now();
    let created = ingredient::ActiveModel {
        name: Set(name),
        category_id: Set(new.category_id),
        unit_price: Set(unit_price),
        current_stock: Set(current_stock),
        minimum_stock: Set(minimum_stock),
        unit: Set(unit),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    price_history::record_price(&txn, created.id, unit_price, today()).await?;
    txn.commit().await?;
    catalog.invalidate().await;

    info!(
        "Registered ingredient '{}' (ID: {}) at {} per {}",
        created.name, created.id, created.unit_price, created.unit
    );
    Ok(created)
}

/// Finds an ingredient by its unique ID.
pub async fn get_ingredient_by_id(
    db: &DatabaseConnection,
    ingredient_id: i64,
) -> Result<Option<ingredient::Model>> {
    Ingredient::find_by_id(ingredient_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an ingredient by its exact name.
pub async fn get_ingredient_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<ingredient::Model>> {
    Ingredient::find()
        .filter(ingredient::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists ingredients ordered by name, optionally filtered by category and name.
pub async fn list_ingredients(
    db: &DatabaseConnection,
    filter: &IngredientFilter,
) -> Result<Vec<ingredient::Model>> {
    let mut query = Ingredient::find().order_by_asc(ingredient::Column::Name);
    if let Some(category_id) = filter.category_id {
        query = query.filter(ingredient::Column::CategoryId.eq(category_id));
    }
    let ingredients = query.all(db).await?;

    let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(ingredients);
    };
    let needle = search.to_lowercase();
    Ok(ingredients
        .into_iter()
        .filter(|i| i.name.to_lowercase().contains(&needle))
        .collect())
}

/// Ingredients whose stock has fallen below their minimum, ordered by name.
pub async fn low_stock_ingredients(db: &DatabaseConnection) -> Result<Vec<ingredient::Model>> {
    Ingredient::find()
        .filter(
            Expr::col(ingredient::Column::CurrentStock)
                .lt(Expr::col(ingredient::Column::MinimumStock)),
        )
        .order_by_asc(ingredient::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sets a new unit price, appending to the price history when it changes.
///
/// # Errors
/// Returns an error if the price is not strictly positive, the ingredient does
/// not exist, or the update fails.
pub async fn update_ingredient_price(
    db: &DatabaseConnection,
    catalog: &CatalogCache,
    ingredient_id: i64,
    new_price: f64,
) -> Result<ingredient::Model> {
    let new_price = require_positive_amount(new_price)?;

    let txn = db.begin().await?;
    let current = Ingredient::find_by_id(ingredient_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::IngredientNotFound {
            name: ingredient_id.to_string(),
        })?;
    let updated = apply_price_change(&txn, current, new_price, today()).await?;
    txn.commit().await?;
    catalog.invalidate().await;

    Ok(updated)
}

/// Writes `new_price` to the ingredient and logs it, unless it is unchanged.
///
/// Shared by manual price updates and purchases so the two can never disagree
/// on when a history row is due.
pub(crate) async fn apply_price_change<C>(
    db: &C,
    current: ingredient::Model,
    new_price: f64,
    on: NaiveDate,
) -> Result<ingredient::Model>
where
    C: ConnectionTrait,
{
    #[allow(clippy::float_cmp)]
    let unchanged = current.unit_price == new_price;
    if unchanged {
        return Ok(current);
    }

    let old_price = current.unit_price;
    let mut active: ingredient::ActiveModel = current.into();
    active.unit_price = Set(new_price);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(db).await?;

    price_history::record_price(db, updated.id, new_price, on).await?;
    info!(
        "Price of '{}' changed from {} to {}",
        updated.name, old_price, new_price
    );
    Ok(updated)
}

/// Atomically adds `delta` to an ingredient's stock (negative to withdraw).
///
/// Uses a single `UPDATE ingredients SET current_stock = current_stock + delta`
/// instead of read-modify-write, so concurrent deltas are never lost.
pub async fn adjust_stock_atomic<C>(
    db: &C,
    ingredient_id: i64,
    delta: f64,
) -> Result<ingredient::Model>
where
    C: ConnectionTrait,
{
    let result = Ingredient::update_many()
        .col_expr(
            ingredient::Column::CurrentStock,
            Expr::col(ingredient::Column::CurrentStock).add(delta),
        )
        .col_expr(
            ingredient::Column::UpdatedAt,
            Expr::value(chrono::Utc::now()),
        )
        .filter(ingredient::Column::Id.eq(ingredient_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::IngredientNotFound {
            name: ingredient_id.to_string(),
        });
    }

    Ingredient::find_by_id(ingredient_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::IngredientNotFound {
            name: ingredient_id.to_string(),
        })
}

/// Removes an ingredient and its price history.
///
/// Recipe lines that mention the ingredient are left in place; the cost
/// calculator skips them from then on.
///
/// # Errors
/// Returns `Error::IngredientNotFound` if there is nothing to delete.
pub async fn delete_ingredient(
    db: &DatabaseConnection,
    catalog: &CatalogCache,
    ingredient_id: i64,
) -> Result<()> {
    let txn = db.begin().await?;
    PriceHistory::delete_many()
        .filter(price_history_entity::Column::IngredientId.eq(ingredient_id))
        .exec(&txn)
        .await?;
    let result = Ingredient::delete_by_id(ingredient_id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(Error::IngredientNotFound {
            name: ingredient_id.to_string(),
        });
    }
    txn.commit().await?;
    catalog.invalidate().await;

    info!("Deleted ingredient ID {ingredient_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn flour() -> NewIngredient {
        NewIngredient {
            name: "Flour".to_string(),
            category_id: None,
            unit_price: 2.5,
            current_stock: 20.0,
            minimum_stock: 5.0,
            unit: "kg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_ingredient_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let cache = test_cache();

        let result = create_ingredient(
            &db,
            &cache,
            NewIngredient {
                name: "  ".to_string(),
                ..flour()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        let result = create_ingredient(
            &db,
            &cache,
            NewIngredient {
                unit_price: 0.0,
                ..flour()
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: 0.0 }
        ));

        let result = create_ingredient(
            &db,
            &cache,
            NewIngredient {
                current_stock: -1.0,
                ..flour()
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidQuantity { quantity: -1.0 }
        ));

        let result = create_ingredient(
            &db,
            &cache,
            NewIngredient {
                unit: String::new(),
                ..flour()
            },
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_ingredient_records_opening_price() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let cache = test_cache();

        let created = create_ingredient(&db, &cache, flour()).await?;
        assert_eq!(created.name, "Flour");
        assert_eq!(created.unit_price, 2.5);
        assert_eq!(created.current_stock, 20.0);

        let history = price_history::get_price_history(&db, created.id).await?;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].price, 2.5);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_ingredient_rejects_duplicate_name() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = test_cache();

        create_ingredient(&db, &cache, flour()).await?;
        let result = create_ingredient(&db, &cache, flour()).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_ingredients_filters() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = test_cache();
        let flours = crate::core::category::create_category(&db, "Flours").await?;

        create_ingredient(
            &db,
            &cache,
            NewIngredient {
                name: "Wheat Flour".to_string(),
                category_id: Some(flours.id),
                ..flour()
            },
        )
        .await?;
        create_ingredient(
            &db,
            &cache,
            NewIngredient {
                name: "Rye Flour".to_string(),
                category_id: Some(flours.id),
                ..flour()
            },
        )
        .await?;
        create_test_ingredient(&db, &cache, "Butter", 9.0).await?;

        let all = list_ingredients(&db, &IngredientFilter::default()).await?;
        let names: Vec<_> = all.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Butter", "Rye Flour", "Wheat Flour"]);

        let by_category = list_ingredients(
            &db,
            &IngredientFilter {
                category_id: Some(flours.id),
                search: None,
            },
        )
        .await?;
        assert_eq!(by_category.len(), 2);

        let searched = list_ingredients(
            &db,
            &IngredientFilter {
                category_id: None,
                search: Some("wheat".to_string()),
            },
        )
        .await?;
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].name, "Wheat Flour");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_price_appends_history_only_on_change() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = test_cache();
        let created = create_ingredient(&db, &cache, flour()).await?;

        // Warm the cache so the invalidation is observable
        assert_eq!(cache.ingredient(&db, created.id).await?.unwrap().unit_price, 2.5);

        let updated = update_ingredient_price(&db, &cache, created.id, 3.0).await?;
        assert_eq!(updated.unit_price, 3.0);
        assert_eq!(cache.ingredient(&db, created.id).await?.unwrap().unit_price, 3.0);

        update_ingredient_price(&db, &cache, created.id, 3.0).await?;
        let history = price_history::get_price_history(&db, created.id).await?;
        assert_eq!(history.len(), 2);

        let result = update_ingredient_price(&db, &cache, created.id + 99, 1.0).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::IngredientNotFound { name: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_low_stock_ingredients() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = test_cache();
        create_custom_ingredient(&db, &cache, "Sugar", 1.2, 2.0, 5.0, "kg").await?;
        create_custom_ingredient(&db, &cache, "Salt", 0.8, 5.0, 5.0, "kg").await?;
        create_custom_ingredient(&db, &cache, "Yeast", 6.0, 10.0, 1.0, "kg").await?;

        let low = low_stock_ingredients(&db).await?;
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].name, "Sugar");

        Ok(())
    }

    #[tokio::test]
    async fn test_adjust_stock_atomic() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = test_cache();
        let created = create_ingredient(&db, &cache, flour()).await?;

        let after_add = adjust_stock_atomic(&db, created.id, 5.0).await?;
        assert_eq!(after_add.current_stock, 25.0);
        let after_withdraw = adjust_stock_atomic(&db, created.id, -7.5).await?;
        assert_eq!(after_withdraw.current_stock, 17.5);

        let missing = adjust_stock_atomic(&db, created.id + 10, 1.0).await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::IngredientNotFound { name: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_ingredient() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = test_cache();
        let created = create_ingredient(&db, &cache, flour()).await?;

        delete_ingredient(&db, &cache, created.id).await?;
        assert!(get_ingredient_by_id(&db, created.id).await?.is_none());
        assert!(cache.ingredient(&db, created.id).await?.is_none());
        assert!(price_history::get_price_history(&db, created.id).await?.is_empty());

        let again = delete_ingredient(&db, &cache, created.id).await;
        assert!(matches!(
            again.unwrap_err(),
            Error::IngredientNotFound { name: _ }
        ));

        Ok(())
    }
}
