//! Manual stock consumption (waste, tastings, staff use).

use crate::{
    core::{
        catalog_cache::CatalogCache, ingredient::adjust_stock_atomic,
        production::StockShortage, validation::require_positive_quantity,
    },
    entities::{ConsumptionItem, Ingredient, consumption, consumption_item},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// A stored manual consumption with its single item.
#[derive(Debug, Clone)]
pub struct ManualConsumption {
    /// The consumption header
    pub consumption: consumption::Model,
    /// What was withdrawn
    pub item: consumption_item::Model,
}

/// Withdraws `quantity` of an ingredient from stock outside any production run.
///
/// # Errors
/// Returns an error if the quantity is not strictly positive, the ingredient
/// does not exist, or the stock cannot cover the quantity.
pub async fn record_manual_consumption(
    db: &DatabaseConnection,
    catalog: &CatalogCache,
    ingredient_id: i64,
    quantity: f64,
    notes: &str,
    on: NaiveDate,
) -> Result<ManualConsumption> {
    let quantity = require_positive_quantity(quantity)?;

    let txn = db.begin().await?;
    let ingredient = Ingredient::find_by_id(ingredient_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::IngredientNotFound {
            name: ingredient_id.to_string(),
        })?;

    if quantity > ingredient.current_stock {
        return Err(Error::InsufficientStock {
            shortages: vec![StockShortage {
                ingredient_id,
                ingredient_name: ingredient.name,
                unit: ingredient.unit,
                required: quantity,
                available: ingredient.current_stock,
            }],
        });
    }

    let stored = consumption::ActiveModel {
        date: Set(on),
        production_id: Set(None),
        notes: Set(notes.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let item = consumption_item::ActiveModel {
        consumption_id: Set(stored.id),
        ingredient_id: Set(ingredient_id),
        quantity: Set(quantity),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    adjust_stock_atomic(&txn, ingredient_id, -quantity).await?;
    txn.commit().await?;
    catalog.invalidate().await;

    info!(
        "Recorded consumption #{} of {} {} of '{}'",
        stored.id, quantity, ingredient.unit, ingredient.name
    );
    Ok(ManualConsumption {
        consumption: stored,
        item,
    })
}

/// Items of one consumption in insertion order.
pub async fn get_consumption_items(
    db: &DatabaseConnection,
    consumption_id: i64,
) -> Result<Vec<consumption_item::Model>> {
    ConsumptionItem::find()
        .filter(consumption_item::Column::ConsumptionId.eq(consumption_id))
        .order_by_asc(consumption_item::Column::Id)
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
        core::{ingredient::get_ingredient_by_id, today},
        test_utils::*,
    };

    #[tokio::test]
    async fn test_manual_consumption_deducts_stock() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let cache = test_cache();
        let butter = create_custom_ingredient(&db, &cache, "Butter", 9.0, 4.0, 1.0, "kg").await?;

        let recorded =
            record_manual_consumption(&db, &cache, butter.id, 1.5, " tasting ", today()).await?;
        assert_eq!(recorded.consumption.production_id, None);
        assert_eq!(recorded.consumption.notes, "tasting");
        assert_eq!(recorded.item.quantity, 1.5);

        let after = get_ingredient_by_id(&db, butter.id).await?.unwrap();
        assert_eq!(after.current_stock, 2.5);
        assert_eq!(get_consumption_items(&db, recorded.consumption.id).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_manual_consumption_cannot_exceed_stock() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = test_cache();
        let butter = create_custom_ingredient(&db, &cache, "Butter", 9.0, 1.0, 1.0, "kg").await?;

        let result = record_manual_consumption(&db, &cache, butter.id, 2.0, "", today()).await;
        let Err(Error::InsufficientStock { shortages }) = result else {
            panic!("expected InsufficientStock");
        };
        assert_eq!(shortages.len(), 1);
        assert_eq!(shortages[0].missing(), 1.0);
        assert_eq!(
            get_ingredient_by_id(&db, butter.id).await?.unwrap().current_stock,
            1.0
        );

        // Using exactly what is left is allowed
        record_manual_consumption(&db, &cache, butter.id, 1.0, "", today()).await?;
        assert_eq!(
            get_ingredient_by_id(&db, butter.id).await?.unwrap().current_stock,
            0.0
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_manual_consumption_input_errors() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = test_cache();

        let zero = record_manual_consumption(&db, &cache, 1, 0.0, "", today()).await;
        assert!(matches!(zero.unwrap_err(), Error::InvalidQuantity { quantity: _ }));

        let missing = record_manual_consumption(&db, &cache, 1, 1.0, "", today()).await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::IngredientNotFound { name: _ }
        ));

        Ok(())
    }
}
