//! Price history log for ingredients.

use crate::{
    entities::{PriceHistory, price_history},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Appends one price entry for an ingredient.
///
/// Generic over the connection so it can join the caller's transaction.
pub async fn record_price<C>(
    db: &C,
    ingredient_id: i64,
    price: f64,
    on: NaiveDate,
) -> Result<price_history::Model>
where
    C: ConnectionTrait,
{
    let entry = price_history::ActiveModel {
        ingredient_id: Set(ingredient_id),
        price: Set(price),
        recorded_on: Set(on),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(entry)
}

/// Every recorded price of an ingredient, oldest first.
pub async fn get_price_history(
    db: &DatabaseConnection,
    ingredient_id: i64,
) -> Result<Vec<price_history::Model>> {
    PriceHistory::find()
        .filter(price_history::Column::IngredientId.eq(ingredient_id))
        .order_by_asc(price_history::Column::RecordedOn)
        .order_by_asc(price_history::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
