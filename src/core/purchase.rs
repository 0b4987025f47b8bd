//! Purchases of raw materials.
//!
//! A purchase raises the stock of every ingredient it covers and makes the
//! price paid the ingredient's current unit price.

use crate::{
    core::{
        catalog_cache::CatalogCache,
        ingredient::{adjust_stock_atomic, apply_price_change},
        validation::{require_positive_amount, require_positive_quantity},
    },
    entities::{Ingredient, Purchase, PurchaseItem, purchase, purchase::PurchaseKind, purchase_item},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// One ingredient bought.
#[derive(Debug, Clone)]
pub struct PurchaseItemInput {
    /// Ingredient bought
    pub ingredient_id: i64,
    /// Amount bought, in the ingredient's unit
    pub quantity: f64,
    /// Price paid per unit
    pub unit_price: f64,
}

/// Input for [`create_purchase`].
#[derive(Debug, Clone)]
pub struct NewPurchase {
    /// Business date of the purchase
    pub date: NaiveDate,
    /// Supplier name, may be empty
    pub supplier: String,
    /// Regular restock or extra purchase
    pub kind: PurchaseKind,
    /// Free-text notes
    pub notes: String,
    /// At least one item
    pub items: Vec<PurchaseItemInput>,
}

/// A stored purchase with its items.
#[derive(Debug, Clone)]
pub struct PurchaseReceipt {
    /// The purchase header
    pub purchase: purchase::Model,
    /// Items in input order
    pub items: Vec<purchase_item::Model>,
}

/// Rounds a currency amount to cents.
#[must_use]
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Records a purchase, raises stock and refreshes unit prices.
///
/// Each item subtotal is `quantity × unit_price` rounded to cents, and the
/// purchase total is the sum of those subtotals. All writes happen in one
/// transaction.
///
/// # Errors
/// Returns an error if:
/// - There are no items (`Error::EmptyPurchase`)
/// - A quantity or unit price is not strictly positive
/// - An ingredient does not exist
/// - The database operation fails
pub async fn create_purchase(
    db: &DatabaseConnection,
    catalog: &CatalogCache,
    new: NewPurchase,
) -> Result<PurchaseReceipt> {
    if new.items.is_empty() {
        return Err(Error::EmptyPurchase);
    }
    for item in &new.items {
        require_positive_quantity(item.quantity)?;
        require_positive_amount(item.unit_price)?;
    }

    let subtotals: Vec<f64> = new
        .items
        .iter()
        .map(|item| round_to_cents(item.quantity * item.unit_price))
        .collect();
    let total: f64 = subtotals.iter().sum();

    let txn = db.begin().await?;
    let stored = purchase::ActiveModel {
        date: Set(new.date),
        supplier: Set(new.supplier.trim().to_string()),
        kind: Set(new.kind),
        notes: Set(new.notes.trim().to_string()),
        total: Set(total),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(new.items.len());
    for (item, subtotal) in new.items.into_iter().zip(subtotals) {
        if Ingredient::find_by_id(item.ingredient_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(Error::IngredientNotFound {
                name: item.ingredient_id.to_string(),
            });
        }

        let restocked = adjust_stock_atomic(&txn, item.ingredient_id, item.quantity).await?;
        apply_price_change(&txn, restocked, item.unit_price, new.date).await?;

        let line = purchase_item::ActiveModel {
            purchase_id: Set(stored.id),
            ingredient_id: Set(item.ingredient_id),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            subtotal: Set(subtotal),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        items.push(line);
    }

    txn.commit().await?;
    catalog.invalidate().await;

    info!(
        "Recorded {} purchase #{} from '{}' with {} item(s), total {}",
        stored.kind.as_str(),
        stored.id,
        stored.supplier,
        items.len(),
        stored.total
    );
    Ok(PurchaseReceipt {
        purchase: stored,
        items,
    })
}

/// Purchases dated within `from..=to`, oldest first.
pub async fn list_purchases(
    db: &DatabaseConnection,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<purchase::Model>> {
    Purchase::find()
        .filter(purchase::Column::Date.between(from, to))
        .order_by_asc(purchase::Column::Date)
        .order_by_asc(purchase::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Items of one purchase in the order they were entered.
pub async fn get_purchase_items(
    db: &DatabaseConnection,
    purchase_id: i64,
) -> Result<Vec<purchase_item::Model>> {
    PurchaseItem::find()
        .filter(purchase_item::Column::PurchaseId.eq(purchase_id))
        .order_by_asc(purchase_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
