//! Margin calculation on top of recipe costs.

use crate::{
    core::{catalog_cache::CatalogCache, costing::recipe_cost},
    entities::recipe,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;

/// Profit of one unit sold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    /// `sale_price - total_cost`
    pub margin: f64,
    /// Margin as a percentage of the sale price, 0 when the price is not positive
    pub margin_percent: f64,
}

/// Computes the absolute and relative margin of a sale.
#[must_use]
pub fn calculate_margin(sale_price: f64, total_cost: f64) -> Margin {
    let margin = sale_price - total_cost;
    let margin_percent = if sale_price > 0.0 {
        margin / sale_price * 100.0
    } else {
        0.0
    };
    Margin {
        margin,
        margin_percent,
    }
}

/// One recipe's line in the margin report.
#[derive(Debug, Clone, Serialize)]
pub struct MarginReportRow {
    /// The recipe
    pub recipe: recipe::Model,
    /// Current unit cost
    pub cost: f64,
    /// Current sale price
    pub sale_price: f64,
    /// Resulting margin
    pub margin: Margin,
}

/// Margin of every recipe at current prices, ordered by recipe name.
pub async fn margin_report(
    db: &DatabaseConnection,
    catalog: &CatalogCache,
) -> Result<Vec<MarginReportRow>> {
    let recipes = catalog.recipes(db).await?;
    let mut rows = Vec::with_capacity(recipes.len());
    for recipe in recipes.iter() {
        let cost = recipe_cost(db, catalog, recipe.id).await?.total_cost;
        rows.push(MarginReportRow {
            recipe: recipe.clone(),
            cost,
            sale_price: recipe.sale_price,
            margin: calculate_margin(recipe.sale_price, cost),
        });
    }
    Ok(rows)
}
