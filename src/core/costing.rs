//! Recipe cost calculation.
//!
//! The unit cost of a recipe is never stored. It is recomputed on every request
//! from the recipe's ingredient lines at their *current* unit prices, plus the
//! recipe's flat additional costs:
//!
//! ```text
//! total = Σ quantity × unit_price   (one line per ingredient)
//!       + Σ cost                    (one line per additional cost)
//! ```
//!
//! Data access goes through the [`RecipeCostSource`] port so the calculation can
//! be exercised without a database. Missing data never raises: an unknown
//! recipe costs zero with no lines, and a recipe line whose ingredient was
//! deleted is skipped.

use crate::{
    core::catalog_cache::CatalogCache,
    entities::{RecipeAdditionalCost, RecipeIngredient, ingredient, recipe_additional_cost, recipe_ingredient},
    errors::Result,
};
use sea_orm::{DatabaseConnection, QueryOrder, prelude::*};
use serde::Serialize;
use tracing::{debug, warn};

/// Unit shown on additional cost lines.
pub const FLAT_COST_UNIT: &str = "service";

/// One row of a cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    /// Ingredient name or additional cost concept
    pub label: String,
    /// Amount used, 1 for flat costs
    pub quantity: f64,
    /// Unit of `quantity`
    pub unit: String,
    /// Price per unit at calculation time
    pub unit_price: f64,
    /// `quantity × unit_price`, unrounded
    pub subtotal: f64,
}

/// Cost of one unit of a recipe with its breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeCost {
    /// Recipe the cost was computed for
    pub recipe_id: i64,
    /// Sum of all line subtotals
    pub total_cost: f64,
    /// Ingredient lines in recipe order, then additional cost lines
    pub line_items: Vec<LineItem>,
}

impl RecipeCost {
    /// A zero cost with no lines.
    #[must_use]
    pub const fn empty(recipe_id: i64) -> Self {
        Self {
            recipe_id,
            total_cost: 0.0,
            line_items: Vec::new(),
        }
    }

    /// True when nothing contributed to the cost.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// The same breakdown for `quantity` units.
    #[must_use]
    pub fn scaled(&self, quantity: f64) -> Self {
        let line_items: Vec<LineItem> = self
            .line_items
            .iter()
            .map(|line| LineItem {
                quantity: line.quantity * quantity,
                subtotal: line.subtotal * quantity,
                ..line.clone()
            })
            .collect();
        Self {
            recipe_id: self.recipe_id,
            total_cost: self.total_cost * quantity,
            line_items,
        }
    }
}

/// Read access the cost calculator needs.
///
/// Implementations report only transport or database failures as errors.
/// Anything that does not exist comes back as `None` or an empty list.
pub trait RecipeCostSource: Send + Sync {
    /// Looks up one ingredient.
    fn get_ingredient(
        &self,
        ingredient_id: i64,
    ) -> impl Future<Output = Result<Option<ingredient::Model>>> + Send;

    /// Ingredient lines of a recipe in the order they were added.
    fn list_recipe_ingredients(
        &self,
        recipe_id: i64,
    ) -> impl Future<Output = Result<Vec<recipe_ingredient::Model>>> + Send;

    /// Flat costs of a recipe in the order they were added.
    fn list_recipe_additional_costs(
        &self,
        recipe_id: i64,
    ) -> impl Future<Output = Result<Vec<recipe_additional_cost::Model>>> + Send;
}

/// [`RecipeCostSource`] backed by the database.
///
/// Ingredients are served from the [`CatalogCache`]; recipe lines and
/// additional costs are always read fresh.
#[derive(Debug, Clone, Copy)]
pub struct CatalogCostSource<'a> {
    db: &'a DatabaseConnection,
    catalog: &'a CatalogCache,
}

impl<'a> CatalogCostSource<'a> {
    /// Wraps a connection and the shared catalog cache.
    #[must_use]
    pub const fn new(db: &'a DatabaseConnection, catalog: &'a CatalogCache) -> Self {
        Self { db, catalog }
    }
}

impl RecipeCostSource for CatalogCostSource<'_> {
    async fn get_ingredient(&self, ingredient_id: i64) -> Result<Option<ingredient::Model>> {
        self.catalog.ingredient(self.db, ingredient_id).await
    }

    async fn list_recipe_ingredients(&self, recipe_id: i64) -> Result<Vec<recipe_ingredient::Model>> {
        list_recipe_ingredient_rows(self.db, recipe_id).await
    }

    async fn list_recipe_additional_costs(
        &self,
        recipe_id: i64,
    ) -> Result<Vec<recipe_additional_cost::Model>> {
        list_additional_cost_rows(self.db, recipe_id).await
    }
}

/// Ingredient lines of a recipe ordered by insertion.
pub(crate) async fn list_recipe_ingredient_rows<C>(
    db: &C,
    recipe_id: i64,
) -> Result<Vec<recipe_ingredient::Model>>
where
    C: ConnectionTrait,
{
    RecipeIngredient::find()
        .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
        .order_by_asc(recipe_ingredient::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Additional costs of a recipe ordered by insertion.
pub(crate) async fn list_additional_cost_rows<C>(
    db: &C,
    recipe_id: i64,
) -> Result<Vec<recipe_additional_cost::Model>>
where
    C: ConnectionTrait,
{
    RecipeAdditionalCost::find()
        .filter(recipe_additional_cost::Column::RecipeId.eq(recipe_id))
        .order_by_asc(recipe_additional_cost::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Computes the unit cost of a recipe with a line-by-line breakdown.
///
/// An unknown recipe has no lines and therefore costs zero. Lines that point
/// at a deleted ingredient are skipped and logged.
///
/// # Errors
/// Only failures of the underlying source are returned.
pub async fn compute_recipe_cost<S>(source: &S, recipe_id: i64) -> Result<RecipeCost>
where
    S: RecipeCostSource,
{
    let rows = source.list_recipe_ingredients(recipe_id).await?;
    let additional_costs = source.list_recipe_additional_costs(recipe_id).await?;

    let mut line_items = Vec::with_capacity(rows.len() + additional_costs.len());
    for row in rows {
        let Some(ingredient) = source.get_ingredient(row.ingredient_id).await? else {
            warn!(
                "Recipe {} references missing ingredient {}, skipping line",
                recipe_id, row.ingredient_id
            );
            continue;
        };
        line_items.push(LineItem {
            label: ingredient.name,
            quantity: row.quantity,
            unit: row.unit,
            unit_price: ingredient.unit_price,
            subtotal: row.quantity * ingredient.unit_price,
        });
    }

    line_items.extend(additional_costs.into_iter().map(|cost| LineItem {
        label: cost.concept,
        quantity: 1.0,
        unit: FLAT_COST_UNIT.to_string(),
        unit_price: cost.cost,
        subtotal: cost.cost,
    }));

    let total_cost: f64 = line_items.iter().map(|line| line.subtotal).sum();
    debug!(
        "Recipe {} costs {} over {} lines",
        recipe_id,
        total_cost,
        line_items.len()
    );

    Ok(RecipeCost {
        recipe_id,
        total_cost,
        line_items,
    })
}

/// Convenience wrapper computing a recipe's cost against the database.
pub async fn recipe_cost(
    db: &DatabaseConnection,
    catalog: &CatalogCache,
    recipe_id: i64,
) -> Result<RecipeCost> {
    compute_recipe_cost(&CatalogCostSource::new(db, catalog), recipe_id).await
}
