//! Recipe authoring and editing.
//!
//! A recipe is a sellable product with a sale price, a list of ingredient lines
//! (quantity per unit produced) and optional flat additional costs. Recipes are
//! never deleted, only edited.

use crate::{
    core::{
        catalog_cache::CatalogCache,
        costing::{list_additional_cost_rows, list_recipe_ingredient_rows},
        validation::{
            require_name, require_non_negative_amount, require_positive_amount,
            require_positive_quantity,
        },
    },
    entities::{
        Ingredient, Recipe, RecipeAdditionalCost, RecipeIngredient, recipe,
        recipe_additional_cost, recipe_ingredient,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// One ingredient line of a new recipe.
#[derive(Debug, Clone)]
pub struct RecipeIngredientInput {
    /// Ingredient to use
    pub ingredient_id: i64,
    /// Amount per unit produced, must be positive
    pub quantity: f64,
    /// Unit of the amount; the ingredient's own unit when omitted
    pub unit: Option<String>,
}

/// One flat cost of a new recipe.
#[derive(Debug, Clone)]
pub struct AdditionalCostInput {
    /// What the cost is for
    pub concept: String,
    /// Amount per unit produced, zero or more
    pub cost: f64,
}

/// Input for [`create_recipe`].
#[derive(Debug, Clone)]
pub struct NewRecipe {
    /// Unique name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Price one unit sells for, must be positive
    pub sale_price: f64,
    /// At least one ingredient line
    pub ingredients: Vec<RecipeIngredientInput>,
    /// Flat costs, may be empty
    pub additional_costs: Vec<AdditionalCostInput>,
}

/// Replacement header fields for [`update_recipe`].
#[derive(Debug, Clone)]
pub struct RecipeUpdate {
    /// New name
    pub name: String,
    /// New description
    pub description: Option<String>,
    /// New sale price, must be positive
    pub sale_price: f64,
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Creates a recipe with its ingredient lines and additional costs.
///
/// Everything is written in one transaction, so a failure leaves no partial
/// recipe behind.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or already used
/// - The sale price is not strictly positive
/// - There are no ingredient lines
/// - A quantity is not strictly positive, or a cost is negative
/// - A referenced ingredient does not exist
/// - The database operation fails
pub async fn create_recipe(
    db: &DatabaseConnection,
    catalog: &CatalogCache,
    new: NewRecipe,
) -> Result<recipe::Model> {
    let name = require_name(&new.name, "Recipe")?;
    let sale_price = require_positive_amount(new.sale_price)?;
    if new.ingredients.is_empty() {
        return Err(Error::Validation {
            message: "A recipe needs at least one ingredient".to_string(),
        });
    }
    for line in &new.ingredients {
        require_positive_quantity(line.quantity)?;
    }
    for cost in &new.additional_costs {
        require_name(&cost.concept, "Cost concept")?;
        require_non_negative_amount(cost.cost)?;
    }

    if get_recipe_by_name(db, &name).await?.is_some() {
        return Err(Error::Validation {
            message: format!("A recipe named '{name}' already exists"),
        });
    }

    let mut lines = Vec::with_capacity(new.ingredients.len());
    for line in new.ingredients {
        let ingredient = Ingredient::find_by_id(line.ingredient_id)
            .one(db)
            .await?
            .ok_or_else(|| Error::IngredientNotFound {
                name: line.ingredient_id.to_string(),
            })?;
        let unit = line
            .unit
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or(ingredient.unit);
        lines.push((line.ingredient_id, line.quantity, unit));
    }

    let txn = db.begin().await?;
    let now = chrono::Utc::now();
    let created = recipe::ActiveModel {
        name: Set(name),
        description: Set(normalize_description(new.description)),
        sale_price: Set(sale_price),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for (ingredient_id, quantity, unit) in lines {
        recipe_ingredient::ActiveModel {
            recipe_id: Set(created.id),
            ingredient_id: Set(ingredient_id),
            quantity: Set(quantity),
            unit: Set(unit),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    for cost in new.additional_costs {
        recipe_additional_cost::ActiveModel {
            recipe_id: Set(created.id),
            concept: Set(cost.concept.trim().to_string()),
            cost: Set(cost.cost),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    catalog.invalidate().await;

    info!(
        "Created recipe '{}' (ID: {}) selling at {}",
        created.name, created.id, created.sale_price
    );
    Ok(created)
}

/// Finds a recipe by its unique ID.
pub async fn get_recipe_by_id(
    db: &DatabaseConnection,
    recipe_id: i64,
) -> Result<Option<recipe::Model>> {
    Recipe::find_by_id(recipe_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a recipe by its exact name.
pub async fn get_recipe_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<recipe::Model>> {
    Recipe::find()
        .filter(recipe::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All recipes ordered by name.
pub async fn list_recipes(db: &DatabaseConnection) -> Result<Vec<recipe::Model>> {
    Recipe::find()
        .order_by_asc(recipe::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn require_recipe(db: &DatabaseConnection, recipe_id: i64) -> Result<recipe::Model> {
    get_recipe_by_id(db, recipe_id)
        .await?
        .ok_or_else(|| Error::RecipeNotFound {
            name: recipe_id.to_string(),
        })
}

/// Replaces the name, description and sale price of a recipe.
///
/// # Errors
/// Returns an error if the recipe does not exist, the name is empty or taken by
/// another recipe, or the sale price is not strictly positive.
pub async fn update_recipe(
    db: &DatabaseConnection,
    catalog: &CatalogCache,
    recipe_id: i64,
    update: RecipeUpdate,
) -> Result<recipe::Model> {
    let name = require_name(&update.name, "Recipe")?;
    let sale_price = require_positive_amount(update.sale_price)?;
    let current = require_recipe(db, recipe_id).await?;

    if let Some(other) = get_recipe_by_name(db, &name).await? {
        if other.id != recipe_id {
            return Err(Error::Validation {
                message: format!("A recipe named '{name}' already exists"),
            });
        }
    }

    let mut active: recipe::ActiveModel = current.into();
    active.name = Set(name);
    active.description = Set(normalize_description(update.description));
    active.sale_price = Set(sale_price);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(db).await?;
    catalog.invalidate().await;

    info!("Updated recipe '{}' (ID: {})", updated.name, updated.id);
    Ok(updated)
}

/// Sets how much of an ingredient one unit of the recipe needs.
///
/// Updates the existing line for that ingredient, or adds one.
///
/// # Errors
/// Returns an error if the quantity is not strictly positive or the recipe or
/// ingredient does not exist.
pub async fn set_recipe_ingredient(
    db: &DatabaseConnection,
    recipe_id: i64,
    ingredient_id: i64,
    quantity: f64,
    unit: Option<String>,
) -> Result<recipe_ingredient::Model> {
    let quantity = require_positive_quantity(quantity)?;
    require_recipe(db, recipe_id).await?;
    let ingredient = Ingredient::find_by_id(ingredient_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::IngredientNotFound {
            name: ingredient_id.to_string(),
        })?;
    let unit = unit
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or(ingredient.unit);

    let existing = RecipeIngredient::find()
        .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
        .filter(recipe_ingredient::Column::IngredientId.eq(ingredient_id))
        .one(db)
        .await?;

    let line = match existing {
        Some(line) => {
            let mut active: recipe_ingredient::ActiveModel = line.into();
            active.quantity = Set(quantity);
            active.unit = Set(unit);
            active.update(db).await?
        }
        None => {
            recipe_ingredient::ActiveModel {
                recipe_id: Set(recipe_id),
                ingredient_id: Set(ingredient_id),
                quantity: Set(quantity),
                unit: Set(unit),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };

    info!(
        "Recipe {} now uses {} {} of '{}'",
        recipe_id, line.quantity, line.unit, ingredient.name
    );
    Ok(line)
}

/// Removes an ingredient line. Returns whether a line was removed.
pub async fn remove_recipe_ingredient(
    db: &DatabaseConnection,
    recipe_id: i64,
    ingredient_id: i64,
) -> Result<bool> {
    let result = RecipeIngredient::delete_many()
        .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
        .filter(recipe_ingredient::Column::IngredientId.eq(ingredient_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Sets a flat cost on a recipe, replacing any cost with the same concept.
///
/// # Errors
/// Returns an error if the concept is empty, the cost is negative or the
/// recipe does not exist.
pub async fn set_additional_cost(
    db: &DatabaseConnection,
    recipe_id: i64,
    concept: &str,
    cost: f64,
) -> Result<recipe_additional_cost::Model> {
    let concept = require_name(concept, "Cost concept")?;
    let cost = require_non_negative_amount(cost)?;
    require_recipe(db, recipe_id).await?;

    let existing = RecipeAdditionalCost::find()
        .filter(recipe_additional_cost::Column::RecipeId.eq(recipe_id))
        .filter(recipe_additional_cost::Column::Concept.eq(concept.as_str()))
        .one(db)
        .await?;

    let saved = match existing {
        Some(row) => {
            let mut active: recipe_additional_cost::ActiveModel = row.into();
            active.cost = Set(cost);
            active.update(db).await?
        }
        None => {
            recipe_additional_cost::ActiveModel {
                recipe_id: Set(recipe_id),
                concept: Set(concept),
                cost: Set(cost),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };

    info!(
        "Recipe {} additional cost '{}' set to {}",
        recipe_id, saved.concept, saved.cost
    );
    Ok(saved)
}

/// Removes a flat cost by concept. Returns whether a cost was removed.
pub async fn remove_additional_cost(
    db: &DatabaseConnection,
    recipe_id: i64,
    concept: &str,
) -> Result<bool> {
    let result = RecipeAdditionalCost::delete_many()
        .filter(recipe_additional_cost::Column::RecipeId.eq(recipe_id))
        .filter(recipe_additional_cost::Column::Concept.eq(concept.trim()))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Ingredient lines of a recipe in the order they were added.
pub async fn list_recipe_ingredients(
    db: &DatabaseConnection,
    recipe_id: i64,
) -> Result<Vec<recipe_ingredient::Model>> {
    list_recipe_ingredient_rows(db, recipe_id).await
}

/// Flat costs of a recipe in the order they were added.
pub async fn list_recipe_additional_costs(
    db: &DatabaseConnection,
    recipe_id: i64,
) -> Result<Vec<recipe_additional_cost::Model>> {
    list_additional_cost_rows(db, recipe_id).await
}
