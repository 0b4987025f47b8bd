//! Ingredient categories.

use crate::{
    core::validation::require_name,
    entities::{Category, category},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Creates a category with a unique, non-empty name.
///
/// # Errors
/// Returns `Error::Validation` if the name is empty or already taken.
pub async fn create_category(db: &DatabaseConnection, name: &str) -> Result<category::Model> {
    let name = require_name(name, "Category")?;

    if get_category_by_name(db, &name).await?.is_some() {
        return Err(Error::Validation {
            message: format!("A category named '{name}' already exists"),
        });
    }

    let created = category::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created category '{}' (ID: {})", created.name, created.id);
    Ok(created)
}

/// Finds a category by its exact name.
pub async fn get_category_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<category::Model>> {
    Category::find()
        .filter(category::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All categories ordered by name.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}
