//! Catalog seed loading from config.toml
//!
//! This module loads the initial categories and ingredients from a TOML
//! configuration file. The entries are inserted on startup when they are missing,
//! so a fresh database already knows the bakery's usual raw materials.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct CatalogConfig {
    /// Categories to seed
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    /// Ingredients to seed
    #[serde(default)]
    pub ingredients: Vec<IngredientConfig>,
}

/// Configuration for a single category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Name of the category
    pub name: String,
}

/// Configuration for a single ingredient
#[derive(Debug, Deserialize, Clone)]
pub struct IngredientConfig {
    /// Name of the ingredient
    pub name: String,
    /// Name of a category from the same file
    #[serde(default)]
    pub category: Option<String>,
    /// Initial unit price
    pub unit_price: f64,
    /// Unit of measure (e.g., "kg")
    pub unit: String,
    /// Initial stock, defaults to zero
    #[serde(default)]
    pub current_stock: f64,
    /// Minimum stock before the ingredient is reported as low
    #[serde(default)]
    pub minimum_stock: f64,
}

/// Loads the catalog configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses catalog configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<CatalogConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_catalog_config() {
        let toml_str = r#"
            [[categories]]
            name = "Flours"

            [[ingredients]]
            name = "Wheat flour"
            category = "Flours"
            unit_price = 2.5
            unit = "kg"
            current_stock = 25.0
            minimum_stock = 5.0

            [[ingredients]]
            name = "Eggs"
            unit_price = 0.5
            unit = "unit"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.ingredients.len(), 2);
        assert_eq!(config.ingredients[0].category.as_deref(), Some("Flours"));
        assert_eq!(config.ingredients[0].minimum_stock, 5.0);

        assert_eq!(config.ingredients[1].name, "Eggs");
        assert!(config.ingredients[1].category.is_none());
        assert_eq!(config.ingredients[1].current_stock, 0.0);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(config.categories.is_empty());
        assert!(config.ingredients.is_empty());
    }

    #[test]
    fn test_parse_config_missing_price_fails() {
        let result = parse_config(
            r#"
            [[ingredients]]
            name = "Sugar"
            unit = "kg"
        "#,
        );
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("does/not/exist.toml");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }
}
