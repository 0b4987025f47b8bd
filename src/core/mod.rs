//! Core business logic - framework-agnostic costing, inventory and reporting.
//!
//! Every function takes a database connection (and, where catalog data is read or
//! written, the [`catalog_cache::CatalogCache`]) and returns structured data that
//! the bot layer formats.

/// TTL read-through cache for ingredients and recipes
pub mod catalog_cache;
/// Ingredient categories
pub mod category;
/// Manual stock consumption
pub mod consumption;
/// Recipe cost calculation
pub mod costing;
/// Ingredient registration, pricing and stock
pub mod ingredient;
/// Margin calculation and margin report
pub mod margin;
/// Price history log
pub mod price_history;
/// Production runs
pub mod production;
/// Purchases of raw materials
pub mod purchase;
/// Recipe authoring and editing
pub mod recipe;
/// Historical reports and display formatting
pub mod report;
/// Catalog seeding from configuration
pub mod seed;

mod validation;

use chrono::{NaiveDate, Utc};

/// The current business date.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
