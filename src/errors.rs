//! Unified error type for `BakeryBuddy`.
//!
//! Every fallible operation in the crate returns [`Result`]. Business rule
//! violations get their own variants so the bot layer can answer with a
//! precise message instead of a generic failure.

use crate::core::production::StockShortage;
use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid settings or an invalid `config.toml`.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// User input that breaks a business rule (empty or duplicate names).
    #[error("{message}")]
    Validation {
        /// Human-readable description of the problem
        message: String,
    },

    /// Error reported by the database layer.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A price or cost was negative, zero where not allowed, or not finite.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending amount
        amount: f64,
    },

    /// A stock or recipe quantity was not strictly positive or not finite.
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The offending quantity
        quantity: f64,
    },

    /// No ingredient matched the given name or id.
    #[error("Ingredient not found: {name}")]
    IngredientNotFound {
        /// Name or id that was looked up
        name: String,
    },

    /// No recipe matched the given name or id.
    #[error("Recipe not found: {name}")]
    RecipeNotFound {
        /// Name or id that was looked up
        name: String,
    },

    /// One or more ingredients do not have enough stock for the request.
    #[error("Insufficient stock for {} ingredient(s)", .shortages.len())]
    InsufficientStock {
        /// Every ingredient that is short, with the missing amount
        shortages: Vec<StockShortage>,
    },

    /// A purchase was submitted without any items.
    #[error("A purchase needs at least one item")]
    EmptyPurchase,

    /// A required environment variable is missing or malformed.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Error raised by the Discord framework.
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
