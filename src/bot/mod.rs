//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `BakeryBuddy` application,
//! including all slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (ingredients, purchases, production, recipes, reports)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    core::{catalog_cache::CatalogCache, report::format_shortage},
    errors::Error,
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

/// Shared data available to all bot commands.
/// This structure holds the database connection and the catalog cache that
/// every command reads ingredients and recipes through.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Shared ingredient and recipe snapshots
    pub catalog: CatalogCache,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection and cache.
    #[must_use]
    pub const fn new(database: DatabaseConnection, catalog: CatalogCache) -> Self {
        Self { database, catalog }
    }
}

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Message shown to the user when a command fails.
///
/// Stock shortages list every ingredient that is short; everything else uses
/// the error's display text.
#[must_use]
pub fn describe_error(error: &Error) -> String {
    match error {
        Error::InsufficientStock { shortages } => {
            let mut message = String::from("❌ Not enough stock:");
            for shortage in shortages {
                message.push_str("\n• ");
                message.push_str(&format_shortage(shortage));
            }
            message
        }
        other => format!("❌ {other}"),
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            match &error {
                Error::Database(_) | Error::Framework(_) | Error::EnvVar(_) => {
                    error!("Error in command `{}`: {:?}", ctx.command().name, error);
                }
                _ => warn!("Command `{}` rejected: {}", ctx.command().name, error),
            }
            if let Err(e) = ctx.say(describe_error(&error)).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// All slash commands the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::ingredient(),
        commands::purchase(),
        commands::consume(),
        commands::produce(),
        commands::recipe(),
        commands::report(),
    ]
}

/// Connects to Discord and serves commands until the client stops.
///
/// # Errors
/// Returns an error if the client cannot be built or the gateway connection fails.
pub async fn run_bot(token: &str, data: BotData) -> Result<(), Error> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::production::StockShortage;

    #[test]
    fn test_describe_error_lists_every_shortage() {
        let error = Error::InsufficientStock {
            shortages: vec![
                StockShortage {
                    ingredient_id: 1,
                    ingredient_name: "Eggs".to_string(),
                    unit: "unit".to_string(),
                    required: 6.0,
                    available: 4.0,
                },
                StockShortage {
                    ingredient_id: 2,
                    ingredient_name: "Flour".to_string(),
                    unit: "kg".to_string(),
                    required: 1.5,
                    available: 0.0,
                },
            ],
        };

        assert_eq!(
            describe_error(&error),
            "❌ Not enough stock:\n\
             • Eggs: need 6 unit, have 4 unit (missing 2)\n\
             • Flour: need 1.5 kg, have 0 kg (missing 1.5)"
        );
    }

    #[test]
    fn test_describe_error_uses_display_text() {
        let error = Error::RecipeNotFound {
            name: "Croissant".to_string(),
        };
        assert_eq!(describe_error(&error), "❌ Recipe not found: Croissant");
    }

    #[test]
    fn test_describe_error_reports_rule_violations_plainly() {
        let error = Error::Validation {
            message: "A recipe named 'Bread' already exists".to_string(),
        };
        assert_eq!(
            describe_error(&error),
            "❌ A recipe named 'Bread' already exists"
        );
    }
}
