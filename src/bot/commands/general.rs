//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**BakeryBuddy Help**\n\
        Here is a summary of all available commands for BakeryBuddy.\n\n\
        **Inventory**\n\
        • `/ingredient add|list|low_stock|price` - Register ingredients, browse stock, update prices.\n\
        • `/purchase <ingredient> <quantity> <unit_price> [supplier] [kind]` - Records a purchase and restocks.\n\
        • `/consume <ingredient> <quantity> [notes]` - Records a manual withdrawal from stock.\n\n\
        **Recipes & Production**\n\
        • `/recipe show|list|create|edit|ingredient|cost` - Define recipes and see their current cost.\n\
        • `/produce <recipe> <quantity> [notes]` - Registers a production run and consumes its ingredients.\n\n\
        **Reports**\n\
        • `/report margin` - Cost, sale price and margin of every recipe.\n\
        • `/report prices [ingredient] [days]` - Price history.\n\
        • `/report consumption [days]` - What was used, and how much.\n\
        • `/report trend [ingredient] [days]` - Day-by-day consumption.\n\
        • `/report production [days]` - Production runs and their cost.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
