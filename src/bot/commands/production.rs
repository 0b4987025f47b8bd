//! Production Discord command - `/produce`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::{
                display::{MAX_FIELD_CHARS, join_capped},
                lookup,
            },
            handlers::autocomplete,
        },
        core::{
            production::register_production,
            report::{format_currency, format_line_item},
            today,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Registers a production run and withdraws its ingredients from stock.
    ///
    /// The run is rejected as a whole when any ingredient is short.
    #[poise::command(slash_command)]
    pub async fn produce(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recipe produced"]
        #[autocomplete = "autocomplete::autocomplete_recipe_name"]
        recipe: String,
        #[description = "Units produced"]
        #[min = 1]
        quantity: i64,
        #[description = "Optional notes"] notes: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let produced = lookup::recipe_named(data, &recipe).await?;

        let record = register_production(
            &data.database,
            &data.catalog,
            produced.id,
            quantity,
            notes.as_deref().unwrap_or_default(),
            today(),
        )
        .await?;

        let breakdown: Vec<String> = record.cost.line_items.iter().map(format_line_item).collect();
        let embed = serenity::CreateEmbed::default()
            .title(format!(
                "Production #{}: {} x {}",
                record.production.id, record.production.quantity, produced.name
            ))
            .color(0x0058_65F2)
            .field("Unit cost", format_currency(record.unit_cost), true)
            .field(
                "Total cost",
                format_currency(record.production.total_cost),
                true,
            )
            .field(
                "Breakdown",
                if breakdown.is_empty() {
                    "Nothing".to_string()
                } else {
                    join_capped(&breakdown, MAX_FIELD_CHARS)
                },
                false,
            );

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
