//! Ingredient Discord commands - `/ingredient add|list|low_stock|price`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::{MAX_EMBED_FIELDS, display::capped_message, lookup},
            handlers::autocomplete,
        },
        core::{
            category::{create_category, get_category_by_name},
            ingredient::{
                IngredientFilter, NewIngredient, create_ingredient, list_ingredients,
                low_stock_ingredients, update_ingredient_price,
            },
            report::{format_currency, format_quantity},
        },
        entities::ingredient,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    fn stock_line(ingredient: &ingredient::Model) -> String {
        format!(
            "{} per {} | stock {} {} (min {})",
            format_currency(ingredient.unit_price),
            ingredient.unit,
            format_quantity(ingredient.current_stock),
            ingredient.unit,
            format_quantity(ingredient.minimum_stock)
        )
    }

    /// Parent command for registering and inspecting ingredients.
    #[poise::command(
        slash_command,
        subcommands(
            "ingredient_add",
            "ingredient_list",
            "ingredient_low_stock",
            "ingredient_price"
        )
    )]
    pub async fn ingredient(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Ingredient command. Available subcommands:\n\
            `/ingredient add` - Register a new ingredient\n\
            `/ingredient list` - List ingredients with price and stock\n\
            `/ingredient low_stock` - Ingredients below their minimum stock\n\
            `/ingredient price` - Set a new unit price";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Registers a new ingredient and records its opening price.
    #[poise::command(slash_command, rename = "add")]
    pub async fn ingredient_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Unique name for the ingredient (e.g., 'Wheat flour')"] name: String,
        #[description = "Price per unit (e.g., 2.50)"] unit_price: f64,
        #[description = "Unit of measure (e.g., kg, l, unit)"] unit: String,
        #[description = "Stock on hand. Defaults to 0."] current_stock: Option<f64>,
        #[description = "Stock level that triggers a low stock warning. Defaults to 0."]
        minimum_stock: Option<f64>,
        #[description = "Category, created if it does not exist yet"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;

        let category_id = match category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(category_name) => match get_category_by_name(db, category_name).await? {
                Some(existing) => Some(existing.id),
                None => Some(create_category(db, category_name).await?.id),
            },
            None => None,
        };

        let created = create_ingredient(
            db,
            &data.catalog,
            NewIngredient {
                name,
                category_id,
                unit_price,
                current_stock: current_stock.unwrap_or(0.0),
                minimum_stock: minimum_stock.unwrap_or(0.0),
                unit,
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Ingredient '{}' registered: {}.",
            created.name,
            stock_line(&created)
        ))
        .await?;
        Ok(())
    }

    /// Lists ingredients with their current price and stock.
    #[poise::command(slash_command, rename = "list")]
    pub async fn ingredient_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
        #[description = "Only names containing this text"] search: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let category_id = match category.as_deref() {
            Some(category_name) => {
                let Some(found) = get_category_by_name(db, category_name).await? else {
                    ctx.say(format!("❌ Could not find a category named '{category_name}'."))
                        .await?;
                    return Ok(());
                };
                Some(found.id)
            }
            None => None,
        };

        let ingredients = list_ingredients(
            db,
            &IngredientFilter {
                category_id,
                search,
            },
        )
        .await?;

        if ingredients.is_empty() {
            ctx.say("No ingredients found. Use `/ingredient add` to register some!")
                .await?;
            return Ok(());
        }

        let total = ingredients.len();
        let fields: Vec<(String, String, bool)> = ingredients
            .iter()
            .take(MAX_EMBED_FIELDS)
            .map(|i| (i.name.clone(), stock_line(i), false))
            .collect();

        let mut list_embed = serenity::CreateEmbed::default()
            .title("**Ingredients**")
            .color(0x0058_65F2)
            .fields(fields);
        if total > MAX_EMBED_FIELDS {
            list_embed = list_embed.footer(serenity::CreateEmbedFooter::new(format!(
                "Showing {MAX_EMBED_FIELDS} of {total}. Narrow the list with `search`."
            )));
        }

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }

    /// Lists ingredients whose stock is below their minimum.
    #[poise::command(slash_command, rename = "low_stock")]
    pub async fn ingredient_low_stock(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let low = low_stock_ingredients(&ctx.data().database).await?;

        if low.is_empty() {
            ctx.say("✅ Every ingredient is at or above its minimum stock.")
                .await?;
            return Ok(());
        }

        let header = format!("⚠️ {} ingredient(s) below minimum stock:", low.len());
        let lines: Vec<String> = low
            .iter()
            .map(|ingredient| {
                format!(
                    "• **{}**: {} {} (minimum {} {})",
                    ingredient.name,
                    format_quantity(ingredient.current_stock),
                    ingredient.unit,
                    format_quantity(ingredient.minimum_stock),
                    ingredient.unit
                )
            })
            .collect();
        let message = capped_message(&header, &lines);

        ctx.say(message).await?;
        Ok(())
    }

    /// Sets a new unit price for an ingredient.
    #[poise::command(slash_command, rename = "price")]
    pub async fn ingredient_price(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Ingredient to update"]
        #[autocomplete = "autocomplete::autocomplete_ingredient_name"]
        name: String,
        #[description = "New price per unit (e.g., 2.80)"] unit_price: f64,
    ) -> Result<()> {
        let data = ctx.data();
        let current = lookup::ingredient_named(data, &name).await?;
        let old_price = current.unit_price;

        let updated =
            update_ingredient_price(&data.database, &data.catalog, current.id, unit_price).await?;

        ctx.say(format!(
            "✅ Price of '{}' updated from {} to **{}** per {}.",
            updated.name,
            format_currency(old_price),
            format_currency(updated.unit_price),
            updated.unit
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
