//! Recipe Discord commands - `/recipe show|list|create|edit|ingredient|cost`.
//!
//! Recipes are built up in steps: `create` registers the recipe with its first
//! ingredient, `ingredient` adds or adjusts further lines, and `cost` attaches
//! flat costs such as labor. `edit` changes the name, sale price or description.

use crate::{core::recipe::RecipeUpdate, entities::recipe};

/// Merges the fields given to `/recipe edit` into the current recipe.
///
/// Returns `None` when no field was given.
fn edited_recipe(
    current: &recipe::Model,
    name: Option<String>,
    sale_price: Option<f64>,
    description: Option<String>,
    clear_description: bool,
) -> Option<RecipeUpdate> {
    if name.is_none() && sale_price.is_none() && description.is_none() && !clear_description {
        return None;
    }
    let description = if clear_description {
        None
    } else {
        description.or_else(|| current.description.clone())
    };
    Some(RecipeUpdate {
        name: name.unwrap_or_else(|| current.name.clone()),
        description,
        sale_price: sale_price.unwrap_or(current.sale_price),
    })
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::edited_recipe;
    use crate::{
        bot::{
            BotData,
            commands::{
                MAX_EMBED_FIELDS,
                display::{MAX_FIELD_CHARS, hidden_footer, join_capped},
                lookup,
            },
            handlers::autocomplete,
        },
        core::{
            costing::recipe_cost,
            margin::calculate_margin,
            recipe::{
                NewRecipe, RecipeIngredientInput, create_recipe,
                remove_additional_cost, remove_recipe_ingredient, set_additional_cost,
                set_recipe_ingredient, update_recipe,
            },
            report::{format_currency, format_line_item, format_margin, format_quantity},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Parent command for authoring recipes and inspecting their cost.
    #[poise::command(
        slash_command,
        subcommands(
            "recipe_show",
            "recipe_list",
            "recipe_create",
            "recipe_edit",
            "recipe_ingredient",
            "recipe_cost_set"
        )
    )]
    pub async fn recipe(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Recipe command. Available subcommands:\n\
            `/recipe show` - Cost breakdown and margin of a recipe\n\
            `/recipe list` - All recipes with cost and sale price\n\
            `/recipe create` - Create a recipe with its first ingredient\n\
            `/recipe edit` - Change the name, sale price or description\n\
            `/recipe ingredient` - Add, change or remove an ingredient line\n\
            `/recipe cost` - Add, change or remove a flat additional cost";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows the current cost breakdown and margin of a recipe.
    #[poise::command(slash_command, rename = "show")]
    pub async fn recipe_show(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recipe to show"]
        #[autocomplete = "autocomplete::autocomplete_recipe_name"]
        name: String,
    ) -> Result<()> {
        let data = ctx.data();
        let shown = lookup::recipe_named(data, &name).await?;
        let cost = recipe_cost(&data.database, &data.catalog, shown.id).await?;
        let margin = calculate_margin(shown.sale_price, cost.total_cost);

        let breakdown = if cost.is_empty() {
            "No ingredients or costs yet.".to_string()
        } else {
            let lines: Vec<String> = cost.line_items.iter().map(format_line_item).collect();
            join_capped(&lines, MAX_FIELD_CHARS)
        };

        let mut embed = serenity::CreateEmbed::default()
            .title(format!("**{}**", shown.name))
            .color(0x0058_65F2)
            .field("Breakdown", breakdown, false)
            .field("Unit cost", format_currency(cost.total_cost), true)
            .field("Sale price", format_currency(shown.sale_price), true)
            .field("Margin", format_margin(&margin), true);
        if let Some(description) = &shown.description {
            embed = embed.description(description);
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Lists all recipes with their current cost and sale price.
    #[poise::command(slash_command, rename = "list")]
    pub async fn recipe_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let recipes = data.catalog.recipes(&data.database).await?;

        if recipes.is_empty() {
            ctx.say("No recipes have been defined yet. Use `/recipe create` to add one!")
                .await?;
            return Ok(());
        }

        let mut fields = Vec::new();
        for listed in recipes.iter().take(MAX_EMBED_FIELDS) {
            let cost = recipe_cost(&data.database, &data.catalog, listed.id).await?;
            fields.push((
                listed.name.clone(),
                format!(
                    "Cost {} | Sale {}",
                    format_currency(cost.total_cost),
                    format_currency(listed.sale_price)
                ),
                false,
            ));
        }

        let mut list_embed = serenity::CreateEmbed::default()
            .title("**Recipes**")
            .color(0x0058_65F2)
            .fields(fields);
        if let Some(footer) = hidden_footer(MAX_EMBED_FIELDS, recipes.len()) {
            list_embed = list_embed.footer(serenity::CreateEmbedFooter::new(footer));
        }

        ctx.send(poise::CreateReply::default().embed(list_embed))
            .await?;
        Ok(())
    }

    /// Creates a recipe with its first ingredient line.
    #[poise::command(slash_command, rename = "create")]
    pub async fn recipe_create(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Unique recipe name (e.g., 'Baguette')"] name: String,
        #[description = "Price one unit sells for"] sale_price: f64,
        #[description = "First ingredient"]
        #[autocomplete = "autocomplete::autocomplete_ingredient_name"]
        ingredient: String,
        #[description = "Amount of that ingredient per unit produced"] quantity: f64,
        #[description = "Unit of the amount. Defaults to the ingredient's unit."] unit: Option<
            String,
        >,
        #[description = "Optional description"] description: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let first = lookup::ingredient_named(data, &ingredient).await?;

        let created = create_recipe(
            &data.database,
            &data.catalog,
            NewRecipe {
                name,
                description,
                sale_price,
                ingredients: vec![RecipeIngredientInput {
                    ingredient_id: first.id,
                    quantity,
                    unit,
                }],
                additional_costs: Vec::new(),
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Recipe '{}' created, selling at {}. Add more lines with `/recipe ingredient`.",
            created.name,
            format_currency(created.sale_price)
        ))
        .await?;
        Ok(())
    }

    /// Changes the name, sale price or description of a recipe.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn recipe_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recipe to edit"]
        #[autocomplete = "autocomplete::autocomplete_recipe_name"]
        recipe: String,
        #[description = "New unique name"] name: Option<String>,
        #[description = "New price one unit sells for"] sale_price: Option<f64>,
        #[description = "New description"] description: Option<String>,
        #[description = "Remove the current description"] clear_description: Option<bool>,
    ) -> Result<()> {
        let data = ctx.data();
        let current = lookup::recipe_named(data, &recipe).await?;

        let Some(update) = edited_recipe(
            &current,
            name,
            sale_price,
            description,
            clear_description.unwrap_or(false),
        ) else {
            ctx.say(format!("⚠️ Nothing to change on '{}'.", current.name))
                .await?;
            return Ok(());
        };

        let old_name = current.name;
        let updated = update_recipe(&data.database, &data.catalog, current.id, update).await?;

        let renamed = if updated.name == old_name {
            String::new()
        } else {
            format!(" (renamed from '{old_name}')")
        };
        ctx.say(format!(
            "✅ Recipe '{}'{} updated, selling at {}.",
            updated.name,
            renamed,
            format_currency(updated.sale_price)
        ))
        .await?;
        Ok(())
    }

    /// Sets how much of an ingredient a recipe needs, or removes the line with quantity 0.
    #[poise::command(slash_command, rename = "ingredient")]
    pub async fn recipe_ingredient(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recipe to change"]
        #[autocomplete = "autocomplete::autocomplete_recipe_name"]
        recipe: String,
        #[description = "Ingredient to set"]
        #[autocomplete = "autocomplete::autocomplete_ingredient_name"]
        ingredient: String,
        #[description = "Amount per unit produced; 0 removes the line"] quantity: f64,
        #[description = "Unit of the amount. Defaults to the ingredient's unit."] unit: Option<
            String,
        >,
    ) -> Result<()> {
        let data = ctx.data();
        let target = lookup::recipe_named(data, &recipe).await?;
        let used = lookup::ingredient_named(data, &ingredient).await?;

        if quantity == 0.0 {
            let message = if remove_recipe_ingredient(&data.database, target.id, used.id).await? {
                format!("✅ '{}' removed from '{}'.", used.name, target.name)
            } else {
                format!("⚠️ '{}' is not part of '{}'.", used.name, target.name)
            };
            ctx.say(message).await?;
            return Ok(());
        }

        let line = set_recipe_ingredient(&data.database, target.id, used.id, quantity, unit).await?;
        ctx.say(format!(
            "✅ '{}' now uses {} {} of '{}' per unit.",
            target.name,
            format_quantity(line.quantity),
            line.unit,
            used.name
        ))
        .await?;
        Ok(())
    }

    /// Sets a flat additional cost on a recipe, or removes it when no cost is given.
    #[poise::command(slash_command, rename = "cost")]
    pub async fn recipe_cost_set(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Recipe to change"]
        #[autocomplete = "autocomplete::autocomplete_recipe_name"]
        recipe: String,
        #[description = "What the cost is for (e.g., labor, gas)"] concept: String,
        #[description = "Amount per unit produced; leave empty to remove"] cost: Option<f64>,
    ) -> Result<()> {
        let data = ctx.data();
        let target = lookup::recipe_named(data, &recipe).await?;

        let Some(cost) = cost else {
            let message =
                if remove_additional_cost(&data.database, target.id, &concept).await? {
                    format!("✅ '{}' removed from '{}'.", concept.trim(), target.name)
                } else {
                    format!("⚠️ '{}' has no cost called '{}'.", target.name, concept.trim())
                };
            ctx.say(message).await?;
            return Ok(());
        };

        let saved = set_additional_cost(&data.database, target.id, &concept, cost).await?;
        ctx.say(format!(
            "✅ '{}' now carries {} for {} per unit.",
            target.name,
            format_currency(saved.cost),
            saved.concept
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
