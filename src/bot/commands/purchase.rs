//! Stock movement commands - `/purchase` and `/consume`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::lookup, handlers::autocomplete},
        core::{
            consumption::record_manual_consumption,
            purchase::{NewPurchase, PurchaseItemInput, create_purchase},
            report::{format_currency, format_quantity},
            today,
        },
        entities::purchase::PurchaseKind,
        errors::{Error, Result},
    };

    /// Purchase kind as offered in the slash command.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum PurchaseKindChoice {
        #[name = "regular"]
        Regular,
        #[name = "extra"]
        Extra,
    }

    impl From<PurchaseKindChoice> for PurchaseKind {
        fn from(choice: PurchaseKindChoice) -> Self {
            match choice {
                PurchaseKindChoice::Regular => Self::Regular,
                PurchaseKindChoice::Extra => Self::Extra,
            }
        }
    }

    /// Records a purchase of one ingredient, restocking it at the price paid.
    #[poise::command(slash_command)]
    pub async fn purchase(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Ingredient bought"]
        #[autocomplete = "autocomplete::autocomplete_ingredient_name"]
        ingredient: String,
        #[description = "Quantity bought, in the ingredient's unit"] quantity: f64,
        #[description = "Price paid per unit (e.g., 2.50)"] unit_price: f64,
        #[description = "Supplier name"] supplier: Option<String>,
        #[description = "Regular restock or extra purchase. Defaults to regular."] kind: Option<
            PurchaseKindChoice,
        >,
        #[description = "Optional notes"] notes: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let bought = lookup::ingredient_named(data, &ingredient).await?;

        let receipt = create_purchase(
            &data.database,
            &data.catalog,
            NewPurchase {
                date: today(),
                supplier: supplier.unwrap_or_default(),
                kind: kind.map_or(PurchaseKind::Regular, PurchaseKind::from),
                notes: notes.unwrap_or_default(),
                items: vec![PurchaseItemInput {
                    ingredient_id: bought.id,
                    quantity,
                    unit_price,
                }],
            },
        )
        .await?;

        let supplier_text = if receipt.purchase.supplier.is_empty() {
            String::new()
        } else {
            format!(" from {}", receipt.purchase.supplier)
        };
        ctx.say(format!(
            "✅ Purchase #{} recorded{}: {} {} of '{}' at {} each. Total **{}** ({}).",
            receipt.purchase.id,
            supplier_text,
            format_quantity(quantity),
            bought.unit,
            bought.name,
            format_currency(unit_price),
            format_currency(receipt.purchase.total),
            receipt.purchase.kind.as_str()
        ))
        .await?;
        Ok(())
    }

    /// Withdraws an ingredient from stock outside of production.
    #[poise::command(slash_command)]
    pub async fn consume(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Ingredient used"]
        #[autocomplete = "autocomplete::autocomplete_ingredient_name"]
        ingredient: String,
        #[description = "Quantity used, in the ingredient's unit"] quantity: f64,
        #[description = "What it was used for"] notes: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let used = lookup::ingredient_named(data, &ingredient).await?;

        let recorded = record_manual_consumption(
            &data.database,
            &data.catalog,
            used.id,
            quantity,
            notes.as_deref().unwrap_or_default(),
            today(),
        )
        .await?;
        let remaining = lookup::ingredient_named(data, &used.name).await?;

        ctx.say(format!(
            "✅ Consumption #{} recorded: {} {} of '{}'. {} {} left.",
            recorded.consumption.id,
            format_quantity(recorded.item.quantity),
            used.unit,
            used.name,
            format_quantity(remaining.current_stock),
            used.unit
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
