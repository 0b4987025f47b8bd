//! Report Discord commands - `/report margin|prices|consumption|trend|production`.

use crate::{
    core::report::{DailyConsumption, format_currency, format_quantity},
    entities::production,
};
use std::collections::HashMap;

/// Collects `(group, line)` pairs into groups, keeping first-seen group order.
fn group_lines<I>(entries: I) -> Vec<(String, Vec<String>)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for (key, line) in entries {
        if let Some((_, lines)) = groups.iter_mut().find(|(name, _)| *name == key) {
            lines.push(line);
        } else {
            groups.push((key, vec![line]));
        }
    }
    groups
}

/// Daily consumption rows grouped per ingredient (by name), one line per day.
fn trend_groups(
    rows: &[DailyConsumption],
    units: &HashMap<i64, String>,
) -> Vec<(String, Vec<String>)> {
    let mut groups = group_lines(rows.iter().map(|row| {
        let unit = units.get(&row.ingredient_id).map_or("", String::as_str);
        (
            row.ingredient_name.clone(),
            format!("{}: {} {unit}", row.date, format_quantity(row.quantity))
                .trim_end()
                .to_string(),
        )
    }));
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    groups
}

/// One production run as a report line.
fn production_line(run: &production::Model, recipe_names: &HashMap<i64, String>) -> String {
    let recipe = recipe_names
        .get(&run.recipe_id)
        .cloned()
        .unwrap_or_else(|| format!("Recipe #{}", run.recipe_id));
    format!(
        "{} • #{} **{}** x {} = {}",
        run.date,
        run.id,
        recipe,
        run.quantity,
        format_currency(run.total_cost)
    )
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{group_lines, production_line, trend_groups};
    use crate::{
        bot::{
            BotData,
            commands::{
                MAX_EMBED_FIELDS,
                display::{capped_message, field_budget, hidden_footer, join_capped},
                lookup,
            },
            handlers::autocomplete,
        },
        core::{
            margin::margin_report,
            production::list_productions,
            report::{
                consumption_by_ingredient, daily_consumption, format_currency, format_margin,
                format_quantity, price_trend,
            },
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::collections::HashMap;

    const DEFAULT_REPORT_DAYS: u32 = 30;

    /// Builds one embed field per group, capped in count and in length.
    fn grouped_embed(
        title: String,
        groups: Vec<(String, Vec<String>)>,
    ) -> serenity::CreateEmbed {
        let total = groups.len();
        let shown = total.min(MAX_EMBED_FIELDS);
        let budget = field_budget(shown);
        let fields: Vec<(String, String, bool)> = groups
            .into_iter()
            .take(shown)
            .map(|(name, lines)| (name, join_capped(&lines, budget), true))
            .collect();

        let mut embed = serenity::CreateEmbed::default()
            .title(title)
            .color(0x0058_65F2)
            .fields(fields);
        if let Some(footer) = hidden_footer(shown, total) {
            embed = embed.footer(serenity::CreateEmbedFooter::new(footer));
        }
        embed
    }

    async fn ingredient_filter(data: &BotData, ingredient: Option<&str>) -> Result<Vec<i64>> {
        Ok(match ingredient {
            Some(name) => vec![lookup::ingredient_named(data, name).await?.id],
            None => Vec::new(),
        })
    }

    /// Parent command for historical reports.
    #[poise::command(
        slash_command,
        subcommands(
            "report_margin",
            "report_prices",
            "report_consumption",
            "report_trend",
            "report_production"
        )
    )]
    pub async fn report(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Report command. Available subcommands:\n\
            `/report margin` - Cost, sale price and margin of every recipe\n\
            `/report prices` - Recorded ingredient prices\n\
            `/report consumption` - Ingredient consumption totals\n\
            `/report trend` - Daily consumption per ingredient\n\
            `/report production` - Production runs with their cost";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows cost, sale price and margin of every recipe at current prices.
    #[poise::command(slash_command, rename = "margin")]
    pub async fn report_margin(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let rows = margin_report(&data.database, &data.catalog).await?;

        if rows.is_empty() {
            ctx.say("No recipes to report on yet.").await?;
            return Ok(());
        }

        let fields: Vec<(String, String, bool)> = rows
            .iter()
            .take(MAX_EMBED_FIELDS)
            .map(|row| {
                (
                    row.recipe.name.clone(),
                    format!(
                        "Cost {} | Sale {} | Margin {}",
                        format_currency(row.cost),
                        format_currency(row.sale_price),
                        format_margin(&row.margin)
                    ),
                    false,
                )
            })
            .collect();

        let mut embed = serenity::CreateEmbed::default()
            .title("**Margin Report**")
            .color(0x0058_65F2)
            .fields(fields);
        if let Some(footer) = hidden_footer(MAX_EMBED_FIELDS, rows.len()) {
            embed = embed.footer(serenity::CreateEmbedFooter::new(footer));
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows recorded ingredient prices over the last days.
    #[poise::command(slash_command, rename = "prices")]
    pub async fn report_prices(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this ingredient"]
        #[autocomplete = "autocomplete::autocomplete_ingredient_name"]
        ingredient: Option<String>,
        #[description = "How many days back. Defaults to 30."]
        #[min = 1]
        days: Option<u32>,
    ) -> Result<()> {
        let data = ctx.data();
        let ids = ingredient_filter(data, ingredient.as_deref()).await?;
        let days = days.unwrap_or(DEFAULT_REPORT_DAYS);
        let (from, to) = lookup::last_days(days);

        let points = price_trend(&data.database, &ids, from, to).await?;
        if points.is_empty() {
            ctx.say(format!("No prices recorded in the last {days} day(s)."))
                .await?;
            return Ok(());
        }

        let groups = group_lines(points.into_iter().map(|point| {
            let line = format!("{}: {}", point.date, format_currency(point.price));
            (point.ingredient_name, line)
        }));
        let embed = grouped_embed(format!("**Prices, last {days} day(s)**"), groups);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows how much of each ingredient was consumed over the last days.
    #[poise::command(slash_command, rename = "consumption")]
    pub async fn report_consumption(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many days back. Defaults to 30."]
        #[min = 1]
        days: Option<u32>,
    ) -> Result<()> {
        let data = ctx.data();
        let days = days.unwrap_or(DEFAULT_REPORT_DAYS);
        let (from, to) = lookup::last_days(days);

        let totals = consumption_by_ingredient(&data.database, from, to).await?;
        if totals.is_empty() {
            ctx.say(format!("Nothing consumed in the last {days} day(s)."))
                .await?;
            return Ok(());
        }

        let lines: Vec<String> = totals
            .iter()
            .map(|total| {
                format!(
                    "• **{}**: {} {}",
                    total.ingredient_name,
                    format_quantity(total.quantity),
                    total.unit
                )
            })
            .collect();
        let message = capped_message(&format!("**Consumption, last {days} day(s)**"), &lines);

        ctx.say(message).await?;
        Ok(())
    }

    /// Shows day-by-day consumption per ingredient over the last days.
    #[poise::command(slash_command, rename = "trend")]
    pub async fn report_trend(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this ingredient"]
        #[autocomplete = "autocomplete::autocomplete_ingredient_name"]
        ingredient: Option<String>,
        #[description = "How many days back. Defaults to 30."]
        #[min = 1]
        days: Option<u32>,
    ) -> Result<()> {
        let data = ctx.data();
        let ids = ingredient_filter(data, ingredient.as_deref()).await?;
        let days = days.unwrap_or(DEFAULT_REPORT_DAYS);
        let (from, to) = lookup::last_days(days);

        let rows = daily_consumption(&data.database, from, to, &ids).await?;
        if rows.is_empty() {
            ctx.say(format!("Nothing consumed in the last {days} day(s)."))
                .await?;
            return Ok(());
        }

        let units: HashMap<i64, String> = data
            .catalog
            .ingredients(&data.database)
            .await?
            .iter()
            .map(|i| (i.id, i.unit.clone()))
            .collect();
        let embed = grouped_embed(
            format!("**Daily consumption, last {days} day(s)**"),
            trend_groups(&rows, &units),
        );

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Lists production runs over the last days with their cost.
    #[poise::command(slash_command, rename = "production")]
    pub async fn report_production(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "How many days back. Defaults to 30."]
        #[min = 1]
        days: Option<u32>,
    ) -> Result<()> {
        let data = ctx.data();
        let days = days.unwrap_or(DEFAULT_REPORT_DAYS);
        let (from, to) = lookup::last_days(days);

        let runs = list_productions(&data.database, from, to).await?;
        if runs.is_empty() {
            ctx.say(format!("No production in the last {days} day(s)."))
                .await?;
            return Ok(());
        }

        let recipe_names: HashMap<i64, String> = data
            .catalog
            .recipes(&data.database)
            .await?
            .iter()
            .map(|r| (r.id, r.name.clone()))
            .collect();
        let total_cost: f64 = runs.iter().map(|run| run.total_cost).sum();
        let lines: Vec<String> = runs
            .iter()
            .map(|run| production_line(run, &recipe_names))
            .collect();
        let header = format!(
            "**Production, last {days} day(s)**: {} run(s), total cost {}",
            runs.len(),
            format_currency(total_cost)
        );

        ctx.say(capped_message(&header, &lines)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn daily(d: u32, ingredient_id: i64, name: &str, quantity: f64) -> DailyConsumption {
        DailyConsumption {
            date: day(d),
            ingredient_id,
            ingredient_name: name.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_group_lines_keeps_first_seen_order() {
        let groups = group_lines([
            ("Sugar".to_string(), "a".to_string()),
            ("Flour".to_string(), "b".to_string()),
            ("Sugar".to_string(), "c".to_string()),
        ]);
        assert_eq!(
            groups,
            vec![
                ("Sugar".to_string(), vec!["a".to_string(), "c".to_string()]),
                ("Flour".to_string(), vec!["b".to_string()]),
            ]
        );
    }

    #[test]
    fn test_trend_groups_one_line_per_day_by_ingredient_name() {
        let rows = vec![
            daily(1, 2, "Sugar", 0.5),
            daily(1, 1, "Flour", 2.0),
            daily(2, 1, "Flour", 1.25),
        ];
        let units: HashMap<i64, String> = [(1, "kg".to_string())].into_iter().collect();

        let groups = trend_groups(&rows, &units);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Flour");
        assert_eq!(
            groups[0].1,
            vec!["2024-05-01: 2 kg".to_string(), "2024-05-02: 1.25 kg".to_string()]
        );
        // Unknown unit leaves just the amount
        assert_eq!(groups[1].1, vec!["2024-05-01: 0.5".to_string()]);
    }

    #[test]
    fn test_production_line_names_recipe_and_cost() {
        let run = production::Model {
            id: 7,
            recipe_id: 3,
            date: day(4),
            quantity: 12,
            total_cost: 45.0,
            notes: String::new(),
            created_at: chrono::Utc::now(),
        };
        let names: HashMap<i64, String> = [(3, "Baguette".to_string())].into_iter().collect();

        assert_eq!(
            production_line(&run, &names),
            "2024-05-04 • #7 **Baguette** x 12 = S/ 45.00"
        );
        assert_eq!(
            production_line(&run, &HashMap::new()),
            "2024-05-04 • #7 **Recipe #3** x 12 = S/ 45.00"
        );
    }
}
