//! Historical reports and display formatting.
//!
//! Report functions return structured rows that the bot layer renders. The
//! formatting helpers here are the single place where currency and quantities
//! are turned into text.

use crate::{
    core::{costing::LineItem, margin::Margin, production::StockShortage},
    entities::{Consumption, ConsumptionItem, Ingredient, PriceHistory, consumption, ingredient, price_history},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, prelude::*};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Currency symbol prefixed to every amount.
pub const CURRENCY_SYMBOL: &str = "S/";

/// One recorded price of an ingredient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    /// Ingredient the price belongs to
    pub ingredient_id: i64,
    /// Its name
    pub ingredient_name: String,
    /// Date the price was recorded for
    pub date: NaiveDate,
    /// Unit price
    pub price: f64,
}

/// Total consumption of one ingredient over a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionTotal {
    /// Ingredient consumed
    pub ingredient_id: i64,
    /// Its name
    pub ingredient_name: String,
    /// Its unit
    pub unit: String,
    /// Sum of all withdrawals
    pub quantity: f64,
}

/// Consumption of one ingredient on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyConsumption {
    /// Business date
    pub date: NaiveDate,
    /// Ingredient consumed
    pub ingredient_id: i64,
    /// Its name
    pub ingredient_name: String,
    /// Sum of that day's withdrawals
    pub quantity: f64,
}

async fn ingredient_index(db: &DatabaseConnection) -> Result<HashMap<i64, ingredient::Model>> {
    Ok(Ingredient::find()
        .all(db)
        .await?
        .into_iter()
        .map(|i| (i.id, i))
        .collect())
}

fn display_name(index: &HashMap<i64, ingredient::Model>, ingredient_id: i64) -> String {
    index
        .get(&ingredient_id)
        .map_or_else(|| format!("Ingredient #{ingredient_id}"), |i| i.name.clone())
}

/// Recorded prices within `from..=to`, ordered by ingredient name then date.
///
/// An empty `ingredient_ids` selects every ingredient.
pub async fn price_trend(
    db: &DatabaseConnection,
    ingredient_ids: &[i64],
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<PricePoint>> {
    let mut query = PriceHistory::find().filter(price_history::Column::RecordedOn.between(from, to));
    if !ingredient_ids.is_empty() {
        query = query.filter(price_history::Column::IngredientId.is_in(ingredient_ids.to_vec()));
    }
    let entries = query.all(db).await?;
    let index = ingredient_index(db).await?;

    let mut points: Vec<(i64, PricePoint)> = entries
        .into_iter()
        .map(|entry| {
            (
                entry.id,
                PricePoint {
                    ingredient_id: entry.ingredient_id,
                    ingredient_name: display_name(&index, entry.ingredient_id),
                    date: entry.recorded_on,
                    price: entry.price,
                },
            )
        })
        .collect();
    points.sort_by(|(a_id, a), (b_id, b)| {
        a.ingredient_name
            .cmp(&b.ingredient_name)
            .then(a.date.cmp(&b.date))
            .then(a_id.cmp(b_id))
    });
    Ok(points.into_iter().map(|(_, point)| point).collect())
}

/// Items of every consumption dated within `from..=to`, paired with their date.
async fn consumed_between(
    db: &DatabaseConnection,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<(NaiveDate, i64, f64)>> {
    let rows = ConsumptionItem::find()
        .find_also_related(Consumption)
        .filter(consumption::Column::Date.between(from, to))
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(item, header)| {
            header.map(|header| (header.date, item.ingredient_id, item.quantity))
        })
        .collect())
}

/// Total consumption per ingredient within `from..=to`, largest first.
pub async fn consumption_by_ingredient(
    db: &DatabaseConnection,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<ConsumptionTotal>> {
    let mut totals: HashMap<i64, f64> = HashMap::new();
    for (_, ingredient_id, quantity) in consumed_between(db, from, to).await? {
        *totals.entry(ingredient_id).or_insert(0.0) += quantity;
    }
    let index = ingredient_index(db).await?;

    let mut rows: Vec<ConsumptionTotal> = totals
        .into_iter()
        .map(|(ingredient_id, quantity)| ConsumptionTotal {
            ingredient_id,
            ingredient_name: display_name(&index, ingredient_id),
            unit: index
                .get(&ingredient_id)
                .map(|i| i.unit.clone())
                .unwrap_or_default(),
            quantity,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.quantity
            .total_cmp(&a.quantity)
            .then_with(|| a.ingredient_name.cmp(&b.ingredient_name))
    });
    Ok(rows)
}

/// Consumption per day and ingredient within `from..=to`, ordered by date
/// then ingredient name.
///
/// An empty `ingredient_ids` selects every ingredient.
pub async fn daily_consumption(
    db: &DatabaseConnection,
    from: NaiveDate,
    to: NaiveDate,
    ingredient_ids: &[i64],
) -> Result<Vec<DailyConsumption>> {
    let mut sums: BTreeMap<(NaiveDate, i64), f64> = BTreeMap::new();
    for (date, ingredient_id, quantity) in consumed_between(db, from, to).await? {
        if !ingredient_ids.is_empty() && !ingredient_ids.contains(&ingredient_id) {
            continue;
        }
        *sums.entry((date, ingredient_id)).or_insert(0.0) += quantity;
    }
    let index = ingredient_index(db).await?;

    let mut rows: Vec<DailyConsumption> = sums
        .into_iter()
        .map(|((date, ingredient_id), quantity)| DailyConsumption {
            date,
            ingredient_id,
            ingredient_name: display_name(&index, ingredient_id),
            quantity,
        })
        .collect();
    rows.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.ingredient_name.cmp(&b.ingredient_name))
    });
    Ok(rows)
}

/// Formats an amount as currency with two decimals, e.g. `S/ 14.50`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-{CURRENCY_SYMBOL} {:.2}", amount.abs())
    } else {
        format!("{CURRENCY_SYMBOL} {amount:.2}")
    }
}

/// Formats a quantity with up to three decimals and no trailing zeros.
#[must_use]
pub fn format_quantity(quantity: f64) -> String {
    let fixed = format!("{quantity:.3}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Formats a margin as `S/ 5.50 (27.5%)`.
#[must_use]
pub fn format_margin(margin: &Margin) -> String {
    format!(
        "{} ({:.1}%)",
        format_currency(margin.margin),
        margin.margin_percent
    )
}

/// One cost breakdown row, e.g. `Flour: 2 kg x S/ 2.50 = S/ 5.00`.
#[must_use]
pub fn format_line_item(line: &LineItem) -> String {
    format!(
        "{}: {} {} x {} = {}",
        line.label,
        format_quantity(line.quantity),
        line.unit,
        format_currency(line.unit_price),
        format_currency(line.subtotal)
    )
}

/// Describes a shortage, e.g. `Eggs: need 6 unit, have 4 unit (missing 2)`.
#[must_use]
pub fn format_shortage(shortage: &StockShortage) -> String {
    format!(
        "{}: need {} {unit}, have {} {unit} (missing {})",
        shortage.ingredient_name,
        format_quantity(shortage.required),
        format_quantity(shortage.available),
        format_quantity(shortage.missing()),
        unit = shortage.unit
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::{
            consumption::record_manual_consumption,
            margin::calculate_margin,
            price_history::record_price,
            production::register_production,
        },
        test_utils::*,
    };

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(14.5), "S/ 14.50");
        assert_eq!(format_currency(0.0), "S/ 0.00");
        assert_eq!(format_currency(-2.5), "-S/ 2.50");
        assert_eq!(format_currency(1234.567), "S/ 1234.57");
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(0.5), "0.5");
        assert_eq!(format_quantity(0.125), "0.125");
        assert_eq!(format_quantity(10.0), "10");
        assert_eq!(format_quantity(-0.0001), "0");
    }

    #[test]
    fn test_format_margin_and_lines() {
        assert_eq!(format_margin(&calculate_margin(20.0, 14.5)), "S/ 5.50 (27.5%)");

        let line = LineItem {
            label: "Flour".to_string(),
            quantity: 2.0,
            unit: "kg".to_string(),
            unit_price: 2.5,
            subtotal: 5.0,
        };
        assert_eq!(format_line_item(&line), "Flour: 2 kg x S/ 2.50 = S/ 5.00");

        let shortage = StockShortage {
            ingredient_id: 3,
            ingredient_name: "Eggs".to_string(),
            unit: "unit".to_string(),
            required: 6.0,
            available: 4.0,
        };
        assert_eq!(
            format_shortage(&shortage),
            "Eggs: need 6 unit, have 4 unit (missing 2)"
        );
    }

    #[tokio::test]
    async fn test_price_trend_orders_by_name_then_date() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = test_cache();
        let sugar = create_test_ingredient(&db, &cache, "Sugar", 4.0).await?;
        let butter = create_test_ingredient(&db, &cache, "Butter", 9.0).await?;
        let salt = create_test_ingredient(&db, &cache, "Salt", 0.8).await?;

        record_price(&db, sugar.id, 4.2, day(20)).await?;
        record_price(&db, sugar.id, 4.1, day(2)).await?;
        record_price(&db, butter.id, 9.5, day(10)).await?;
        record_price(&db, salt.id, 0.9, day(10)).await?;
        // Outside the range
        record_price(&db, butter.id, 8.0, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).await?;

        let points = price_trend(&db, &[sugar.id, butter.id], day(1), day(30)).await?;
        let summary: Vec<(&str, f64)> = points
            .iter()
            .map(|p| (p.ingredient_name.as_str(), p.price))
            .collect();
        assert_eq!(summary, vec![("Butter", 9.5), ("Sugar", 4.1), ("Sugar", 4.2)]);

        let everything = price_trend(&db, &[], day(1), day(30)).await?;
        assert_eq!(everything.len(), 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_consumption_reports() -> Result<()> {
        let db = setup_test_db().await?;
        let cache = test_cache();
        let flour = create_custom_ingredient(&db, &cache, "Flour", 2.5, 50.0, 1.0, "kg").await?;
        let butter = create_custom_ingredient(&db, &cache, "Butter", 9.0, 10.0, 1.0, "kg").await?;
        let bread = create_test_recipe(&db, &cache, "Bread", 20.0, &[(flour.id, 2.0)]).await?;

        record_manual_consumption(&db, &cache, butter.id, 1.0, "", day(3)).await?;
        record_manual_consumption(&db, &cache, butter.id, 0.5, "", day(3)).await?;
        record_manual_consumption(&db, &cache, flour.id, 1.0, "", day(4)).await?;
        register_production(&db, &cache, bread.id, 5, "", day(4)).await?;
        // Outside the range
        record_manual_consumption(&db, &cache, butter.id, 2.0, "", day(28)).await?;

        let totals = consumption_by_ingredient(&db, day(1), day(10)).await?;
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].ingredient_name, "Flour");
        assert_eq!(totals[0].quantity, 11.0);
        assert_eq!(totals[0].unit, "kg");
        assert_eq!(totals[1].ingredient_name, "Butter");
        assert_eq!(totals[1].quantity, 1.5);

        let daily = daily_consumption(&db, day(1), day(10), &[]).await?;
        let summary: Vec<(NaiveDate, &str, f64)> = daily
            .iter()
            .map(|d| (d.date, d.ingredient_name.as_str(), d.quantity))
            .collect();
        assert_eq!(
            summary,
            vec![(day(3), "Butter", 1.5), (day(4), "Flour", 11.0)]
        );

        let butter_only = daily_consumption(&db, day(1), day(30), &[butter.id]).await?;
        assert_eq!(butter_only.len(), 2);
        assert_eq!(butter_only[1].date, day(28));

        Ok(())
    }
}
