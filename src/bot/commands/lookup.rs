//! Name resolution and date helpers shared by the commands.

use crate::{
    bot::BotData,
    core::today,
    entities::{ingredient, recipe},
    errors::{Error, Result},
};
use chrono::{Days, NaiveDate};

/// Finds an ingredient by name, ignoring case.
///
/// # Errors
/// Returns `Error::IngredientNotFound` when no ingredient has that name.
pub async fn ingredient_named(data: &BotData, name: &str) -> Result<ingredient::Model> {
    let wanted = name.trim().to_lowercase();
    data.catalog
        .ingredients(&data.database)
        .await?
        .iter()
        .find(|i| i.name.to_lowercase() == wanted)
        .cloned()
        .ok_or_else(|| Error::IngredientNotFound {
            name: name.trim().to_string(),
        })
}

/// Finds a recipe by name, ignoring case.
pub async fn recipe_named(data: &BotData, name: &str) -> Result<recipe::Model> {
    let wanted = name.trim().to_lowercase();
    data.catalog
        .recipes(&data.database)
        .await?
        .iter()
        .find(|r| r.name.to_lowercase() == wanted)
        .cloned()
        .ok_or_else(|| Error::RecipeNotFound {
            name: name.trim().to_string(),
        })
}

/// Inclusive date range covering the last `days` days up to today.
#[must_use]
pub fn last_days(days: u32) -> (NaiveDate, NaiveDate) {
    trailing_range(today(), days)
}

fn trailing_range(to: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    let span = u64::from(days.max(1) - 1);
    let from = to.checked_sub_days(Days::new(span)).unwrap_or(NaiveDate::MIN);
    (from, to)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_trailing_range_includes_today() {
        let to = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(
            trailing_range(to, 7),
            (NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), to)
        );
        assert_eq!(trailing_range(to, 1), (to, to));
        assert_eq!(trailing_range(to, 0), (to, to));
    }
}
