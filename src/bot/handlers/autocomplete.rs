//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions come from the catalog cache, so typing in a command box does not
//! hit the database on every keystroke.

use crate::{bot::BotData, core::category, errors::Error};

/// Discord shows at most this many suggestions.
const MAX_SUGGESTIONS: usize = 25;

fn matching_names<'a, I>(names: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .map(str::to_string)
        .collect();
    matching.sort();
    matching.truncate(MAX_SUGGESTIONS);
    matching
}

/// Provides autocomplete suggestions for ingredient names.
pub async fn autocomplete_ingredient_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let data = ctx.data();
    let Ok(ingredients) = data.catalog.ingredients(&data.database).await else {
        return Vec::new();
    };
    matching_names(ingredients.iter().map(|i| i.name.as_str()), partial)
}

/// Provides autocomplete suggestions for recipe names.
pub async fn autocomplete_recipe_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let data = ctx.data();
    let Ok(recipes) = data.catalog.recipes(&data.database).await else {
        return Vec::new();
    };
    matching_names(recipes.iter().map(|r| r.name.as_str()), partial)
}

/// Provides autocomplete suggestions for category names.
pub async fn autocomplete_category(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(categories) = category::list_categories(&ctx.data().database).await else {
        return Vec::new();
    };
    matching_names(categories.iter().map(|c| c.name.as_str()), partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_names_is_case_insensitive_and_sorted() {
        let names = ["Wheat Flour", "Butter", "Rye flour", "Sugar"];
        assert_eq!(
            matching_names(names, "FLOUR"),
            vec!["Rye flour".to_string(), "Wheat Flour".to_string()]
        );
        assert_eq!(matching_names(names, "").len(), 4);
    }

    #[test]
    fn test_matching_names_caps_suggestions() {
        let names: Vec<String> = (0..40).map(|i| format!("Item {i:02}")).collect();
        let suggestions = matching_names(names.iter().map(String::as_str), "item");
        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(suggestions[0], "Item 00");
    }
}
