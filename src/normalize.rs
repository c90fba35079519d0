use crate::amount::{normalize_value, split_amount};
use crate::error::{HarvestError, Result};
use crate::model::{
    AmountParts, AmountValue, Durations, Ingredient, NormalizedRecipe, PreparationStep,
    RawRecipeRecord, Recipe, Tags,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Separator between squashed list entries
pub const LIST_SEPARATOR: &str = " | ";

static RECIPE_ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"/rezepte/(\d+)/").unwrap());

/// Extract the numeric recipe id from a recipe url
pub fn recipe_id(url: &str) -> Result<String> {
    RECIPE_ID_REGEX
        .captures(url)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| HarvestError::MalformedInput {
            url: url.to_string(),
        })
}

/// Squash labeled durations into `label: value | label: value`
pub fn collapse_durations(durations: Durations) -> String {
    match durations {
        Durations::Labeled(map) => map
            .into_iter()
            .map(|(label, value)| match value {
                Value::String(text) => format!("{}: {}", label, text),
                other => format!("{}: {}", label, other),
            })
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR),
        Durations::Collapsed(text) => text,
    }
}

/// Squash tags into `tag | tag`
pub fn collapse_tags(tags: Tags) -> String {
    match tags {
        Tags::Items(items) => items.join(LIST_SEPARATOR),
        Tags::Collapsed(text) => text,
    }
}

/// Turn one raw record into a recipe row plus its ingredient and preparation rows
pub fn normalize(raw: RawRecipeRecord) -> Result<NormalizedRecipe> {
    let id = recipe_id(&raw.url)?;

    let ingredients = raw
        .ingredients
        .into_iter()
        .enumerate()
        .map(|(n, ingredient)| Ingredient {
            recipe_id: id.clone(),
            index: n + 1,
            section: ingredient.section,
            amount: ingredient.amount,
            name: ingredient.name,
            url: ingredient.url,
            parts: None,
        })
        .collect();

    let preparation = raw
        .preparation
        .into_iter()
        .enumerate()
        .map(|(n, text)| PreparationStep {
            recipe_id: id.clone(),
            index: n + 1,
            text,
        })
        .collect();

    let recipe = Recipe {
        id,
        url: raw.url,
        url_fingerprint: raw.url_fingerprint,
        name: raw.name,
        image_url: raw.image_url,
        description: raw.description,
        preparation_time: raw.preparation_time,
        difficulty: raw.difficulty,
        date: raw.date,
        rating_avg: raw.rating_avg,
        rating_count: raw.rating_count,
        comment_count: raw.comment_count,
        author_name: raw.author_name,
        author_url: raw.author_url,
        portions: raw.portions,
        durations: raw.durations.map(collapse_durations),
        tags: raw.tags.map(collapse_tags),
    };

    Ok(NormalizedRecipe {
        recipe,
        ingredients,
        preparation,
    })
}

impl Ingredient {
    /// Split the amount into value and unit, leaving the amount itself untouched
    pub fn split_amount(&mut self) {
        let (value, unit) = match self.amount.as_deref() {
            Some(amount) => split_amount(amount),
            None => (None, None),
        };
        self.parts = Some(AmountParts {
            value: value.map(AmountValue::Text),
            unit,
        });
    }

    /// Normalize the split value into a number (when present)
    pub fn normalize_value(&mut self) {
        if let Some(parts) = self.parts.as_mut() {
            if let Some(AmountValue::Text(token)) = &parts.value {
                parts.value = normalize_value(Some(token));
            }
        }
    }
}
