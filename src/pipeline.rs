use crate::config::{ErrorPolicy, ProcessOptions};
use crate::error::{HarvestError, Result};
use crate::model::{NormalizedRecipe, RawRecipeRecord};
use crate::normalize::normalize;
use crate::writer::RecipeWriter;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Counts of what a processing run produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub recipes: usize,
    pub ingredients: usize,
    pub steps: usize,
    /// Records dropped under [`ErrorPolicy::Skip`]
    pub skipped: usize,
}

/// Decode and normalize one JSON line, applying the optional ingredient passes
pub fn process_line(line: &str, line_number: usize, options: &ProcessOptions) -> Result<NormalizedRecipe> {
    let raw: RawRecipeRecord = serde_json::from_str(line).map_err(|source| HarvestError::Json {
        line: line_number,
        source,
    })?;
    let mut recipe = normalize(raw)?;
    for ingredient in recipe.ingredients.iter_mut() {
        if options.split_amounts {
            ingredient.split_amount();
        }
        if options.normalize_values {
            ingredient.normalize_value();
        }
    }
    Ok(recipe)
}

/// Convert JSON Lines records from `reader` into rows on `writer`
pub fn process_reader<R: BufRead, W: Write>(
    reader: R,
    writer: &mut RecipeWriter<W>,
    options: &ProcessOptions,
) -> Result<ProcessSummary> {
    let mut summary = ProcessSummary::default();

    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = n + 1;
        if line.trim().is_empty() {
            continue;
        }

        let recipe = match process_line(&line, line_number, options) {
            Ok(recipe) => recipe,
            Err(err @ (HarvestError::Json { .. } | HarvestError::MalformedInput { .. }))
                if options.error_policy == ErrorPolicy::Skip =>
            {
                warn!("Skipping record on line {}: {}", line_number, err);
                summary.skipped += 1;
                continue;
            }
            Err(err) => return Err(err),
        };

        debug!(
            "Recipe {} with {} ingredients and {} steps",
            recipe.recipe.id,
            recipe.ingredients.len(),
            recipe.preparation.len()
        );
        writer.write(&recipe)?;
        summary.recipes += 1;
        summary.ingredients += recipe.ingredients.len();
        summary.steps += recipe.preparation.len();
    }

    writer.flush()?;
    Ok(summary)
}

/// Convert the JSON Lines file at `input` into the CSV files named after `output_prefix`
pub fn process_file(input: &Path, output_prefix: &str, options: &ProcessOptions) -> Result<ProcessSummary> {
    let reader = BufReader::new(File::open(input)?);
    let mut writer = RecipeWriter::create(output_prefix, options.split_amounts)?;
    let summary = process_reader(reader, &mut writer, options)?;
    info!(
        "Wrote {} recipes, {} ingredients and {} preparation steps to {}.*.csv ({} skipped)",
        summary.recipes, summary.ingredients, summary.steps, output_prefix, summary.skipped
    );
    Ok(summary)
}

/// Output prefix derived from the input file: its path without extension
pub fn default_output_prefix(input: &Path) -> String {
    input.with_extension("").to_string_lossy().into_owned()
}
