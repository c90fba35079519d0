use crate::error::Result;
use crate::model::{Ingredient, NormalizedRecipe, PreparationStep, Recipe};
use crate::table::{Row, Schema, TableWriter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const RECIPE_COLUMNS: [&str; 17] = [
    "id",
    "url",
    "url_fingerprint",
    "name",
    "image_url",
    "description",
    "preparation_time",
    "difficulty",
    "date",
    "rating_avg",
    "rating_count",
    "comment_count",
    "author_name",
    "author_url",
    "portions",
    "durations",
    "tags",
];

pub const INGREDIENT_COLUMNS: [&str; 6] = ["recipe_id", "index", "section", "amount", "name", "url"];

// amount, value and unit stay together at the end once the amount is split
pub const SPLIT_INGREDIENT_COLUMNS: [&str; 8] = [
    "recipe_id",
    "index",
    "section",
    "name",
    "url",
    "amount",
    "value",
    "unit",
];

pub const PREPARATION_COLUMNS: [&str; 3] = ["recipe_id", "index", "text"];

pub fn recipe_schema() -> Schema {
    Schema::new("recipes", &RECIPE_COLUMNS)
}

pub fn ingredient_schema(split_amounts: bool) -> Schema {
    if split_amounts {
        Schema::new("ingredients", &SPLIT_INGREDIENT_COLUMNS)
    } else {
        Schema::new("ingredients", &INGREDIENT_COLUMNS)
    }
}

pub fn preparation_schema() -> Schema {
    Schema::new("preparation", &PREPARATION_COLUMNS)
}

impl Row for Recipe {
    fn fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("id", Some(self.id.clone())),
            ("url", Some(self.url.clone())),
            ("url_fingerprint", self.url_fingerprint.clone()),
            ("name", self.name.clone()),
            ("image_url", self.image_url.clone()),
            ("description", self.description.clone()),
            ("preparation_time", self.preparation_time.clone()),
            ("difficulty", self.difficulty.clone()),
            ("date", self.date.clone()),
            ("rating_avg", self.rating_avg.clone()),
            ("rating_count", self.rating_count.clone()),
            ("comment_count", self.comment_count.clone()),
            ("author_name", self.author_name.clone()),
            ("author_url", self.author_url.clone()),
            ("portions", self.portions.clone()),
            ("durations", self.durations.clone()),
            ("tags", self.tags.clone()),
        ]
    }
}

impl Row for Ingredient {
    fn fields(&self) -> Vec<(&'static str, Option<String>)> {
        let mut fields = vec![
            ("recipe_id", Some(self.recipe_id.clone())),
            ("index", Some(self.index.to_string())),
            ("section", self.section.clone()),
        ];
        match &self.parts {
            None => fields.extend([
                ("amount", self.amount.clone()),
                ("name", self.name.clone()),
                ("url", self.url.clone()),
            ]),
            Some(parts) => fields.extend([
                ("name", self.name.clone()),
                ("url", self.url.clone()),
                ("amount", self.amount.clone()),
                ("value", parts.value.as_ref().map(|v| v.to_string())),
                ("unit", parts.unit.clone()),
            ]),
        }
        fields
    }
}

impl Row for PreparationStep {
    fn fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("recipe_id", Some(self.recipe_id.clone())),
            ("index", Some(self.index.to_string())),
            ("text", Some(self.text.clone())),
        ]
    }
}

/// Output file names for a prefix: `<prefix>.csv`, `<prefix>.ingredients.csv`, `<prefix>.preparation.csv`
pub fn output_paths(prefix: &str) -> (PathBuf, PathBuf, PathBuf) {
    (
        PathBuf::from(format!("{}.csv", prefix)),
        PathBuf::from(format!("{}.ingredients.csv", prefix)),
        PathBuf::from(format!("{}.preparation.csv", prefix)),
    )
}

/// Writes each recipe to three tables
pub struct RecipeWriter<W: Write> {
    pub recipes: TableWriter<W>,
    pub ingredients: TableWriter<W>,
    pub preparation: TableWriter<W>,
}

impl<W: Write> RecipeWriter<W> {
    pub fn new(recipes: W, ingredients: W, preparation: W, split_amounts: bool) -> Result<Self> {
        Ok(Self {
            recipes: TableWriter::new(recipe_schema(), recipes)?,
            ingredients: TableWriter::new(ingredient_schema(split_amounts), ingredients)?,
            preparation: TableWriter::new(preparation_schema(), preparation)?,
        })
    }

    pub fn write(&mut self, recipe: &NormalizedRecipe) -> Result<()> {
        self.recipes.write(&recipe.recipe)?;
        for ingredient in &recipe.ingredients {
            self.ingredients.write(ingredient)?;
        }
        for step in &recipe.preparation {
            self.preparation.write(step)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.recipes.flush()?;
        self.ingredients.flush()?;
        self.preparation.flush()
    }
}

impl RecipeWriter<BufWriter<File>> {
    /// Create the three CSV files next to each other, named after `prefix`
    pub fn create(prefix: &str, split_amounts: bool) -> Result<Self> {
        let (recipes, ingredients, preparation) = output_paths(prefix);
        Self::new(
            create_file(&recipes)?,
            create_file(&ingredients)?,
            create_file(&preparation)?,
            split_amounts,
        )
    }
}

fn create_file(path: &Path) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}
