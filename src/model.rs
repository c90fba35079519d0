use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One harvested recipe page, as written by the crawler (one JSON object per line)
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RawRecipeRecord {
    pub url: String,
    #[serde(default)]
    pub url_fingerprint: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub preparation_time: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub rating_avg: Option<String>,
    #[serde(default)]
    pub rating_count: Option<String>,
    #[serde(default)]
    pub comment_count: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_url: Option<String>,
    #[serde(default)]
    pub portions: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<RawIngredient>,
    #[serde(default)]
    pub preparation: Vec<String>,
    #[serde(default)]
    pub durations: Option<Durations>,
    #[serde(default)]
    pub tags: Option<Tags>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RawIngredient {
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Labeled durations, either still as a mapping or already squashed to one string
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Durations {
    Labeled(Map<String, Value>),
    Collapsed(String),
}

/// Recipe tags, either still as a list or already squashed to one string
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Tags {
    Items(Vec<String>),
    Collapsed(String),
}

/// A recipe row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub url: String,
    pub url_fingerprint: Option<String>,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub preparation_time: Option<String>,
    pub difficulty: Option<String>,
    pub date: Option<String>,
    pub rating_avg: Option<String>,
    pub rating_count: Option<String>,
    pub comment_count: Option<String>,
    pub author_name: Option<String>,
    pub author_url: Option<String>,
    pub portions: Option<String>,
    pub durations: Option<String>,
    pub tags: Option<String>,
}

/// A numeric ingredient value, or the original token when it could not be read as a number
#[derive(Debug, Clone, PartialEq)]
pub enum AmountValue {
    Integer(u64),
    /// Digit run too long for `u64`
    BigInteger(String),
    Float(f64),
    Text(String),
}

impl fmt::Display for AmountValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountValue::Integer(n) => write!(f, "{}", n),
            AmountValue::BigInteger(digits) => f.write_str(digits),
            // keep a trailing ".0" so floats stay distinguishable from integers
            AmountValue::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            AmountValue::Float(x) => write!(f, "{}", x),
            AmountValue::Text(s) => f.write_str(s),
        }
    }
}

/// The value and unit split off an ingredient amount
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmountParts {
    pub value: Option<AmountValue>,
    pub unit: Option<String>,
}

/// An ingredient row, belonging to a recipe
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ingredient {
    pub recipe_id: String,
    /// 1-based position within the recipe
    pub index: usize,
    pub section: Option<String>,
    /// Amount as found on the page, never rewritten
    pub amount: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    /// Present once the amount has been split
    pub parts: Option<AmountParts>,
}

/// A preparation step row, belonging to a recipe
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparationStep {
    pub recipe_id: String,
    pub index: usize,
    pub text: String,
}

/// Everything derived from one raw record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecipe {
    pub recipe: Recipe,
    pub ingredients: Vec<Ingredient>,
    pub preparation: Vec<PreparationStep>,
}
