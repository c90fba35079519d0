pub mod amount;
pub mod config;
pub mod crawler;
pub mod error;
pub mod extractors;
pub mod fetcher;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod table;
pub mod text;
pub mod writer;

pub use amount::{normalize_value, split_amount};
pub use config::{CrawlConfig, ErrorPolicy, HarvestConfig, ProcessOptions};
pub use crawler::{CrawlSummary, Crawler};
pub use error::HarvestError;
pub use model::{AmountValue, Ingredient, NormalizedRecipe, PreparationStep, RawRecipeRecord, Recipe};
pub use normalize::normalize;
pub use pipeline::{process_file, process_reader, ProcessSummary};
