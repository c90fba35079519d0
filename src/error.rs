use thiserror::Error;

/// Errors that can occur while harvesting or converting recipes
#[derive(Error, Debug)]
pub enum HarvestError {
    /// The record's url carries no recognizable recipe id
    #[error("Malformed input: no recipe id in url {url:?}")]
    MalformedInput { url: String },

    /// A line of the JSON Lines input could not be decoded
    #[error("Invalid JSON on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A row did not match the schema declared for its table
    #[error("Schema violation in table {table}: expected columns {expected:?}, got {actual:?}")]
    SchemaViolation {
        table: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// Failed to read input or write output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to fetch a page
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// A url could not be parsed or resolved
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, HarvestError>;
