use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Main harvest configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HarvestConfig {
    /// Options for converting JSON Lines records into tables
    #[serde(default)]
    pub process: ProcessOptions,
    /// Options for crawling the recipe site
    #[serde(default)]
    pub crawl: CrawlConfig,
}

/// What to do with a record that cannot be decoded or has no recipe id
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the whole run on the first bad record
    #[default]
    Abort,
    /// Log the bad record and continue with the next one
    Skip,
}

/// Post-processing applied to each record
#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub struct ProcessOptions {
    /// Split ingredient amounts into value and unit
    #[serde(default)]
    pub split_amounts: bool,
    /// Normalize split values into numbers (only makes sense with split_amounts)
    #[serde(default)]
    pub normalize_values: bool,
    #[serde(default)]
    pub error_policy: ErrorPolicy,
}

/// Crawler settings
#[derive(Debug, Deserialize, Clone)]
pub struct CrawlConfig {
    /// Page the crawl starts from
    #[serde(default = "default_start_url")]
    pub start_url: String,
    /// Hosts (and their subdomains) the crawler may visit
    #[serde(default = "default_allowed_domains")]
    pub allowed_domains: Vec<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Delay between two requests in milliseconds
    #[serde(default = "default_download_delay_ms")]
    pub download_delay_ms: u64,
    /// Maximum link depth followed from the start page
    #[serde(default = "default_depth_limit")]
    pub depth_limit: usize,
    /// Stop after this many recipes (unbounded when absent)
    #[serde(default)]
    pub max_recipes: Option<usize>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: default_start_url(),
            allowed_domains: default_allowed_domains(),
            user_agent: default_user_agent(),
            download_delay_ms: default_download_delay_ms(),
            depth_limit: default_depth_limit(),
            max_recipes: None,
            timeout: default_timeout(),
        }
    }
}

// Default value functions
fn default_start_url() -> String {
    "https://www.chefkoch.de/rezepte/".to_string()
}

fn default_allowed_domains() -> Vec<String> {
    vec!["chefkoch.de".to_string()]
}

fn default_user_agent() -> String {
    "RecipeSpider".to_string()
}

// Pagination links only appear while browsing through the pages, so the
// crawl needs a deep limit.
fn default_depth_limit() -> usize {
    1000
}

fn default_download_delay_ms() -> u64 {
    1400
}

fn default_timeout() -> u64 {
    30
}

impl HarvestConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with HARVEST__ prefix
    /// 2. harvest.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: HARVEST__CRAWL__DOWNLOAD_DELAY_MS
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<HarvestConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("harvest").required(false))
        // Use double underscore for nested: HARVEST__PROCESS__SPLIT_AMOUNTS
        .add_source(
            Environment::with_prefix("HARVEST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> HarvestConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_values() {
        let crawl = CrawlConfig::default();
        assert_eq!(crawl.start_url, "https://www.chefkoch.de/rezepte/");
        assert_eq!(crawl.allowed_domains, vec!["chefkoch.de"]);
        assert_eq!(crawl.user_agent, "RecipeSpider");
        assert_eq!(crawl.download_delay_ms, 1400);
        assert_eq!(crawl.depth_limit, 1000);
        assert!(crawl.max_recipes.is_none());

        let process = ProcessOptions::default();
        assert!(!process.split_amounts);
        assert!(!process.normalize_values);
        assert_eq!(process.error_policy, ErrorPolicy::Abort);
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let config = from_toml("");
        assert_eq!(config.crawl.download_delay_ms, 1400);
        assert_eq!(config.process.error_policy, ErrorPolicy::Abort);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = from_toml(
            r#"
            [process]
            split_amounts = true
            error_policy = "skip"

            [crawl]
            download_delay_ms = 250
            max_recipes = 10
            "#,
        );

        assert!(config.process.split_amounts);
        assert!(!config.process.normalize_values);
        assert_eq!(config.process.error_policy, ErrorPolicy::Skip);
        assert_eq!(config.crawl.download_delay_ms, 250);
        assert_eq!(config.crawl.max_recipes, Some(10));
        assert_eq!(config.crawl.user_agent, "RecipeSpider");
    }

    #[test]
    fn test_load_config_without_file() {
        // No harvest.toml in the test working directory
        assert!(load_config().is_ok());
    }
}
