//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::error::ConfigError;
use crate::scout::query::QUERY_PLACEHOLDER;
use anyhow::{Context, Result};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One searchable site: a URL template plus the CSS selectors that locate
/// product cards and their fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// User label for the site; shown in results and errors
    pub name: String,

    /// Search URL template; must contain the `{query}` placeholder
    pub url_template: String,

    /// Selector for each result card
    pub card_selector: String,

    /// Selector for the title, scoped within a card
    pub title_selector: String,

    /// Selector for the price, scoped within a card
    pub price_selector: String,

    /// Selector for the product link, scoped within a card; empty = no links
    #[serde(default)]
    pub link_selector: String,

    /// Currency to assume when none is detected in the price text
    #[serde(default)]
    pub currency_hint: Option<String>,

    /// Cap on cards taken per page
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    10
}

impl SiteConfig {
    /// A filled-in sample site, used to seed the shell and tests.
    pub fn example() -> Self {
        Self {
            name: "ExampleStore".to_string(),
            url_template: "https://www.example.com/search?q={query}".to_string(),
            card_selector: ".product-card".to_string(),
            title_selector: ".title".to_string(),
            price_selector: ".price".to_string(),
            link_selector: "a".to_string(),
            currency_hint: Some("GBP".to_string()),
            max_results: default_max_results(),
        }
    }

    /// Checks the site is runnable: labelled, placeholder present, required
    /// selectors non-empty and syntactically valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyField { site: "(unnamed)".to_string(), field: "name" });
        }

        if !self.url_template.contains(QUERY_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder { site: self.name.clone() });
        }

        for (field, selector) in [
            ("card_selector", &self.card_selector),
            ("title_selector", &self.title_selector),
            ("price_selector", &self.price_selector),
        ] {
            if selector.trim().is_empty() {
                return Err(ConfigError::EmptyField { site: self.name.clone(), field });
            }
        }

        for (kind, selector) in [
            ("card", &self.card_selector),
            ("title", &self.title_selector),
            ("price", &self.price_selector),
            ("link", &self.link_selector),
        ] {
            if selector.trim().is_empty() {
                continue;
            }
            if Selector::parse(selector).is_err() {
                return Err(ConfigError::BadSelector {
                    site: self.name.clone(),
                    kind,
                    selector: selector.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Sites to search, in ranking tie-break order
    #[serde(default)]
    pub sites: Vec<SiteConfig>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Base courtesy delay before each request in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Random jitter added to the delay (0 to this value)
    #[serde(default = "default_delay_jitter_ms")]
    pub delay_jitter_ms: u64,

    /// Maximum sites fetched in flight at once; 1 = sequential
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Accept-Language header value sent with every request
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Filter: minimum price
    #[serde(default)]
    pub min_price: Option<f64>,

    /// Filter: maximum price
    #[serde(default)]
    pub max_price: Option<f64>,

    /// Drop listings whose title does not contain the query
    #[serde(default = "default_match_title")]
    pub match_title: bool,
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_delay_ms() -> u64 {
    300
}

fn default_delay_jitter_ms() -> u64 {
    200
}

fn default_concurrency() -> usize {
    4
}

fn default_accept_language() -> String {
    "en-GB,en;q=0.9".to_string()
}

fn default_match_title() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sites: Vec::new(),
            timeout_secs: default_timeout_secs(),
            delay_ms: default_delay_ms(),
            delay_jitter_ms: default_delay_jitter_ms(),
            concurrency: default_concurrency(),
            proxy: None,
            accept_language: default_accept_language(),
            format: OutputFormat::Table,
            min_price: None,
            max_price: None,
            match_title: default_match_title(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("price-scout.toml");
        if local_config.exists() {
            debug!("Found price-scout.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("price-scout").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(proxy) = std::env::var("SCOUT_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(timeout) = std::env::var("SCOUT_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }

        if let Ok(delay) = std::env::var("SCOUT_DELAY") {
            if let Ok(d) = delay.parse() {
                self.delay_ms = d;
            }
        }

        self
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
