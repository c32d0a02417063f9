//! Run configuration: defaults, optional YAML file, CLI overrides.
//!
//! Precedence is defaults < config file < command line. Defaults reproduce
//! the standing job: search "large language models" in English and store
//! into `news_db.articles`, pausing one second after each stored article.
//!
//! # File format
//!
//! ```yaml
//! search:
//!   query: "large language models"
//!   lang: en
//!   region: US
//!   period: 7d
//!   max_results: 50
//! fetch:
//!   delay_ms: 1000
//!   timeout_secs: 7
//! store:
//!   database: news_db
//!   collection: articles
//! log_file: news.log
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_QUERY: &str = "large language models";
pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_REGION: &str = "US";
pub const DEFAULT_DATABASE: &str = "news_db";
pub const DEFAULT_COLLECTION: &str = "articles";
pub const DEFAULT_LOG_FILE: &str = "news.log";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub query: String,
    pub lang: String,
    pub region: String,
    pub period: Option<String>,
    pub max_results: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            lang: DEFAULT_LANG.to_string(),
            region: DEFAULT_REGION.to_string(),
            period: None,
            max_results: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub delay_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            timeout_secs: 7,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Never read from the file; comes from the CLI or `MONGO_URL`.
    #[serde(skip)]
    pub mongo_url: Option<String>,
    pub database: String,
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mongo_url: None,
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn require_mongo_url(&self) -> Result<&str, ConfigError> {
        self.mongo_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::MissingMongoUrl)
    }
}

/// Everything one ingestion run needs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub search: SearchConfig,
    pub fetch: FetchConfig,
    pub store: StoreConfig,
    pub log_file: Option<String>,
    #[serde(skip)]
    pub dry_run: bool,
}

impl IngestConfig {
    /// Parse a YAML document. Missing sections and keys keep their defaults.
    pub fn from_yaml(yaml: &str, path: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Read and parse a YAML config file.
    #[instrument(level = "debug")]
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_yaml(&yaml, path)?;
        debug!(?config, "Loaded config file");
        Ok(config)
    }

    /// Build the run configuration from parsed CLI arguments.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let base = match cli.config.as_deref() {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(cli))
    }

    /// Apply every CLI flag that was actually given.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(query) = &cli.query {
            self.search.query = query.clone();
        }
        if let Some(lang) = &cli.lang {
            self.search.lang = lang.clone();
        }
        if let Some(region) = &cli.region {
            self.search.region = region.clone();
        }
        if cli.period.is_some() {
            self.search.period = cli.period.clone();
        }
        if cli.max_results.is_some() {
            self.search.max_results = cli.max_results;
        }
        if cli.mongo_url.is_some() {
            self.store.mongo_url = cli.mongo_url.clone();
        }
        if let Some(database) = &cli.database {
            self.store.database = database.clone();
        }
        if let Some(collection) = &cli.collection {
            self.store.collection = collection.clone();
        }
        if let Some(delay_ms) = cli.delay_ms {
            self.fetch.delay_ms = delay_ms;
        }
        if let Some(timeout_secs) = cli.timeout_secs {
            self.fetch.timeout_secs = timeout_secs;
        }
        if cli.log_file.is_some() {
            self.log_file = cli.log_file.clone();
        }
        self.dry_run = cli.dry_run;
        self
    }

    pub fn log_file(&self) -> &str {
        self.log_file.as_deref().unwrap_or(DEFAULT_LOG_FILE)
    }
}

/// Log file used when the configuration itself could not be resolved:
/// the `--log-file` flag, or [`DEFAULT_LOG_FILE`].
pub fn fallback_log_file(cli: &Cli) -> &str {
    cli.log_file.as_deref().unwrap_or(DEFAULT_LOG_FILE)
}
