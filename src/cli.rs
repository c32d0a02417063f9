//! Command-line interface definitions for news_ingest.
//!
//! Every option is optional: anything left unset falls back to the YAML
//! config file (if one is given) and then to the built-in defaults. The
//! MongoDB connection string can also come from `MONGO_URL`, including one
//! loaded from a `.env` file.

use clap::Parser;

/// Command-line arguments for a single ingestion run.
///
/// # Examples
///
/// ```sh
/// # Default job: "large language models", English, into news_db.articles
/// news_ingest
///
/// # Different query over the last week, with a config file
/// news_ingest -q "rust programming language" --period 7d -c ingest.yaml
///
/// # Extract and log everything without touching MongoDB
/// news_ingest --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Search language (ISO 639-1, e.g. "en")
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Search region (ISO 3166-1 alpha-2, e.g. "US")
    #[arg(long)]
    pub region: Option<String>,

    /// Restrict results to a recent period, e.g. "1d", "7d", "12h"
    #[arg(long)]
    pub period: Option<String>,

    /// Maximum number of search results to process
    #[arg(long)]
    pub max_results: Option<usize>,

    /// MongoDB connection string
    #[arg(long, env = "MONGO_URL", hide_env_values = true)]
    pub mongo_url: Option<String>,

    /// Database name
    #[arg(long)]
    pub database: Option<String>,

    /// Collection name
    #[arg(long)]
    pub collection: Option<String>,

    /// Pause after each stored article, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Per-request HTTP timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<String>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Store into an in-process memory store instead of MongoDB
    #[arg(long)]
    pub dry_run: bool,
}
