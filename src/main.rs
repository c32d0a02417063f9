//! # news_ingest
//!
//! One-shot news ingestion: search Google News for a term, download every
//! linked article, extract its title, text, summary and keywords, and store
//! the result in MongoDB. A unique index on `url` keeps the collection free
//! of duplicates across runs.
//!
//! ## Usage
//!
//! ```sh
//! MONGO_URL=mongodb://localhost:27017 news_ingest
//! news_ingest -q "rust programming language" --period 7d
//! news_ingest --dry-run
//! ```
//!
//! ## Flow
//!
//! 1. **Configure**: defaults, optional YAML file, CLI flags, `.env`
//! 2. **Search**: one Google News query; log how many articles were found
//! 3. **Connect**: MongoDB (or the in-memory store for `--dry-run`)
//! 4. **Index**: ensure the unique index on `url`
//! 5. **Ingest**: for each link, download → parse → extract → insert → pause
//!
//! Per-article failures are logged and skipped. Setup failures end the run
//! with a non-zero exit status.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};

mod article;
mod cli;
mod config;
mod error;
mod logging;
mod models;
mod pipeline;
mod search;
mod store;
mod utils;

use cli::Cli;
use config::IngestConfig;
use search::GoogleNews;
use store::{MemoryStore, MongoStore};
use utils::http_client;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Must run before parsing so clap's MONGO_URL fallback sees .env values
    dotenv::dotenv().ok();

    let args = Cli::parse();
    let config = match IngestConfig::resolve(&args) {
        Ok(config) => config,
        Err(e) => {
            init_logging(config::fallback_log_file(&args))?;
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    init_logging(config.log_file())?;

    let start_time = std::time::Instant::now();
    info!("news_ingest starting up");
    debug!(
        query = %config.search.query,
        lang = %config.search.lang,
        region = %config.search.region,
        period = ?config.search.period,
        max_results = ?config.search.max_results,
        database = %config.store.database,
        collection = %config.store.collection,
        delay_ms = config.fetch.delay_ms,
        dry_run = config.dry_run,
        log_file = %config.log_file(),
        "Resolved configuration"
    );

    let client = match http_client(&config.fetch) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return Err(e.into());
        }
    };

    // ---- Search ----
    let mut news = GoogleNews::new(client.clone());
    news.set_lang(&config.search.lang);
    news.set_region(&config.search.region);
    news.set_period(config.search.period.as_deref());
    news.set_max_results(config.search.max_results);

    if let Err(e) = news.search(&config.search.query).await {
        error!(error = %e, query = %config.search.query, "Search failed");
        return Err(e.into());
    }
    info!(count = news.total_count(), "Number of articles found");
    let links = news.links();
    if links.len() != news.total_count() {
        debug!(
            unique_links = links.len(),
            "Dropped repeated links from the search results"
        );
    }

    // ---- Store + ingest ----
    let delay = config.fetch.delay();
    let lang = config.search.lang.as_str();
    let summary = if config.dry_run {
        info!("Dry run: articles go to an in-memory store");
        let store = MemoryStore::new(config.store.collection.as_str());
        let result = pipeline::ingest(store.clone(), client, lang, delay, &links).await;
        for record in store.records().await {
            debug!(
                url = %record.url,
                title = %record.title,
                keywords = ?record.keywords,
                summary = %utils::truncate_for_log(&record.summary, 300),
                "Dry-run record"
            );
        }
        result
    } else {
        let uri = match config.store.require_mongo_url() {
            Ok(uri) => uri,
            Err(e) => {
                error!(error = %e, "Cannot connect to the article store");
                return Err(e.into());
            }
        };
        let store =
            match MongoStore::connect(uri, &config.store.database, &config.store.collection).await
            {
                Ok(store) => store,
                Err(e) => {
                    error!(error = %e, "Failed to connect to MongoDB");
                    return Err(e.into());
                }
            };
        pipeline::ingest(store, client, lang, delay, &links).await
    };

    let summary = match summary {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Failed to prepare the article collection");
            return Err(e.into());
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        search_hits = news.total_count(),
        unique_links = summary.unique_links,
        processed = summary.processed(),
        stored = summary.stored,
        duplicates = summary.duplicates,
        failed = summary.failed,
        unknown = summary.unknown,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Ingestion finished"
    );
    debug!("End of run");

    Ok(())
}

/// Install logging, reporting failures on stderr since no subscriber exists yet.
fn init_logging(log_file: &str) -> Result<(), Box<dyn Error>> {
    logging::init(log_file).inspect_err(|e| {
        eprintln!("news_ingest: cannot initialise logging to {log_file}: {e}");
    })
}
