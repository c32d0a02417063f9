//! Sequential article ingestion.
//!
//! Each link goes through download → parse → NLP → insert, one at a time.
//! Every failure is logged and classified; none stops the run:
//!
//! | Outcome | Cause | Log level |
//! |---------|-------|-----------|
//! | [`Outcome::Stored`] | record inserted | info |
//! | [`Outcome::Failed`] | download or parse failed | error |
//! | [`Outcome::Duplicate`] | url already in the store | warn |
//! | [`Outcome::Unknown`] | anything else, including panics | error |
//!
//! After each stored article the pipeline sleeps for a fixed delay to keep
//! the request rate down. There is no retry.

use crate::article;
use crate::error::{IngestError, StoreError};
use crate::models::{ArticleRecord, IngestSummary};
use crate::store::ArticleStore;
use crate::utils::truncate_for_log;
use futures::FutureExt;
use reqwest::Client;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// How processing a single link ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Stored,
    Duplicate,
    Failed,
    Unknown,
}

#[derive(Debug)]
pub struct Pipeline<S> {
    client: Client,
    store: S,
    lang: String,
    delay: Duration,
}

impl<S: ArticleStore> Pipeline<S> {
    pub fn new(client: Client, store: S, lang: &str, delay: Duration) -> Self {
        Self {
            client,
            store,
            lang: lang.to_string(),
            delay,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn process(&self, url: &str) -> Result<ArticleRecord, IngestError> {
        let page = article::download(&self.client, url).await?;
        if page.final_url() != page.url() {
            debug!(final_url = page.final_url(), "Followed redirect");
        }
        let record = page.parse(&self.lang)?.nlp();
        self.store.insert(&record).await?;
        Ok(record)
    }

    /// Process one link and report how it ended. Never fails or panics.
    #[instrument(level = "info", skip(self))]
    pub async fn process_url(&self, url: &str) -> Outcome {
        let result = match AssertUnwindSafe(self.process(url)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(IngestError::Panicked(panic_message(panic))),
        };

        match result {
            Ok(record) => {
                info!(
                    title = %truncate_for_log(&record.title, 120),
                    domain = ?record.domain(),
                    text_chars = record.text.chars().count(),
                    keywords = record.keywords.len(),
                    "Stored article"
                );
                Outcome::Stored
            }
            Err(IngestError::Article(e)) => {
                error!(error = %e, "Error downloading or parsing article");
                Outcome::Failed
            }
            Err(IngestError::Duplicate { .. }) => {
                warn!("Article already exists in the database");
                Outcome::Duplicate
            }
            Err(e) => {
                error!(error = %e, "Unknown error while processing article");
                Outcome::Unknown
            }
        }
    }

    /// Process every link in order and return the run's counters.
    #[instrument(level = "info", skip_all, fields(links = links.len()))]
    pub async fn run(&self, links: &[String]) -> IngestSummary {
        let mut summary = IngestSummary {
            unique_links: links.len(),
            ..IngestSummary::default()
        };

        for (index, url) in links.iter().enumerate() {
            debug!(index, total = links.len(), "Processing link");
            match self.process_url(url).await {
                Outcome::Stored => {
                    summary.stored += 1;
                    if !self.delay.is_zero() {
                        sleep(self.delay).await;
                    }
                }
                Outcome::Duplicate => summary.duplicates += 1,
                Outcome::Failed => summary.failed += 1,
                Outcome::Unknown => summary.unknown += 1,
            }
        }

        info!(
            unique_links = summary.unique_links,
            stored = summary.stored,
            duplicates = summary.duplicates,
            failed = summary.failed,
            unknown = summary.unknown,
            "Processed all links"
        );
        summary
    }
}

/// Prepare `store` and push `links` through a pipeline.
///
/// Only index creation can fail; per-link problems end up in the summary.
pub async fn ingest<S: ArticleStore>(
    store: S,
    client: Client,
    lang: &str,
    delay: Duration,
    links: &[String],
) -> Result<IngestSummary, StoreError> {
    store.ensure_url_index().await?;

    let pipeline = Pipeline::new(client, store, lang, delay);
    let summary = pipeline.run(links).await;

    match pipeline.store().count().await {
        Ok(total) => info!(store = %pipeline.store().describe(), total, "Collection size after run"),
        Err(e) => warn!(error = %e, "Could not count stored articles"),
    }
    Ok(summary)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
