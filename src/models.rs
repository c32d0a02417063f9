//! Data models for search results and stored articles.
//!
//! - [`SearchHit`]: one item returned by the news-search provider
//! - [`ArticleRecord`]: the document persisted for each extracted article
//! - [`IngestSummary`]: per-run counters reported when ingestion ends

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A single result from a news search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Headline as published by the provider.
    pub title: String,
    /// Link to the article. This is what the pipeline fetches.
    pub link: String,
    /// Name of the outlet, when the provider reports one.
    pub source: Option<String>,
    /// Publication time, when the provider reports a parseable one.
    pub published: Option<DateTime<FixedOffset>>,
}

/// A scraped news article as stored in the document store.
///
/// `url` is the unique key. It always holds the link the search returned,
/// never the final URL after redirects, so re-running the same search
/// collides on the same key.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleRecord {
    pub title: String,
    pub text: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub url: String,
}

impl ArticleRecord {
    /// Host portion of the record URL, without a leading `www.`.
    ///
    /// ```ignore
    /// // "https://www.example.com/a" -> Some("example.com")
    /// ```
    pub fn domain(&self) -> Option<String> {
        url::Url::parse(&self.url).ok().and_then(|parsed| {
            parsed
                .host_str()
                .map(|host| host.trim_start_matches("www.").to_string())
        })
    }
}

/// Counters for one ingestion run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Distinct links handed to the pipeline, after search results are
    /// de-duplicated.
    pub unique_links: usize,
    /// Records inserted.
    pub stored: usize,
    /// Links rejected by the unique index.
    pub duplicates: usize,
    /// Links that could not be downloaded or parsed.
    pub failed: usize,
    /// Links that failed for any other reason.
    pub unknown: usize,
}

impl IngestSummary {
    pub fn processed(&self) -> usize {
        self.stored + self.duplicates + self.failed + self.unknown
    }
}
