//! Google News search over the public RSS endpoint.
//!
//! The search endpoint takes the query plus language and region parameters:
//!
//! ```text
//! https://news.google.com/rss/search?q=large%20language%20models&hl=en&gl=US&ceid=US:en
//! ```
//!
//! A period filter (`7d`, `12h`, ...) is expressed inside the query itself as
//! `when:7d`. The response is RSS 2.0; each `<item>` becomes a [`SearchHit`].

use crate::error::SearchError;
use crate::models::SearchHit;
use chrono::DateTime;
use itertools::Itertools;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const GOOGLE_NEWS_SEARCH_URL: &str = "https://news.google.com/rss/search";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(rename = "pubDate", default)]
    pub_date: Option<String>,
    #[serde(default)]
    source: Option<RssSource>,
}

#[derive(Debug, Deserialize)]
struct RssSource {
    #[serde(rename = "$text", default)]
    name: String,
}

impl From<RssItem> for SearchHit {
    fn from(item: RssItem) -> Self {
        let published = item
            .pub_date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc2822(d.trim()).ok());
        let source = item
            .source
            .map(|s| s.name.trim().to_string())
            .filter(|s| !s.is_empty());
        SearchHit {
            title: item.title.trim().to_string(),
            link: item.link.trim().to_string(),
            source,
            published,
        }
    }
}

/// Parse a Google News RSS document into search hits.
///
/// Items without a link are dropped.
pub fn parse_feed(xml: &str) -> Result<Vec<SearchHit>, SearchError> {
    let rss: Rss = quick_xml::de::from_str(xml)?;
    Ok(rss
        .channel
        .items
        .into_iter()
        .map(SearchHit::from)
        .filter(|hit| !hit.link.is_empty())
        .collect())
}

/// Google News search client.
///
/// ```ignore
/// let mut news = GoogleNews::new(client);
/// news.set_lang("en");
/// news.search("large language models").await?;
/// info!(count = news.total_count(), "found");
/// for url in news.links() { /* ... */ }
/// ```
#[derive(Debug, Clone)]
pub struct GoogleNews {
    client: Client,
    endpoint: String,
    lang: String,
    region: String,
    period: Option<String>,
    max_results: Option<usize>,
    results: Vec<SearchHit>,
}

impl GoogleNews {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: GOOGLE_NEWS_SEARCH_URL.to_string(),
            lang: "en".to_string(),
            region: "US".to_string(),
            period: None,
            max_results: None,
            results: Vec::new(),
        }
    }

    /// Point the client at a different search endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn set_lang(&mut self, lang: &str) {
        self.lang = lang.to_string();
    }

    pub fn set_region(&mut self, region: &str) {
        self.region = region.to_uppercase();
    }

    /// Restrict results to a recent window such as `7d` or `12h`.
    pub fn set_period(&mut self, period: Option<&str>) {
        self.period = period
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
    }

    pub fn set_max_results(&mut self, max_results: Option<usize>) {
        self.max_results = max_results;
    }

    /// Build the request URL for `query` with the current settings.
    pub fn search_url(&self, query: &str) -> Result<Url, SearchError> {
        let q = match &self.period {
            Some(period) => format!("{} when:{}", query.trim(), period),
            None => query.trim().to_string(),
        };
        let url = format!(
            "{}?q={}&hl={}&gl={}&ceid={}:{}",
            self.endpoint,
            urlencoding::encode(&q),
            urlencoding::encode(&self.lang),
            urlencoding::encode(&self.region),
            urlencoding::encode(&self.region),
            urlencoding::encode(&self.lang),
        );
        Ok(Url::parse(&url)?)
    }

    /// Run a search, replacing any previous results.
    #[instrument(level = "info", skip(self), fields(lang = %self.lang, region = %self.region))]
    pub async fn search(&mut self, query: &str) -> Result<&[SearchHit], SearchError> {
        let url = self.search_url(query)?;
        debug!(%url, "Requesting Google News feed");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Google News search failed");
            return Err(SearchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let mut hits = parse_feed(&body)?;
        if let Some(max) = self.max_results {
            hits.truncate(max);
        }

        info!(count = hits.len(), query, "Google News search complete");
        for hit in &hits {
            debug!(
                title = %hit.title,
                source = ?hit.source,
                published = ?hit.published,
                link = %hit.link,
                "Search hit"
            );
        }

        self.results = hits;
        Ok(&self.results)
    }

    /// Number of hits from the last search.
    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    /// Links from the last search, first occurrence order, duplicates removed.
    pub fn links(&self) -> Vec<String> {
        self.results
            .iter()
            .map(|hit| hit.link.clone())
            .unique()
            .collect()
    }
}
