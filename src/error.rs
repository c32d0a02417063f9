//! Error types for each stage of an ingestion run.
//!
//! Per-URL failures are split the same way the pipeline reports them:
//! [`ArticleError`] for download/parse problems, [`StoreError::DuplicateKey`]
//! for unique-index conflicts, and everything else. Setup failures
//! ([`ConfigError`], [`SearchError`], store connection errors) end the run.

use thiserror::Error;

/// Failure to download or parse a single article page.
#[derive(Error, Debug)]
pub enum ArticleError {
    #[error("request to {url} failed: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("download of {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("{url} is not an HTML page (content-type: {content_type})")]
    NotHtml { url: String, content_type: String },

    #[error("no article body found at {url}")]
    NoBody { url: String },
}

/// Failure to query the news-search provider.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("invalid search endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search provider returned status {status}")]
    Status { status: u16 },

    #[error("malformed search feed: {0}")]
    Feed(#[from] quick_xml::de::DeError),
}

/// Failure reported by an article store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate key: an article with url {url} already exists")]
    DuplicateKey { url: String },

    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Failure to assemble the run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("MONGO_URL is not set (pass --mongo-url, export MONGO_URL, or add it to .env)")]
    MissingMongoUrl,
}

/// Outcome of processing one URL, other than success.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Article(#[from] ArticleError),

    #[error("article already exists: {url}")]
    Duplicate { url: String },

    #[error(transparent)]
    Store(StoreError),

    #[error("processing panicked: {0}")]
    Panicked(String),
}

impl From<StoreError> for IngestError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateKey { url } => IngestError::Duplicate { url },
            other => IngestError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_maps_to_duplicate() {
        let err: IngestError = StoreError::DuplicateKey {
            url: "https://example.com/a".to_string(),
        }
        .into();
        assert!(matches!(err, IngestError::Duplicate { ref url } if url == "https://example.com/a"));
    }

    #[test]
    fn test_backend_error_stays_store() {
        let err: IngestError = StoreError::Backend("connection reset".to_string()).into();
        assert!(matches!(err, IngestError::Store(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_article_error_display() {
        let err = ArticleError::Status {
            url: "https://example.com/missing".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "download of https://example.com/missing failed with status 404"
        );
    }
}
