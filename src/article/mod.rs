//! Download, parse and analyse a single news article.
//!
//! Processing is split into three steps whose types enforce their order:
//!
//! 1. [`download`] fetches the page and yields a [`DownloadedPage`]
//! 2. [`DownloadedPage::parse`] extracts title and body into a [`ParsedArticle`]
//! 3. [`ParsedArticle::nlp`] computes summary and keywords and produces the
//!    [`ArticleRecord`] that gets stored
//!
//! Any failure in steps 1 and 2 is an [`ArticleError`]; step 3 cannot fail.

pub mod extract;
pub mod nlp;
pub mod stopwords;

use crate::error::ArticleError;
use crate::models::ArticleRecord;
use itertools::Itertools;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use scraper::Html;
use stopwords::StopWords;
use tracing::{debug, instrument};

/// Longest title synthesised from the first sentence when a page has none.
const FALLBACK_TITLE_CHARS: usize = 120;

/// Raw HTML of a fetched article page.
#[derive(Debug, Clone)]
pub struct DownloadedPage {
    url: String,
    final_url: String,
    html: String,
}

/// Fetch `url`, following redirects.
///
/// # Arguments
///
/// * `client` - Shared HTTP client carrying timeout and user agent
/// * `url` - Link returned by the search
///
/// # Returns
///
/// The page body along with the requested and final URLs.
///
/// # Errors
///
/// Fails on transport errors and non-2xx statuses, and on responses that
/// declare a non-HTML content type. A missing content type is accepted.
#[instrument(level = "debug", skip(client))]
pub async fn download(client: &Client, url: &str) -> Result<DownloadedPage, ArticleError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ArticleError::Download {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ArticleError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    if let Some(content_type) = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        if !content_type.to_ascii_lowercase().contains("html") {
            return Err(ArticleError::NotHtml {
                url: url.to_string(),
                content_type: content_type.to_string(),
            });
        }
    }

    let final_url = response.url().to_string();
    let html = response
        .text()
        .await
        .map_err(|source| ArticleError::Download {
            url: url.to_string(),
            source,
        })?;

    debug!(bytes = html.len(), %final_url, "Downloaded article page");
    Ok(DownloadedPage {
        url: url.to_string(),
        final_url,
        html,
    })
}

impl DownloadedPage {
    #[cfg(test)]
    pub fn from_html(url: &str, html: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            final_url: url.to_string(),
            html: html.into(),
        }
    }

    /// The URL that was requested.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The URL the content was served from after redirects.
    pub fn final_url(&self) -> &str {
        &self.final_url
    }

    /// Extract title and body text.
    ///
    /// Fails with [`ArticleError::NoBody`] when no article text is found.
    /// A page with text but no title gets one built from its first sentence.
    #[instrument(level = "debug", skip(self), fields(url = %self.url))]
    pub fn parse(&self, lang: &str) -> Result<ParsedArticle, ArticleError> {
        let stopwords = StopWords::for_language(lang);
        let document = Html::parse_document(&self.html);

        let text = extract::extract_text(&document, stopwords).ok_or_else(|| {
            ArticleError::NoBody {
                url: self.url.clone(),
            }
        })?;

        let title = extract::extract_title(&document).unwrap_or_else(|| {
            let first = nlp::split_sentences(&text)
                .into_iter()
                .next()
                .unwrap_or_default();
            debug!("No title found; using first sentence");
            first.chars().take(FALLBACK_TITLE_CHARS).collect()
        });

        debug!(
            %title,
            text_chars = text.chars().count(),
            stopwords = stopwords.lang(),
            "Parsed article"
        );
        Ok(ParsedArticle {
            url: self.url.clone(),
            title,
            text,
            stopwords,
        })
    }
}

/// Title and body of an article, ready for keyword and summary extraction.
#[derive(Debug, Clone)]
pub struct ParsedArticle {
    url: String,
    title: String,
    text: String,
    stopwords: &'static StopWords,
}

impl ParsedArticle {
    /// Compute keywords and summary and build the record to store.
    ///
    /// Keywords are the title's top terms followed by the text's, without
    /// repeats, capped at [`nlp::MAX_KEYWORDS`]. The summary is the top
    /// [`nlp::SUMMARY_SENTENCES`] sentences, one per line.
    pub fn nlp(self) -> ArticleRecord {
        let title_keywords = nlp::keywords(&self.title, self.stopwords, nlp::KEYWORDS_PER_SOURCE);
        let text_keywords = nlp::keywords(&self.text, self.stopwords, nlp::KEYWORDS_PER_SOURCE);
        let keywords = title_keywords
            .into_iter()
            .chain(text_keywords)
            .map(|(word, _)| word)
            .unique()
            .take(nlp::MAX_KEYWORDS)
            .collect();

        let summary =
            nlp::summarize(&self.title, &self.text, self.stopwords, nlp::SUMMARY_SENTENCES)
                .join("\n");

        ArticleRecord {
            title: self.title,
            text: self.text,
            summary,
            keywords,
            url: self.url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><title>Open models close the gap | Sample News</title>
<meta property="og:title" content="Open models close the gap"></head>
<body><main><article>
<p>Open models have closed most of the gap with closed systems, according to a study that was published this week.</p>
<p>The study compared the open models with the best commercial systems on a set of reasoning tasks.</p>
<p>Researchers said the open models were behind on only two of the tasks, and that the gap is likely to close.</p>
</article></main></body></html>"#;

    #[tokio::test]
    async fn test_download_success_keeps_requested_url() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/story")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(PAGE)
            .create_async()
            .await;

        let url = format!("{}/story", server.url());
        let page = download(&Client::new(), &url).await.unwrap();
        assert_eq!(page.url(), url);
        assert_eq!(page.final_url(), url);
    }

    #[tokio::test]
    async fn test_download_follows_redirect() {
        let mut server = mockito::Server::new_async().await;
        let target = format!("{}/final", server.url());
        server
            .mock("GET", "/short")
            .with_status(301)
            .with_header("location", &target)
            .create_async()
            .await;
        server
            .mock("GET", "/final")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(PAGE)
            .create_async()
            .await;

        let url = format!("{}/short", server.url());
        let page = download(&Client::new(), &url).await.unwrap();
        assert_eq!(page.url(), url);
        assert_eq!(page.final_url(), target);
    }

    #[tokio::test]
    async fn test_download_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/gone")
            .with_status(404)
            .with_body("Not found")
            .create_async()
            .await;

        let url = format!("{}/gone", server.url());
        let err = download(&Client::new(), &url).await.unwrap_err();
        assert!(matches!(err, ArticleError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_download_rejects_non_html() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/paper.pdf")
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body("%PDF-1.7")
            .create_async()
            .await;

        let url = format!("{}/paper.pdf", server.url());
        let err = download(&Client::new(), &url).await.unwrap_err();
        assert!(matches!(err, ArticleError::NotHtml { .. }));
    }

    #[test]
    fn test_parse_and_nlp_produce_complete_record() {
        let page = DownloadedPage::from_html("https://news.example.com/open-models", PAGE);
        let record = page.parse("en").unwrap().nlp();

        assert_eq!(record.url, "https://news.example.com/open-models");
        assert_eq!(record.title, "Open models close the gap");
        assert!(record.text.starts_with("Open models have closed"));
        assert!(!record.summary.is_empty());
        assert!(record.summary.lines().count() <= nlp::SUMMARY_SENTENCES);
        assert!(record.keywords.contains(&"models".to_string()));
        assert!(record.keywords.contains(&"open".to_string()));
    }

    #[test]
    fn test_keywords_are_unique() {
        let page = DownloadedPage::from_html("https://news.example.com/open-models", PAGE);
        let record = page.parse("en").unwrap().nlp();
        let unique: std::collections::HashSet<_> = record.keywords.iter().collect();
        assert_eq!(unique.len(), record.keywords.len());
        assert!(record.keywords.len() <= nlp::MAX_KEYWORDS);
    }

    #[test]
    fn test_parse_without_body_fails() {
        let page = DownloadedPage::from_html(
            "https://news.example.com/paywall",
            "<html><head><title>Subscribe | Sample</title></head><body><p>Subscribe</p></body></html>",
        );
        let err = page.parse("en").unwrap_err();
        assert!(matches!(err, ArticleError::NoBody { ref url } if url == "https://news.example.com/paywall"));
    }

    #[test]
    fn test_parse_without_title_uses_first_sentence() {
        let page = DownloadedPage::from_html(
            "https://news.example.com/untitled",
            "<html><body><div><p>The first sentence is here. The second one is over there.</p></div></body></html>",
        );
        let record = page.parse("en").unwrap().nlp();
        assert_eq!(record.title, "The first sentence is here.");
    }
}
