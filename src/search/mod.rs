//! News search providers.
//!
//! A provider turns a query into a list of [`SearchHit`](crate::models::SearchHit)s
//! whose links feed the ingestion pipeline. Only one provider exists today:
//!
//! | Provider | Module | Method | Notes |
//! |----------|--------|--------|-------|
//! | Google News | [`google_news`] | RSS search endpoint | Language, region and period filters |
//!
//! Providers are configured once, searched once per run, and then queried
//! for `total_count()` and `links()`.

pub mod google_news;

pub use google_news::GoogleNews;
