//! MongoDB article store.
//!
//! Records go to `<database>.<collection>` (by default `news_db.articles`).
//! The unique ascending index on `url` is what rejects duplicates; the
//! server reports those as write error code 11000.

use super::ArticleStore;
use crate::error::StoreError;
use crate::models::ArticleRecord;
use mongodb::bson::{Document, doc};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use tracing::{debug, info, instrument};

/// Server error code for a unique index violation.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Clone)]
pub struct MongoStore {
    collection: Collection<ArticleRecord>,
}

impl MongoStore {
    /// Connect and verify the server is reachable.
    ///
    /// The driver connects lazily, so a `ping` is sent to surface bad
    /// connection strings or unreachable servers here rather than on the
    /// first insert.
    #[instrument(level = "info", skip(uri))]
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }).await?;
        info!("Connected to MongoDB");

        Ok(Self {
            collection: db.collection::<ArticleRecord>(collection),
        })
    }

    /// Index specification for the url uniqueness constraint.
    pub fn url_index() -> IndexModel {
        IndexModel::builder()
            .keys(url_index_keys())
            .options(IndexOptions::builder().unique(true).build())
            .build()
    }
}

fn url_index_keys() -> Document {
    doc! { "url": 1 }
}

/// Whether a driver error is a unique index violation.
///
/// `insert_one` reports the violation as a write error; server commands
/// such as `createIndexes` over colliding documents report it as a command
/// error. Client-side failures carry no server code and never match.
pub fn is_duplicate_key(e: &MongoError) -> bool {
    is_duplicate_code(server_code(&e.kind))
}

/// Server error code of a write or command failure.
fn server_code(kind: &ErrorKind) -> Option<i32> {
    match kind {
        ErrorKind::Write(WriteFailure::WriteError(we)) => Some(we.code),
        ErrorKind::Command(ce) => Some(ce.code),
        _ => None,
    }
}

fn is_duplicate_code(code: Option<i32>) -> bool {
    code == Some(DUPLICATE_KEY_CODE)
}

impl ArticleStore for MongoStore {
    #[instrument(level = "info", skip(self), fields(collection = %self.describe()))]
    async fn ensure_url_index(&self) -> Result<(), StoreError> {
        let created = self.collection.create_index(Self::url_index()).await?;
        info!(index = %created.index_name, "Unique url index in place");
        Ok(())
    }

    async fn insert(&self, record: &ArticleRecord) -> Result<(), StoreError> {
        match self.collection.insert_one(record).await {
            Ok(result) => {
                debug!(url = %record.url, id = %result.inserted_id, "Inserted article");
                Ok(())
            }
            Err(e) if is_duplicate_key(&e) => Err(StoreError::DuplicateKey {
                url: record.url.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    fn describe(&self) -> String {
        self.collection.namespace().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    #[test]
    fn test_url_index_is_unique_ascending() {
        let index = MongoStore::url_index();
        assert_eq!(index.keys, doc! { "url": 1 });
        let options = index.options.expect("index options");
        assert_eq!(options.unique, Some(true));
    }

    #[test]
    fn test_duplicate_code_matching() {
        assert!(is_duplicate_code(Some(DUPLICATE_KEY_CODE)));
        assert!(!is_duplicate_code(Some(11001)));
        assert!(!is_duplicate_code(None));
    }

    #[tokio::test]
    async fn test_client_side_error_is_not_duplicate() {
        let err = Client::with_uri_str("not-a-mongodb-uri").await.unwrap_err();
        assert_eq!(server_code(&err.kind), None);
        assert!(!is_duplicate_key(&err));
    }

    fn record(url: &str) -> ArticleRecord {
        ArticleRecord {
            title: "Title".to_string(),
            text: "Text".to_string(),
            summary: "Summary".to_string(),
            keywords: vec!["one".to_string()],
            url: url.to_string(),
        }
    }

    /// Needs a reachable server: `MONGO_URL=... cargo test -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn test_live_second_insert_is_duplicate_key() {
        let uri = std::env::var("MONGO_URL").expect("MONGO_URL");
        let collection = format!("articles_{}", chrono::Utc::now().timestamp_millis());
        let store = MongoStore::connect(&uri, "news_ingest_test", &collection)
            .await
            .unwrap();
        store.ensure_url_index().await.unwrap();

        store.insert(&record("https://example.com/a")).await.unwrap();
        let err = store.insert(&record("https://example.com/a")).await.unwrap_err();
        let count = store.count().await.unwrap();
        store.collection.drop().await.unwrap();

        assert!(matches!(err, StoreError::DuplicateKey { ref url } if url == "https://example.com/a"));
        assert_eq!(count, 1);
    }

    #[test]
    fn test_record_maps_to_document() {
        let record = ArticleRecord {
            title: "Title".to_string(),
            text: "Text".to_string(),
            summary: "Summary".to_string(),
            keywords: vec!["one".to_string(), "two".to_string()],
            url: "https://example.com/a".to_string(),
        };
        let document = bson::to_document(&record).unwrap();

        assert_eq!(document.get_str("url").unwrap(), "https://example.com/a");
        assert_eq!(document.get_array("keywords").unwrap().len(), 2);
        assert!(!document.contains_key("_id"));
    }
}
