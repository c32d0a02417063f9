//! In-process article store.
//!
//! Behaves like a MongoDB collection for everything the pipeline relies on:
//! inserts are accepted freely until the url index is ensured, after which
//! a repeated url is rejected with [`StoreError::DuplicateKey`]. Building
//! the index over records that already collide fails, as it does on the
//! server.

use super::ArticleStore;
use crate::error::StoreError;
use crate::models::ArticleRecord;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct MemoryCollection {
    records: Vec<ArticleRecord>,
    url_index: Option<HashSet<String>>,
}

#[derive(Debug, Clone)]
pub struct MemoryStore {
    name: String,
    inner: Arc<RwLock<MemoryCollection>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inner: Arc::new(RwLock::new(MemoryCollection::default())),
        }
    }

    /// Snapshot of every stored record, in insertion order.
    pub async fn records(&self) -> Vec<ArticleRecord> {
        self.inner.read().await.records.clone()
    }
}

impl ArticleStore for MemoryStore {
    async fn ensure_url_index(&self) -> Result<(), StoreError> {
        let mut collection = self.inner.write().await;
        if collection.url_index.is_some() {
            return Ok(());
        }

        let mut urls = HashSet::with_capacity(collection.records.len());
        for record in &collection.records {
            if !urls.insert(record.url.clone()) {
                return Err(StoreError::Backend(format!(
                    "cannot build unique url index: duplicate url {}",
                    record.url
                )));
            }
        }
        debug!(store = %self.name, entries = urls.len(), "Built url index");
        collection.url_index = Some(urls);
        Ok(())
    }

    async fn insert(&self, record: &ArticleRecord) -> Result<(), StoreError> {
        let mut collection = self.inner.write().await;
        if let Some(index) = collection.url_index.as_mut() {
            if !index.insert(record.url.clone()) {
                return Err(StoreError::DuplicateKey {
                    url: record.url.clone(),
                });
            }
        }
        collection.records.push(record.clone());
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.inner.read().await.records.len() as u64)
    }

    fn describe(&self) -> String {
        format!("memory://{}", self.name)
    }
}
