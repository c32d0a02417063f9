//! Article storage backends.
//!
//! The pipeline only talks to [`ArticleStore`]. Uniqueness of `url` is the
//! backend's job: callers never check for an existing record before
//! inserting, they rely on [`StoreError::DuplicateKey`] instead.
//!
//! # Backends
//!
//! - [`MongoStore`]: MongoDB collection with a unique index on `url`
//! - [`MemoryStore`]: in-process collection with the same semantics, used
//!   for dry runs

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use crate::error::StoreError;
use crate::models::ArticleRecord;

/// A collection of [`ArticleRecord`]s keyed by url.
#[allow(async_fn_in_trait)]
pub trait ArticleStore {
    /// Create the unique index on `url` if it does not exist yet.
    async fn ensure_url_index(&self) -> Result<(), StoreError>;

    /// Insert one record.
    ///
    /// Once the url index exists, a second record with the same url is
    /// rejected with [`StoreError::DuplicateKey`].
    async fn insert(&self, record: &ArticleRecord) -> Result<(), StoreError>;

    /// Number of records in the collection.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}
