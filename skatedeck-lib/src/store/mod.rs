//! Record store backends.

mod seed;
mod sqlite;

pub use seed::sample;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::Skater;
use crate::query::Page;
use crate::query::RecordQuery;

/// Storage backend for skater records.
///
/// The browsing views only read and bulk-delete; inserts exist for seeding
/// and tests.
#[async_trait]
pub trait SkaterStore: Send + Sync {
    /// Fetches one page of records matching the query, together with the
    /// total matching count.
    ///
    /// An offset past the last matching record yields an empty page, not an
    /// error.
    async fn list(&self, query: &RecordQuery) -> Result<Page, StoreError>;

    /// Fetches every record, unfiltered and unpaginated.
    async fn fetch_all(&self) -> Result<Vec<Skater>, StoreError>;

    /// Inserts a record.
    async fn insert(&self, skater: &Skater) -> Result<(), StoreError>;

    /// Deletes the records with the given ids, returning how many were
    /// removed. Ids with no matching record are ignored.
    async fn delete_many(&self, ids: &[Uuid]) -> Result<usize, StoreError>;

    /// Returns the total number of records in the store.
    async fn count(&self) -> Result<usize, StoreError>;
}
