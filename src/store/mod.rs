pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Bookmark, BookmarkId, BookmarkUpdate, NewBookmark};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Failures raised by a store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Durable collection of bookmarks.
///
/// Each method is a single logical store operation; the caller never holds
/// records across requests.
#[async_trait]
pub trait BookmarkStore: Send + Sync + 'static {
    /// All bookmarks ordered by id
    async fn all(&self) -> Result<Vec<Bookmark>, StoreError>;

    /// Returns `None` if no bookmark has this id.
    async fn get(&self, id: BookmarkId) -> Result<Option<Bookmark>, StoreError>;

    /// Assigns a fresh id and stores the bookmark.
    async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark, StoreError>;

    /// Returns `true` if the bookmark existed and was removed.
    async fn delete(&self, id: BookmarkId) -> Result<bool, StoreError>;

    /// Applies the supplied fields. Returns `true` if the bookmark existed.
    async fn update(&self, id: BookmarkId, changes: &BookmarkUpdate) -> Result<bool, StoreError>;

    /// Short name used in logs and health output
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
