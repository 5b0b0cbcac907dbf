use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::{BookmarkId, BookmarkPayload, BookmarkView};
use crate::store::{BookmarkStore, StoreError};
use crate::validation::{validate_create, validate_update, ValidationError};

/// Outcome of a failed bookmark operation
#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Bookmark with id {0} not found")]
    NotFound(BookmarkId),

    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}

pub type BookmarkResult<T> = Result<T, BookmarkError>;

/// Bookmark workflows: validate input, call the store, sanitize output.
///
/// Holds no records of its own; every call goes to the store.
#[derive(Clone)]
pub struct BookmarkResource {
    store: Arc<dyn BookmarkStore>,
}

impl BookmarkResource {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn BookmarkStore> {
        &self.store
    }

    pub async fn list_all(&self) -> BookmarkResult<Vec<BookmarkView>> {
        let bookmarks = self.store.all().await.map_err(store_failure)?;
        Ok(bookmarks.into_iter().map(BookmarkView::from).collect())
    }

    pub async fn get_by_id(&self, id: BookmarkId) -> BookmarkResult<BookmarkView> {
        match self.store.get(id).await.map_err(store_failure)? {
            Some(bookmark) => Ok(bookmark.into()),
            None => Err(not_found(id)),
        }
    }

    pub async fn create(&self, payload: BookmarkPayload) -> BookmarkResult<BookmarkView> {
        let bookmark = validate_create(payload).map_err(rejected)?;
        let stored = self.store.insert(bookmark).await.map_err(store_failure)?;
        info!("Bookmark with id {} created", stored.id);
        Ok(stored.into())
    }

    pub async fn delete_by_id(&self, id: BookmarkId) -> BookmarkResult<()> {
        if !self.store.delete(id).await.map_err(store_failure)? {
            return Err(not_found(id));
        }
        info!("Bookmark with id {} deleted", id);
        Ok(())
    }

    /// `NotFound` unless a bookmark with this id is stored
    pub async fn ensure_exists(&self, id: BookmarkId) -> BookmarkResult<()> {
        match self.store.get(id).await.map_err(store_failure)? {
            Some(_) => Ok(()),
            None => Err(not_found(id)),
        }
    }

    /// Existence is checked before the payload is validated, so an unknown
    /// id is always a 404 whatever the body holds.
    pub async fn update_by_id(&self, id: BookmarkId, payload: BookmarkPayload) -> BookmarkResult<()> {
        self.ensure_exists(id).await?;

        let changes = validate_update(payload).map_err(rejected)?;

        // The record may have been deleted since the lookup
        if !self.store.update(id, &changes).await.map_err(store_failure)? {
            return Err(not_found(id));
        }
        info!("Bookmark with id {} updated", id);
        Ok(())
    }
}

fn rejected(err: ValidationError) -> BookmarkError {
    warn!("{}", err);
    err.into()
}

fn not_found(id: BookmarkId) -> BookmarkError {
    warn!("Bookmark with id {} not found", id);
    BookmarkError::NotFound(id)
}

fn store_failure(err: StoreError) -> BookmarkError {
    error!("Bookmark store error: {}", err);
    err.into()
}
