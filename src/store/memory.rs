use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookmarkStore, StoreError};
use crate::models::{Bookmark, BookmarkId, BookmarkUpdate, NewBookmark};

#[derive(Debug, Default)]
struct Inner {
    bookmarks: BTreeMap<BookmarkId, Bookmark>,
    last_id: BookmarkId,
}

/// Process-local store. Ids increase monotonically and are never handed out
/// twice, even after a delete.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store; new ids continue after the highest seeded id
    pub fn with_bookmarks(bookmarks: impl IntoIterator<Item = Bookmark>) -> Self {
        let mut inner = Inner::default();
        for bookmark in bookmarks {
            inner.last_id = inner.last_id.max(bookmark.id);
            inner.bookmarks.insert(bookmark.id, bookmark);
        }
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.bookmarks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BookmarkStore for MemoryStore {
    async fn all(&self) -> Result<Vec<Bookmark>, StoreError> {
        Ok(self.inner.read().await.bookmarks.values().cloned().collect())
    }

    async fn get(&self, id: BookmarkId) -> Result<Option<Bookmark>, StoreError> {
        Ok(self.inner.read().await.bookmarks.get(&id).cloned())
    }

    async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let stored = bookmark.with_id(inner.last_id);
        inner.bookmarks.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: BookmarkId) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.bookmarks.remove(&id).is_some())
    }

    async fn update(&self, id: BookmarkId, changes: &BookmarkUpdate) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.bookmarks.get_mut(&id) {
            Some(bookmark) => {
                changes.apply_to(bookmark);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
