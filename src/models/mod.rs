pub mod bookmark;

pub use bookmark::{Bookmark, BookmarkId, BookmarkPayload, BookmarkUpdate, BookmarkView, NewBookmark};
