use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::sanitize::sanitize;

/// Store-assigned bookmark identifier
pub type BookmarkId = i64;

/// A bookmark as held by the store (unsanitized, exactly as submitted)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub title: String,
    pub url: String,
    pub rating: i32,
    pub description: String,
}

/// Validated fields for a bookmark that does not exist yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub rating: i32,
    pub description: String,
}

impl NewBookmark {
    pub fn with_id(self, id: BookmarkId) -> Bookmark {
        Bookmark {
            id,
            title: self.title,
            url: self.url,
            rating: self.rating,
            description: self.description,
        }
    }
}

/// Validated partial update. `None` means "leave the stored value alone".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkUpdate {
    pub title: Option<String>,
    pub url: Option<String>,
    pub rating: Option<i32>,
    pub description: Option<String>,
}

impl BookmarkUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.url.is_none() && self.rating.is_none() && self.description.is_none()
    }

    /// Merge the supplied fields into an existing record
    pub fn apply_to(&self, bookmark: &mut Bookmark) {
        if let Some(title) = &self.title {
            bookmark.title = title.clone();
        }
        if let Some(url) = &self.url {
            bookmark.url = url.clone();
        }
        if let Some(rating) = self.rating {
            bookmark.rating = rating;
        }
        if let Some(description) = &self.description {
            bookmark.description = description.clone();
        }
    }
}

/// Raw create/update body as received from a client.
///
/// `null` and a missing key both deserialize to `None`. `rating` stays a raw
/// JSON value so the validator can coerce it and report the original input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookmarkPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Client-facing representation with markup neutralized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkView {
    pub id: BookmarkId,
    pub title: String,
    pub url: String,
    pub description: String,
    pub rating: i32,
}

impl From<Bookmark> for BookmarkView {
    fn from(bookmark: Bookmark) -> Self {
        Self {
            id: bookmark.id,
            title: sanitize(&bookmark.title),
            url: bookmark.url,
            description: sanitize(&bookmark.description),
            rating: bookmark.rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored() -> Bookmark {
        Bookmark {
            id: 7,
            title: "Rust".to_string(),
            url: "https://www.rust-lang.org".to_string(),
            rating: 4,
            description: "Systems language".to_string(),
        }
    }

    #[test]
    fn update_only_touches_supplied_fields() {
        let mut bookmark = stored();
        let update = BookmarkUpdate {
            rating: Some(0),
            ..Default::default()
        };
        update.apply_to(&mut bookmark);

        assert_eq!(bookmark.rating, 0);
        assert_eq!(bookmark.title, "Rust");
        assert_eq!(bookmark.description, "Systems language");
        assert_eq!(bookmark.id, 7);
    }

    #[test]
    fn update_is_empty_until_a_field_is_set() {
        assert!(BookmarkUpdate::default().is_empty());
        let update = BookmarkUpdate {
            description: Some(String::new()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn payload_treats_null_as_absent() {
        let payload: BookmarkPayload =
            serde_json::from_value(json!({ "title": null, "rating": 0 })).unwrap();
        assert!(payload.title.is_none());
        assert!(payload.url.is_none());
        assert_eq!(payload.rating, Some(json!(0)));
    }

    #[test]
    fn view_serializes_rating_as_number() {
        let view = BookmarkView::from(stored());
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["rating"], json!(4));
        assert_eq!(value["id"], json!(7));
    }

    #[test]
    fn view_escapes_title_and_description_only() {
        let mut bookmark = stored();
        bookmark.title = "<b>bold</b>".to_string();
        bookmark.description = "a & b".to_string();
        bookmark.url = "https://example.com/?a=1&b=2".to_string();

        let view = BookmarkView::from(bookmark);
        assert_eq!(view.title, "&lt;b&gt;bold&lt;/b&gt;");
        assert_eq!(view.description, "a &amp; b");
        assert_eq!(view.url, "https://example.com/?a=1&b=2");
    }
}
