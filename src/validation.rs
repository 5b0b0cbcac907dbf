use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::models::{BookmarkPayload, BookmarkUpdate, NewBookmark};

pub const MIN_RATING: i32 = 0;
pub const MAX_RATING: i32 = 5;

/// Reasons a create or update payload is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("'{0}' is required")]
    MissingField(&'static str),

    #[error("Invalid rating '{0}' supplied, must be an integer between 0 and 5")]
    InvalidRating(String),

    #[error("Invalid url '{0}' supplied")]
    InvalidUrl(String),

    #[error("Request body must contain either 'title', 'url', 'rating' or 'description'")]
    EmptyUpdate,
}

/// Validate a create payload and normalize it into a storable record.
///
/// Presence of `title`, `url` and `rating` is checked first (in that order),
/// then the rating range, then the URL.
pub fn validate_create(payload: BookmarkPayload) -> Result<NewBookmark, ValidationError> {
    let title = required_text(payload.title, "title")?;
    let url = required_text(payload.url, "url")?;
    let raw_rating = payload
        .rating
        .filter(|v| !v.is_null())
        .ok_or(ValidationError::MissingField("rating"))?;

    let rating = parse_rating(&raw_rating)?;

    if !is_web_uri(&url) {
        return Err(ValidationError::InvalidUrl(url));
    }

    Ok(NewBookmark {
        title,
        url,
        rating,
        description: payload.description.unwrap_or_default(),
    })
}

/// Validate a partial update. Only supplied fields come back; nothing is
/// defaulted. An empty `title` or `url` counts as not supplied, while an
/// empty `description` is a real value (it clears the description).
pub fn validate_update(payload: BookmarkPayload) -> Result<BookmarkUpdate, ValidationError> {
    let raw_rating = payload.rating.filter(|v| !v.is_null());
    let mut update = BookmarkUpdate {
        title: payload.title.filter(|t| !t.is_empty()),
        url: payload.url.filter(|u| !u.is_empty()),
        rating: None,
        description: payload.description,
    };

    if update.is_empty() && raw_rating.is_none() {
        return Err(ValidationError::EmptyUpdate);
    }

    if let Some(url) = &update.url {
        if !is_web_uri(url) {
            return Err(ValidationError::InvalidUrl(url.clone()));
        }
    }

    update.rating = raw_rating.as_ref().map(parse_rating).transpose()?;
    Ok(update)
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

/// Coerce a JSON number, or a string holding one, into an in-range integer.
/// `4.0` is accepted as 4; `4.5`, `-1` and `6` are not.
pub fn parse_rating(raw: &Value) -> Result<i32, ValidationError> {
    let invalid = || ValidationError::InvalidRating(display_value(raw));

    let number = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(invalid)?;

    let range = f64::from(MIN_RATING)..=f64::from(MAX_RATING);
    if number.fract() != 0.0 || !range.contains(&number) {
        return Err(invalid());
    }

    Ok(number as i32)
}

fn display_value(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Absolute `http`/`https` URI with a non-empty authority
pub fn is_web_uri(candidate: &str) -> bool {
    if candidate.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    // The url crate repairs `http:/host` and `http:host`; require the authority marker verbatim
    let Some((scheme, rest)) = candidate.split_once("://") else {
        return false;
    };
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return false;
    }
    if rest.is_empty() || rest.starts_with('/') {
        return false;
    }

    match Url::parse(candidate) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}
