use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::models::{BookmarkId, BookmarkPayload, BookmarkView};

pub const COLLECTION_PATH: &str = "/api/bookmarks";

/// GET /api/bookmarks - List every bookmark
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<BookmarkView>>, ApiError> {
    Ok(Json(state.bookmarks.list_all().await?))
}

/// POST /api/bookmarks - Create a bookmark; responds 201 with a Location header
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<BookmarkPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let bookmark = state.bookmarks.create(payload).await?;
    let location = format!("{}/{}", COLLECTION_PATH, bookmark.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(bookmark)).into_response())
}

/// GET /api/bookmarks/:id - Show a single bookmark
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookmarkView>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.bookmarks.get_by_id(id).await?))
}

/// DELETE /api/bookmarks/:id - Remove a bookmark
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.bookmarks.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/bookmarks/:id - Update any subset of a bookmark's fields
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BookmarkPayload>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            // An unknown id is a 404 even when the body is unusable
            state.bookmarks.ensure_exists(id).await?;
            return Err(rejection.into());
        }
    };
    state.bookmarks.update_by_id(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ids are store-assigned integers written as plain decimal digits with no
/// sign or leading zero, so each bookmark has exactly one path.
fn parse_id(raw: &str) -> Result<BookmarkId, ApiError> {
    let canonical = !raw.is_empty()
        && raw.bytes().all(|b| b.is_ascii_digit())
        && (raw == "0" || !raw.starts_with('0'));

    canonical.then(|| raw.parse().ok()).flatten().ok_or_else(|| {
        tracing::warn!("Bookmark with id {} not found", raw);
        ApiError::not_found()
    })
}
