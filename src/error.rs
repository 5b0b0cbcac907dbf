// HTTP API Error Types
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::resource::BookmarkError;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized request.";
pub const NOT_FOUND_MESSAGE: &str = "Bookmark not found";
const SERVER_ERROR_MESSAGE: &str = "server error";

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized,

    // 404 Not Found
    NotFound(String),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 500 Internal Server Error
    InternalServerError,
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized => UNAUTHORIZED_MESSAGE,
            ApiError::NotFound(msg) => msg,
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::InternalServerError => SERVER_ERROR_MESSAGE,
        }
    }

    /// Convert to JSON response body.
    ///
    /// 401 keeps the flat `{"error": "..."}` shape; everything else is
    /// `{"error": {"message": "..."}}`.
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Unauthorized => json!({ "error": UNAUTHORIZED_MESSAGE }),
            _ => json!({ "error": { "message": self.message() } }),
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found() -> Self {
        ApiError::NotFound(NOT_FOUND_MESSAGE.to_string())
    }
}

impl From<BookmarkError> for ApiError {
    fn from(err: BookmarkError) -> Self {
        match err {
            BookmarkError::Validation(e) => ApiError::bad_request(e.to_string()),
            BookmarkError::NotFound(_) => ApiError::not_found(),
            // Already logged by the resource layer; never leak store internals
            BookmarkError::Store(_) => ApiError::InternalServerError,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge("Request body too large".to_string());
        }
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use crate::validation::ValidationError;

    #[test]
    fn unauthorized_uses_flat_shape() {
        let err = ApiError::Unauthorized;
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_json(), json!({ "error": "Unauthorized request." }));
    }

    #[test]
    fn not_found_message() {
        let err: ApiError = BookmarkError::NotFound(4444).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_json(), json!({ "error": { "message": "Bookmark not found" } }));
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let cases = [
            ValidationError::MissingField("title"),
            ValidationError::InvalidRating("44".to_string()),
            ValidationError::InvalidUrl("nope".to_string()),
            ValidationError::EmptyUpdate,
        ];
        for case in cases {
            let message = case.to_string();
            let err: ApiError = BookmarkError::Validation(case).into();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(err.to_json()["error"]["message"], json!(message));
        }
    }

    #[test]
    fn store_failures_are_generic() {
        let err: ApiError = BookmarkError::Store(StoreError::Unavailable("password=hunter2".to_string())).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_json(), json!({ "error": { "message": "server error" } }));
    }
}
