use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app::AppState;

/// GET / - Liveness greeting
pub async fn root() -> &'static str {
    "Hello, World!"
}

/// GET /health - Reports whether the bookmark store answers
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.bookmarks.store();

    match store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "store": store.backend(),
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(e) => {
            tracing::error!("Store health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "store": store.backend(),
                    "version": env!("CARGO_PKG_VERSION"),
                })),
            )
        }
    }
}
