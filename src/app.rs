use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::handlers::{bookmarks, system};
use crate::middleware::{bearer_auth_middleware, AuthGate};
use crate::resource::BookmarkResource;
use crate::store::BookmarkStore;

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub bookmarks: BookmarkResource,
    pub auth: AuthGate,
}

impl AppState {
    pub fn new(store: Arc<dyn BookmarkStore>, api_token: &str) -> Self {
        Self {
            bookmarks: BookmarkResource::new(store),
            auth: AuthGate::new(api_token),
        }
    }
}

/// Build the full application router. Every route sits behind the bearer
/// token check.
pub fn app(config: &AppConfig, store: Arc<dyn BookmarkStore>) -> Router {
    let state = AppState::new(store, &config.security.api_token);

    let mut router = Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .merge(bookmark_routes())
        .layer(middleware::from_fn_with_state(state.auth.clone(), bearer_auth_middleware))
        .layer(DefaultBodyLimit::max(config.server.max_request_size_bytes))
        .with_state(state);

    if config.server.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    // Outermost so preflight requests are answered without credentials
    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }

    router
}

fn bookmark_routes() -> Router<AppState> {
    Router::new()
        .route(bookmarks::COLLECTION_PATH, get(bookmarks::list).post(bookmarks::create))
        .route(
            "/api/bookmarks/:id",
            get(bookmarks::get)
                .delete(bookmarks::delete)
                .patch(bookmarks::patch),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
