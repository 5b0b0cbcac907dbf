#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use bookmarks_api::config::AppConfig;
use bookmarks_api::models::{Bookmark, BookmarkId, BookmarkUpdate, BookmarkView, NewBookmark};
use bookmarks_api::store::{BookmarkStore, MemoryStore, StoreError};

pub const TEST_TOKEN: &str = "test-api-token";

// ---------------------------------------------------------------------------
// Fixtures

pub fn make_bookmarks_array() -> Vec<Bookmark> {
    vec![
        Bookmark {
            id: 1,
            title: "Thinkful".to_string(),
            url: "https://www.thinkful.com".to_string(),
            description: "Think outside the classroom".to_string(),
            rating: 5,
        },
        Bookmark {
            id: 2,
            title: "Google".to_string(),
            url: "https://www.google.com".to_string(),
            description: "Where we find everything else".to_string(),
            rating: 4,
        },
        Bookmark {
            id: 3,
            title: "MDN".to_string(),
            url: "https://developer.mozilla.org".to_string(),
            description: "The only place to find web documentation".to_string(),
            rating: 5,
        },
    ]
}

/// A bookmark carrying script payloads and what clients should see instead
pub fn make_malicious_bookmark() -> (Bookmark, BookmarkView) {
    let malicious = Bookmark {
        id: 911,
        title: r#"<script>alert("xss");</script>"#.to_string(),
        url: "https://yahoo.com".to_string(),
        description: r#"<img src="https://url.to.file.which/does-not.exist" onerror="alert(document.cookie);">"#
            .to_string(),
        rating: 5,
    };
    let expected = BookmarkView {
        id: 911,
        title: "&lt;script&gt;alert(&quot;xss&quot;);&lt;/script&gt;".to_string(),
        url: "https://yahoo.com".to_string(),
        description: "&lt;img src=&quot;https://url.to.file.which/does-not.exist&quot;&gt;".to_string(),
        rating: 5,
    };
    (malicious, expected)
}

// ---------------------------------------------------------------------------
// Stores

/// Memory store that counts every call it receives
#[derive(Clone, Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    calls: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn with_bookmarks(bookmarks: Vec<Bookmark>) -> Self {
        Self {
            inner: MemoryStore::with_bookmarks(bookmarks),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BookmarkStore for CountingStore {
    async fn all(&self) -> Result<Vec<Bookmark>, StoreError> {
        self.touch();
        self.inner.all().await
    }

    async fn get(&self, id: BookmarkId) -> Result<Option<Bookmark>, StoreError> {
        self.touch();
        self.inner.get(id).await
    }

    async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark, StoreError> {
        self.touch();
        self.inner.insert(bookmark).await
    }

    async fn delete(&self, id: BookmarkId) -> Result<bool, StoreError> {
        self.touch();
        self.inner.delete(id).await
    }

    async fn update(&self, id: BookmarkId, changes: &BookmarkUpdate) -> Result<bool, StoreError> {
        self.touch();
        self.inner.update(id, changes).await
    }

    fn backend(&self) -> &'static str {
        "counting"
    }
}

/// Store whose every operation fails, as if the database were down
pub struct FailingStore;

#[async_trait]
impl BookmarkStore for FailingStore {
    async fn all(&self) -> Result<Vec<Bookmark>, StoreError> {
        Err(down())
    }

    async fn get(&self, _id: BookmarkId) -> Result<Option<Bookmark>, StoreError> {
        Err(down())
    }

    async fn insert(&self, _bookmark: NewBookmark) -> Result<Bookmark, StoreError> {
        Err(down())
    }

    async fn delete(&self, _id: BookmarkId) -> Result<bool, StoreError> {
        Err(down())
    }

    async fn update(&self, _id: BookmarkId, _changes: &BookmarkUpdate) -> Result<bool, StoreError> {
        Err(down())
    }

    fn backend(&self) -> &'static str {
        "failing"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(down())
    }
}

fn down() -> StoreError {
    StoreError::Unavailable("connection refused by 10.0.0.5:5432".to_string())
}

// ---------------------------------------------------------------------------
// In-process router

pub fn test_config() -> AppConfig {
    AppConfig::from_vars(|key| match key {
        "APP_ENV" => Some("test".to_string()),
        "API_TOKEN" => Some(TEST_TOKEN.to_string()),
        _ => None,
    })
}

pub fn router_with(store: Arc<dyn BookmarkStore>) -> Router {
    bookmarks_api::app(&test_config(), store)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!("response is not JSON ({e}): {}", String::from_utf8_lossy(&self.body))
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Build a request; `token` adds the Authorization header, `body` is sent as JSON
pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("valid request")
}

/// Same as [`request`] with the valid test token
pub fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    request(method, uri, Some(TEST_TOKEN), body)
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body")
        .to_vec();
    TestResponse { status, headers, body }
}

// ---------------------------------------------------------------------------
// Spawned server binary

/// The real server binary running on a free port with the memory store.
/// Killed when dropped.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let server = Self::spawn()?;
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_bookmarks-api"));
        cmd.env("APP_ENV", "test")
            .env("HOST", "127.0.0.1")
            .env("PORT", port.to_string())
            .env("API_TOKEN", TEST_TOKEN)
            .env("BOOKMARKS_STORE", "memory")
            .env_remove("DATABASE_URL")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).bearer_auth(TEST_TOKEN).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
