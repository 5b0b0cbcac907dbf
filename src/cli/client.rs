use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::models::{BookmarkId, BookmarkView};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{message} (HTTP {status})")]
    Api { status: StatusCode, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Thin HTTP client for the bookmarks API
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Err(ClientError::Api {
            status,
            message: error_message(status, &body),
        })
    }

    pub async fn list(&self) -> Result<Vec<BookmarkView>, ClientError> {
        let response = self.send(self.http.get(self.url("/api/bookmarks"))).await?;
        Ok(response.json().await?)
    }

    pub async fn get(&self, id: BookmarkId) -> Result<BookmarkView, ClientError> {
        let response = self
            .send(self.http.get(self.url(&format!("/api/bookmarks/{}", id))))
            .await?;
        Ok(response.json().await?)
    }

    pub async fn create(&self, body: &Value) -> Result<BookmarkView, ClientError> {
        let response = self
            .send(self.http.post(self.url("/api/bookmarks")).json(body))
            .await?;
        Ok(response.json().await?)
    }

    pub async fn update(&self, id: BookmarkId, body: &Value) -> Result<(), ClientError> {
        self.send(self.http.patch(self.url(&format!("/api/bookmarks/{}", id))).json(body))
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: BookmarkId) -> Result<(), ClientError> {
        self.send(self.http.delete(self.url(&format!("/api/bookmarks/{}", id))))
            .await?;
        Ok(())
    }
}

/// Pull the human-readable message out of either error body shape
pub fn error_message(status: StatusCode, body: &Value) -> String {
    let error = &body["error"];
    if let Some(message) = error["message"].as_str() {
        return message.to_string();
    }
    if let Some(message) = error.as_str() {
        return message.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_nested_and_flat_error_shapes() {
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, &json!({ "error": { "message": "Bookmark not found" } })),
            "Bookmark not found"
        );
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED, &json!({ "error": "Unauthorized request." })),
            "Unauthorized request."
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, &Value::Null), "Bad Gateway");
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client = ApiClient::new("http://localhost:8000/", "t");
        assert_eq!(client.url("/api/bookmarks"), "http://localhost:8000/api/bookmarks");
    }
}
