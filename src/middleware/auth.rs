use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

use crate::error::ApiError;

/// Static shared-secret check for `Authorization: Bearer <token>`.
///
/// Only the SHA-256 digest of the configured token is kept, and candidates
/// are compared digest to digest.
#[derive(Clone)]
pub struct AuthGate {
    expected: Option<Arc<[u8; 32]>>,
}

impl AuthGate {
    /// An empty token configures a gate that rejects everything
    pub fn new(api_token: &str) -> Self {
        let expected = (!api_token.is_empty()).then(|| Arc::new(digest(api_token)));
        Self { expected }
    }

    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), &'static str> {
        let expected = self.expected.as_ref().ok_or("API token not configured")?;
        let token = extract_bearer_token(headers)?;

        let candidate = digest(token);
        let mismatch = candidate
            .iter()
            .zip(expected.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));

        if mismatch == 0 {
            Ok(())
        } else {
            Err("Invalid bearer token")
        }
    }
}

/// Rejects the request with 401 before any handler runs
pub async fn bearer_auth_middleware(
    State(gate): State<AuthGate>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(reason) = gate.authorize(request.headers()) {
        tracing::warn!("Unauthorized request to path: {} ({})", request.uri().path(), reason);
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must use Bearer token format")?
        .trim();

    if token.is_empty() {
        return Err("Empty bearer token");
    }
    Ok(token)
}

fn digest(token: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(token.as_bytes()));
    out
}
