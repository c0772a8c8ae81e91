//! # Write Authorization
//!
//! Reading achievements is public. The routes that move counters or touch the
//! save (`POST /progress`, `POST /flush`) require the configured key when
//! `CHEEVOS_API_KEY` is set:
//!
//! ```text
//! Authorization: Bearer <your-api-key>
//! ```

use super::types::RejectionResponse;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "CHEEVOS_API_KEY";

/// Key a client must present to record progress.
#[derive(Clone)]
pub struct WriteKey(Arc<str>);

impl std::fmt::Debug for WriteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WriteKey(..)")
    }
}

impl WriteKey {
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self(Arc::from(key))
    }

    /// The key from `CHEEVOS_API_KEY`; unset or empty leaves writes open.
    pub fn from_env() -> Option<Self> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .map(|k| Self::new(&k))
    }

    /// Whether an `Authorization` header value carries this key.
    ///
    /// Only the `Bearer` scheme is accepted. Contents are compared in
    /// constant time; a length mismatch fails early.
    #[must_use]
    pub fn admits(&self, authorization: Option<&str>) -> bool {
        authorization
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|token| token.as_bytes().ct_eq(self.0.as_bytes()).into())
    }
}

/// Reject writes that do not carry the key.
pub async fn require_write_key(
    State(key): State<WriteKey>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if key.admits(authorization) {
        return next.run(request).await;
    }

    tracing::warn!(
        event = "auth_failure",
        path = %request.uri().path(),
        present = authorization.is_some(),
        "Rejected write without a valid API key"
    );
    RejectionResponse::respond(
        StatusCode::UNAUTHORIZED,
        "A valid API key is required to record progress",
    )
}
