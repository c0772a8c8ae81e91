//! # Write Throttling
//!
//! Progress reports come from client-side triggers and normally arrive in
//! small bursts. One shared limiter covers the write routes; reads are never
//! throttled. A throttled client is told when to retry.
//!
//! - `CHEEVOS_RATE_LIMIT`: writes per second (default: 100, 0 disables)

use super::types::RejectionResponse;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter, clock::Clock};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Environment variable holding the write rate.
pub const RATE_LIMIT_ENV: &str = "CHEEVOS_RATE_LIMIT";

const DEFAULT_WRITES_PER_SECOND: u32 = 100;

/// Limiter shared by every write route.
pub type WriteLimiter = Arc<DefaultDirectRateLimiter>;

/// Limiter admitting `per_second` writes, or `None` when throttling is off.
pub fn write_limiter(per_second: u32) -> Option<WriteLimiter> {
    NonZeroU32::new(per_second).map(|rate| Arc::new(RateLimiter::direct(Quota::per_second(rate))))
}

/// Write rate from `CHEEVOS_RATE_LIMIT`, falling back to the default.
pub fn write_rate_from_env() -> u32 {
    match std::env::var(RATE_LIMIT_ENV) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(value = %raw, "Unreadable {}, using default", RATE_LIMIT_ENV);
            DEFAULT_WRITES_PER_SECOND
        }),
        Err(_) => DEFAULT_WRITES_PER_SECOND,
    }
}

/// Answer 429 with `Retry-After` once the write quota is spent.
pub async fn throttle_writes(
    State(limiter): State<WriteLimiter>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let not_until = match limiter.check() {
        Ok(()) => return next.run(request).await,
        Err(not_until) => not_until,
    };

    let wait = not_until.wait_time_from(limiter.clock().now());
    let retry_after = wait.as_secs().max(1);
    tracing::warn!(
        path = %request.uri().path(),
        retry_after,
        "Throttled progress write"
    );

    let mut response =
        RejectionResponse::respond(StatusCode::TOO_MANY_REQUESTS, "Too many progress writes");
    if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    response
}
