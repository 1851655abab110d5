//! Per-client rate limiting middleware for the chat route.
//!
//! Clients are keyed by peer IP from `ConnectInfo`. Behind a reverse proxy,
//! `trust_forwarded_for` switches to the first `X-Forwarded-For` entry.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderValue;
use axum::http::header::RETRY_AFTER;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use kafra_core::ratelimit::{RateDecision, WindowRateLimiter};

use crate::http::error::AppError;
use crate::state::AppState;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Key used when the peer address is unavailable.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Identify the client behind a request.
pub fn client_key(request: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = request
            .headers()
            .get(FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Reject the request with 429 once the client exhausts its window.
pub async fn limit_by_client(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request, state.config.trust_forwarded_for);

    match state.limiter.check(&key, Instant::now()) {
        RateDecision::Allowed { .. } => next.run(request).await,
        RateDecision::Limited { retry_after } => {
            tracing::warn!(
                client_ip = %key,
                retry_after_secs = retry_after.as_secs(),
                "Client rate limited"
            );
            let mut response = AppError::RateLimited.into_response();
            response.headers_mut().insert(
                RETRY_AFTER,
                HeaderValue::from(retry_after.as_secs().max(1)),
            );
            response
        }
    }
}

/// Periodically drop expired limiter entries until `cancel` fires.
pub fn spawn_sweeper(
    limiter: WindowRateLimiter,
    every: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = limiter.sweep_expired(Instant::now());
                    if removed > 0 {
                        tracing::debug!(removed, remaining = limiter.len(), "Swept rate limit entries");
                    }
                }
            }
        }
    })
}
