//! HTTP layer for the Kafra chat server.
//!
//! Two routes: `POST /api/kafra-chat` (rate limited per client) and
//! `GET /api/health`. Middleware: CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod router;
