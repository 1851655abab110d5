//! Axum router configuration with middleware.
//!
//! Routes:
//! - `POST /api/kafra-chat` behind the per-client rate limiter
//! - `GET /api/health`
//!
//! Middleware: CORS (any origin) and request tracing.

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::{handlers, rate_limit};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let chat_routes = Router::new()
        .route("/api/kafra-chat", post(handlers::chat::kafra_chat))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::limit_by_client,
        ));

    Router::new()
        .merge(chat_routes)
        .route("/api/health", get(handlers::health::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
