//! HTTP route configuration.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{health_handler, redirect_handler, shorten_handler};
use crate::state::AppState;

/// Builds the application router.
///
/// # Endpoints
///
/// - `POST /api/shorten` - Create a short link
/// - `GET  /r/{code}`    - Resolve a short code
/// - `GET  /health`      - Liveness probe
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/api/shorten", post(shorten_handler))
        .route("/r/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
