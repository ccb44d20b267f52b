//! Liveness probe handler.

use axum::Json;

use crate::api::dto::health::HealthResponse;

/// `GET /health` — always returns 200 while the process is serving.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
