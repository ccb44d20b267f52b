//! Handler for short code resolution.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::redirect::RedirectResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves a short code to its original URL.
///
/// # Endpoint
///
/// `GET /r/{code}`
///
/// # Response
///
/// `200 OK` with the original URL and its expiry for the caller to act on.
///
/// ```json
/// {
///   "originalUrl": "https://example.com/a",
///   "expiresAt": "2030-01-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 404 for an unknown code and 410 Gone once the link has expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<RedirectResponse>, AppError> {
    tracing::info!(code = %code, "Received request to resolve short code");

    let link = state.link_service.resolve(&code).await?;

    Ok(Json(RedirectResponse {
        original_url: link.original_url,
        expires_at: link.expires_at,
    }))
}
