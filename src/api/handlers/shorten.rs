//! Handler for the link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "originalUrl": "https://example.com/a",
///   "validity": "2030-01-01T00:00:00Z"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the composed short URL. Re-submitting an already
/// shortened URL returns the existing link with the same status.
///
/// ```json
/// {
///   "shortUrl": "http://localhost:3000/r/hmXSNu",
///   "originalUrl": "https://example.com/a",
///   "expiresAt": "2030-01-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 with itemized `errors` when the request shape is invalid or
/// the validity is not in the future.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    // `required` above guarantees both fields are present.
    let (Some(original_url), Some(validity)) = (payload.original_url, payload.validity) else {
        return Err(AppError::Validation { errors: vec![] });
    };

    tracing::info!(url = %original_url, "Received request to shorten URL");

    let link = state
        .link_service
        .create_short_link(original_url, validity)
        .await?;

    let response = ShortenResponse {
        short_url: state.link_service.short_url(&link.code),
        original_url: link.original_url,
        expires_at: link.expires_at,
    };

    Ok((StatusCode::CREATED, Json(response)))
}
