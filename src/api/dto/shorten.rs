//! DTOs for the shorten endpoint.
//!
//! Wire format is camelCase, matching the public API contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL.
///
/// Both fields are modelled as `Option` so that missing fields surface as
/// itemized validation errors instead of a bare deserialization failure.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The original URL to shorten (must be a valid absolute URL).
    #[validate(
        required(message = "Original URL is required"),
        url(message = "Invalid URL format")
    )]
    pub original_url: Option<String>,

    /// Expiry timestamp; must be strictly in the future.
    #[validate(required(message = "Validity date is required"))]
    pub validity: Option<DateTime<Utc>>,
}

/// Response for a created (or idempotently re-returned) short link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    pub original_url: String,
    pub expires_at: DateTime<Utc>,
}
