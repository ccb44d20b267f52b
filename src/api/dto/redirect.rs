//! DTO for the redirect lookup endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Resolved target of a short code.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectResponse {
    pub original_url: String,
    pub expires_at: DateTime<Utc>,
}
