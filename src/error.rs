//! Application error taxonomy and HTTP response mapping.
//!
//! Every failure that crosses the service boundary is an [`AppError`] and is
//! rendered as a JSON body of the shape
//! `{ "message", "status", "timestamp", "errors"? }`, with `errors` omitted
//! when there are no itemized field errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::ValidationErrors;

/// Maximum retries of the unique-code generation loop.
pub const MAX_CODE_ATTEMPTS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request-shape validation failed (malformed URL, missing fields).
    #[error("Validation failed")]
    Validation { errors: Vec<String> },

    /// The requested expiry is not strictly in the future.
    #[error("Validity date must be in the future")]
    InvalidValidity,

    /// No record exists for the given short code.
    #[error("Short URL not found")]
    NotFound,

    /// The record exists but its expiry has passed.
    #[error("URL expired")]
    Expired,

    /// The unique-code retry loop ran out of attempts.
    #[error("Failed to generate unique short code after 5 attempts")]
    GenerationExhausted,

    /// Unique-constraint violation reported by the store.
    ///
    /// Consumed inside [`crate::application::services::LinkService`] as the
    /// lost side of a creation race; only escapes to HTTP if re-fetching the
    /// winner fails.
    #[error("Record already exists")]
    Conflict,

    /// Storage or other unexpected failure. Never carries raw driver errors
    /// across the HTTP boundary.
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Status code this error is rendered with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::InvalidValidity => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Expired => StatusCode::GONE,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::GenerationExhausted | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// JSON error payload returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let errors = match &self {
            AppError::Validation { errors } if !errors.is_empty() => Some(errors.clone()),
            _ => None,
        };

        let body = ErrorResponse {
            message: self.to_string(),
            status: status.as_u16(),
            timestamp: Utc::now(),
            errors,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        AppError::Validation {
            errors: flatten_validation_errors(&e),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return AppError::Conflict;
            }
        }

        tracing::error!(error = %e, "database error");
        AppError::internal("Database error")
    }
}

/// Flattens validator output into a stable, sorted list of per-field messages.
pub fn flatten_validation_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut out: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: invalid value"),
            })
        })
        .collect();

    out.sort();
    out
}
