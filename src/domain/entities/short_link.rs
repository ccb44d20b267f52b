//! ShortLink entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL record with its expiry metadata.
///
/// Records are written once at creation and never mutated or deleted; a link
/// becomes logically expired purely as a function of wall-clock time.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortLink {
    pub id: i64,
    pub original_url: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    pub fn new(
        id: i64,
        original_url: String,
        code: String,
        expires_at: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            code,
            expires_at,
            created_at,
        }
    }

    /// Returns true if the link has passed its expiry time.
    ///
    /// The comparison is strictly "after": a link resolved at exactly
    /// `expires_at` is still active.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Input data for creating a new link.
///
/// `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub original_url: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}
