//! Short link creation and resolution service.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, MAX_CODE_ATTEMPTS};
use crate::utils::code_generator::generate_code;

/// Service enforcing the business rules around link creation and resolution.
///
/// Creation is idempotent per original URL and resolution is expiry-aware;
/// this service is the only writer of [`ShortLink`] records.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` is the externally visible prefix used to compose short
    /// URLs (`<base_url>/r/<code>`), injected once at construction.
    pub fn new(link_repository: Arc<dyn LinkRepository>, base_url: impl Into<String>) -> Self {
        Self {
            link_repository,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a short link, or returns the existing one for this URL.
    ///
    /// # Idempotence
    ///
    /// Re-submitting an already shortened URL returns the original record
    /// unchanged, whatever `expires_at` was passed. The existing record's
    /// own expiry is deliberately not re-checked here.
    ///
    /// # Races
    ///
    /// Two concurrent calls for the same new URL may both pass the lookup
    /// and race on the insert; the store's unique constraint rejects the
    /// loser, which then re-fetches and returns the winner's record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidValidity`] if `expires_at` is not strictly
    /// in the future, [`AppError::GenerationExhausted`] if no free code was
    /// found, [`AppError::Internal`] on storage failures.
    pub async fn create_short_link(
        &self,
        original_url: String,
        expires_at: DateTime<Utc>,
    ) -> Result<ShortLink, AppError> {
        if expires_at <= Utc::now() {
            return Err(AppError::InvalidValidity);
        }

        if let Some(existing) = self
            .link_repository
            .find_by_original_url(&original_url)
            .await?
        {
            tracing::info!(url = %original_url, code = %existing.code, "URL already shortened");
            return Ok(existing);
        }

        let code = self.generate_unique_code(&original_url).await?;

        let new_link = NewShortLink {
            original_url: original_url.clone(),
            code,
            expires_at,
        };

        match self.link_repository.create(new_link).await {
            Ok(link) => {
                tracing::info!(url = %link.original_url, code = %link.code, "Created short URL");
                Ok(link)
            }
            Err(AppError::Conflict) => {
                // Lost the creation race: someone inserted this URL (or the
                // generated code) between lookup and insert. Return the
                // winner's record for the URL.
                tracing::debug!(url = %original_url, "Insert conflict, re-fetching winner");
                self.link_repository
                    .find_by_original_url(&original_url)
                    .await?
                    .ok_or_else(|| AppError::internal("Conflicting record disappeared"))
            }
            Err(e) => Err(e),
        }
    }

    /// Resolves a short code to its record.
    ///
    /// Read-only; a link resolved at exactly its expiry instant is still
    /// considered active.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown code and
    /// [`AppError::Expired`] once wall-clock time has passed the expiry.
    pub async fn resolve(&self, code: &str) -> Result<ShortLink, AppError> {
        let link = self
            .link_repository
            .find_by_code(code)
            .await?
            .ok_or(AppError::NotFound)?;

        if link.is_expired() {
            return Err(AppError::Expired);
        }

        Ok(link)
    }

    /// Composes the full short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/r/{}", self.base_url, code)
    }

    /// Finds a free code for the URL, retrying with a salted seed.
    ///
    /// The first attempt hashes the URL itself, keeping generation
    /// deterministic per URL. On collision the seed is re-salted with the
    /// current nanosecond timestamp and the attempt index, bounded at
    /// [`MAX_CODE_ATTEMPTS`] retries.
    async fn generate_unique_code(&self, original_url: &str) -> Result<String, AppError> {
        let mut code = generate_code(original_url);
        let mut attempt = 0;

        while self.link_repository.exists_by_code(&code).await? && attempt < MAX_CODE_ATTEMPTS {
            let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
            code = generate_code(&format!("{original_url}{nanos}{attempt}"));
            attempt += 1;
        }

        if self.link_repository.exists_by_code(&code).await? {
            return Err(AppError::GenerationExhausted);
        }

        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Duration;
    use mockall::Sequence;

    const BASE: &str = "http://localhost:3000";

    fn future() -> DateTime<Utc> {
        Utc::now() + Duration::days(1)
    }

    fn stored_link(id: i64, url: &str, code: &str, expires_at: DateTime<Utc>) -> ShortLink {
        ShortLink::new(id, url.to_string(), code.to_string(), expires_at, Utc::now())
    }

    #[tokio::test]
    async fn test_create_short_link_success() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_exists_by_code()
            .times(2)
            .returning(|_| Ok(false));
        repo.expect_create().times(1).returning(|new_link| {
            Ok(ShortLink::new(
                10,
                new_link.original_url,
                new_link.code,
                new_link.expires_at,
                Utc::now(),
            ))
        });

        let service = LinkService::new(Arc::new(repo), BASE);

        let expires = future();
        let link = service
            .create_short_link("https://example.com/a".to_string(), expires)
            .await
            .unwrap();

        assert_eq!(link.original_url, "https://example.com/a");
        assert_eq!(link.expires_at, expires);
        // Deterministic derivation from the URL itself on the first attempt.
        assert_eq!(link.code, generate_code("https://example.com/a"));
        assert_eq!(link.code.len(), 6);
    }

    #[tokio::test]
    async fn test_create_short_link_idempotent_per_url() {
        let mut repo = MockLinkRepository::new();

        let existing = stored_link(5, "https://example.com", "DUDjE1", future());
        let returned = existing.clone();
        repo.expect_find_by_original_url()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        repo.expect_create().times(0);

        let service = LinkService::new(Arc::new(repo), BASE);

        // A different expiry on the repeat call changes nothing.
        let link = service
            .create_short_link("https://example.com".to_string(), future() + Duration::days(7))
            .await
            .unwrap();

        assert_eq!(link, existing);
    }

    #[tokio::test]
    async fn test_create_returns_existing_even_when_expired() {
        let mut repo = MockLinkRepository::new();

        // Existing record already past expiry; create still returns it as-is.
        let expired = stored_link(7, "https://example.com/old", "aaaaaa", Utc::now() - Duration::hours(1));
        let returned = expired.clone();
        repo.expect_find_by_original_url()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        repo.expect_create().times(0);

        let service = LinkService::new(Arc::new(repo), BASE);

        let link = service
            .create_short_link("https://example.com/old".to_string(), future())
            .await
            .unwrap();

        assert_eq!(link, expired);
        assert!(link.is_expired());
    }

    #[tokio::test]
    async fn test_create_short_link_invalid_validity() {
        let repo = MockLinkRepository::new();
        let service = LinkService::new(Arc::new(repo), BASE);

        let past = service
            .create_short_link("https://example.com".to_string(), Utc::now() - Duration::seconds(1))
            .await;
        assert!(matches!(past.unwrap_err(), AppError::InvalidValidity));

        let now = service
            .create_short_link("https://example.com".to_string(), Utc::now())
            .await;
        assert!(matches!(now.unwrap_err(), AppError::InvalidValidity));
    }

    #[tokio::test]
    async fn test_create_recovers_from_lost_race() {
        let mut repo = MockLinkRepository::new();
        let mut seq = Sequence::new();

        // First lookup sees nothing, insert loses the race, second lookup
        // returns the winner's record.
        repo.expect_find_by_original_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_exists_by_code()
            .times(2)
            .returning(|_| Ok(false));
        repo.expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(AppError::Conflict));
        let winner = stored_link(3, "https://example.com/raced", "bbbbbb", future());
        let returned = winner.clone();
        repo.expect_find_by_original_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(returned.clone())));

        let service = LinkService::new(Arc::new(repo), BASE);

        let link = service
            .create_short_link("https://example.com/raced".to_string(), future())
            .await
            .unwrap();

        assert_eq!(link, winner);
    }

    #[tokio::test]
    async fn test_create_race_refetch_miss_is_internal() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_original_url().returning(|_| Ok(None));
        repo.expect_exists_by_code().returning(|_| Ok(false));
        repo.expect_create().returning(|_| Err(AppError::Conflict));

        let service = LinkService::new(Arc::new(repo), BASE);

        let err = service
            .create_short_link("https://example.com/gone".to_string(), future())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_generate_unique_code_retries_on_collision() {
        let mut repo = MockLinkRepository::new();
        let mut seq = Sequence::new();

        repo.expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));

        // Initial code is taken; the salted retry is free, then the final
        // re-check passes.
        repo.expect_exists_by_code()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        repo.expect_exists_by_code()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));

        repo.expect_create().times(1).returning(|new_link| {
            Ok(ShortLink::new(
                1,
                new_link.original_url,
                new_link.code,
                new_link.expires_at,
                Utc::now(),
            ))
        });

        let service = LinkService::new(Arc::new(repo), BASE);

        let link = service
            .create_short_link("https://example.com/collide".to_string(), future())
            .await
            .unwrap();

        // The retry re-seeds, so the code differs from the plain derivation.
        assert_ne!(link.code, generate_code("https://example.com/collide"));
        assert_eq!(link.code.len(), 6);
    }

    #[tokio::test]
    async fn test_generate_unique_code_exhausts_after_bounded_retries() {
        let mut repo = MockLinkRepository::new();

        repo.expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        // 6 loop checks plus the final re-check, every code taken.
        repo.expect_exists_by_code()
            .times(7)
            .returning(|_| Ok(true));
        repo.expect_create().times(0);

        let service = LinkService::new(Arc::new(repo), BASE);

        let err = service
            .create_short_link("https://example.com/full".to_string(), future())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::GenerationExhausted));
    }

    #[tokio::test]
    async fn test_resolve_success() {
        let mut repo = MockLinkRepository::new();

        let expires = future();
        let link = stored_link(1, "https://example.com/a", "hmXSNu", expires);
        let returned = link.clone();
        repo.expect_find_by_code()
            .withf(|code| code == "hmXSNu")
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let service = LinkService::new(Arc::new(repo), BASE);

        let resolved = service.resolve("hmXSNu").await.unwrap();
        assert_eq!(resolved.original_url, "https://example.com/a");
        assert_eq!(resolved.expires_at, expires);
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(repo), BASE);

        let err = service.resolve("doesnotexist").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_resolve_expired() {
        let mut repo = MockLinkRepository::new();

        let link = stored_link(1, "https://example.com", "cccccc", Utc::now() - Duration::milliseconds(10));
        let returned = link.clone();
        repo.expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let service = LinkService::new(Arc::new(repo), BASE);

        let err = service.resolve("cccccc").await.unwrap_err();
        assert!(matches!(err, AppError::Expired));
    }

    #[test]
    fn test_short_url_composition() {
        let service = LinkService::new(Arc::new(MockLinkRepository::new()), "http://localhost:3000/");
        assert_eq!(service.short_url("abc123"), "http://localhost:3000/r/abc123");
    }
}
