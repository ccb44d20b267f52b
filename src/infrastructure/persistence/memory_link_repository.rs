//! In-memory implementation of the link repository.
//!
//! Backs the service when no `DATABASE_URL` is configured and the
//! integration tests, which run without a provisioned Postgres.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Default)]
struct State {
    /// Records keyed by short code.
    by_code: HashMap<String, ShortLink>,
    /// Secondary index: original URL -> code.
    url_index: HashMap<String, String>,
    next_id: i64,
}

/// In-process repository enforcing the same unique constraints as the
/// Postgres schema: duplicate `code` or `original_url` inserts are rejected
/// with [`AppError::Conflict`].
#[derive(Default)]
pub struct InMemoryLinkRepository {
    state: RwLock<State>,
}

impl InMemoryLinkRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, AppError> {
        self.state
            .read()
            .map_err(|_| AppError::internal("Link store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, AppError> {
        self.state
            .write()
            .map_err(|_| AppError::internal("Link store lock poisoned"))
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut state = self.write()?;

        if state.by_code.contains_key(&new_link.code)
            || state.url_index.contains_key(&new_link.original_url)
        {
            return Err(AppError::Conflict);
        }

        state.next_id += 1;
        let link = ShortLink::new(
            state.next_id,
            new_link.original_url,
            new_link.code,
            new_link.expires_at,
            Utc::now(),
        );

        state
            .url_index
            .insert(link.original_url.clone(), link.code.clone());
        state.by_code.insert(link.code.clone(), link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let state = self.read()?;
        Ok(state.by_code.get(code).cloned())
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<ShortLink>, AppError> {
        let state = self.read()?;
        Ok(state
            .url_index
            .get(original_url)
            .and_then(|code| state.by_code.get(code))
            .cloned())
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        let state = self.read()?;
        Ok(state.by_code.contains_key(code))
    }
}
