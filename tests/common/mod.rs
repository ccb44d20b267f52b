#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use shortlink::application::services::LinkService;
use shortlink::domain::entities::NewShortLink;
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::persistence::InMemoryLinkRepository;
use shortlink::state::AppState;

pub const BASE_URL: &str = "http://localhost:3000";

/// Builds an app state over a fresh in-memory repository, returning the
/// repository handle so tests can seed records directly.
pub fn create_test_state() -> (AppState, Arc<InMemoryLinkRepository>) {
    let repository = Arc::new(InMemoryLinkRepository::new());
    let link_service = Arc::new(LinkService::new(repository.clone(), BASE_URL));

    (AppState::new(link_service), repository)
}

pub async fn create_test_link(
    repo: &InMemoryLinkRepository,
    url: &str,
    code: &str,
    expires_at: DateTime<Utc>,
) {
    repo.create(NewShortLink {
        original_url: url.to_string(),
        code: code.to_string(),
        expires_at,
    })
    .await
    .unwrap();
}

/// Seeds a record whose expiry is already one hour in the past. The service
/// never creates these, so tests write straight through the repository.
pub async fn create_expired_link(repo: &InMemoryLinkRepository, url: &str, code: &str) {
    create_test_link(repo, url, code, Utc::now() - Duration::hours(1)).await;
}
