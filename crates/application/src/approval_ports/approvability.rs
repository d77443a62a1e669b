use async_trait::async_trait;
use wikiapprove_core::AppResult;
use wikiapprove_domain::WikiPage;

/// Platform predicate deciding whether a page may carry an approved revision.
#[async_trait]
pub trait ApprovabilityPolicy: Send + Sync {
    /// Returns whether the page is approvable.
    async fn page_is_approvable(&self, page: &WikiPage) -> AppResult<bool>;
}
