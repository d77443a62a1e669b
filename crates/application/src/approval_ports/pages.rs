use async_trait::async_trait;
use wikiapprove_core::AppResult;
use wikiapprove_domain::{PageId, PageSummary, WikiPage};

/// Read-only port over the wiki page store.
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Lists up to `limit` pages whose identifier is greater than `after`,
    /// ordered by identifier.
    async fn list_pages_after(
        &self,
        after: Option<PageId>,
        limit: usize,
    ) -> AppResult<Vec<PageSummary>>;

    /// Resolves one page identifier to a full page handle.
    async fn find_page(&self, page_id: PageId) -> AppResult<Option<WikiPage>>;
}
