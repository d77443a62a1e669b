use async_trait::async_trait;
use wikiapprove_core::AppResult;
use wikiapprove_domain::{Approver, PageId, RevisionId, WikiPage};

/// One approval write sent to the approval-record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedRevisionWrite {
    /// Page receiving the approval.
    pub page: WikiPage,
    /// Revision to mark as approved.
    pub revision_id: RevisionId,
    /// Actor recorded on the approval.
    pub approver: Approver,
    /// Whether `revision_id` is the page's current revision.
    pub is_latest: bool,
    /// Whether watchers of the page get notified about the change.
    ///
    /// Stores without notification delivery reject `true` with
    /// `AppError::Validation`.
    pub notify_watchers: bool,
}

/// Port over the approval-record store.
#[async_trait]
pub trait ApprovalRepository: Send + Sync {
    /// Fails with `AppError::Unavailable` when the store is not installed.
    async fn ensure_available(&self) -> AppResult<()>;

    /// Returns the approved revision of a page, if any.
    async fn find_approved_revision(&self, page_id: PageId) -> AppResult<Option<RevisionId>>;

    /// Creates or overwrites the approved revision of a page.
    async fn set_approved_revision(&self, write: ApprovedRevisionWrite) -> AppResult<()>;
}
