use chrono::{DateTime, Utc};
use wikiapprove_core::AppResult;
use wikiapprove_domain::{PageId, RevisionId, SkipReason};

use super::ApprovalSweepSummary;

/// Progress event emitted after each successful approval write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageApproved {
    /// Approved page.
    pub page_id: PageId,
    /// Full display title of the page.
    pub title: String,
    /// Revision now approved.
    pub revision_id: RevisionId,
    /// Revision approved before this write.
    pub previous_revision_id: Option<RevisionId>,
    /// When the write completed.
    pub approved_at: DateTime<Utc>,
}

/// Progress event emitted for pages left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSkipped {
    /// Skipped page.
    pub page_id: PageId,
    /// Why the page was skipped.
    pub reason: SkipReason,
}

/// Output port for sweep progress.
pub trait SweepReporter: Send + Sync {
    /// Reports one approval.
    fn page_approved(&self, event: &PageApproved) -> AppResult<()>;

    /// Reports one skipped page.
    fn page_skipped(&self, _event: &PageSkipped) -> AppResult<()> {
        Ok(())
    }

    /// Reports the end of the sweep.
    fn sweep_finished(&self, summary: &ApprovalSweepSummary) -> AppResult<()>;
}
