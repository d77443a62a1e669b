use std::sync::Arc;

use chrono::Utc;
use wikiapprove_core::{AppError, AppResult};
use wikiapprove_domain::{ApprovalDecision, PageSummary, SkipReason, WikiPage};

use crate::approval_ports::{
    ApprovabilityPolicy, ApprovalRepository, ApprovalSweepRequest, ApprovalSweepSummary,
    ApprovedRevisionWrite, NamespaceRegistry, PageApproved, PageRepository, PageSkipped,
    SweepReporter,
};

/// Default number of pages fetched per enumeration batch.
pub const DEFAULT_SWEEP_BATCH_SIZE: usize = 500;

/// Approves the latest revision of every eligible page.
#[derive(Clone)]
pub struct ApprovalSweepService {
    page_repository: Arc<dyn PageRepository>,
    approval_repository: Arc<dyn ApprovalRepository>,
    approvability_policy: Arc<dyn ApprovabilityPolicy>,
    namespace_registry: Arc<dyn NamespaceRegistry>,
    batch_size: usize,
}

enum PageOutcome {
    Approved(PageApproved),
    Skipped(SkipReason),
}

impl ApprovalSweepService {
    /// Creates a sweep service over the page and approval stores.
    #[must_use]
    pub fn new(
        page_repository: Arc<dyn PageRepository>,
        approval_repository: Arc<dyn ApprovalRepository>,
        approvability_policy: Arc<dyn ApprovabilityPolicy>,
        namespace_registry: Arc<dyn NamespaceRegistry>,
    ) -> Self {
        Self {
            page_repository,
            approval_repository,
            approvability_policy,
            namespace_registry,
            batch_size: DEFAULT_SWEEP_BATCH_SIZE,
        }
    }

    /// Overrides the enumeration batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Fails when the approval-record store is not installed.
    pub async fn ensure_capability(&self) -> AppResult<()> {
        self.approval_repository.ensure_available().await
    }

    /// Visits every page once and approves the eligible ones.
    ///
    /// Store failures stop the sweep; approvals written before the failure
    /// stay in place.
    pub async fn run(
        &self,
        request: &ApprovalSweepRequest,
        reporter: &dyn SweepReporter,
    ) -> AppResult<ApprovalSweepSummary> {
        if self.batch_size == 0 {
            return Err(AppError::Validation(
                "batch_size must be greater than zero".to_owned(),
            ));
        }

        let mut summary = ApprovalSweepSummary::default();
        let mut cursor = None;

        loop {
            let pages = self
                .page_repository
                .list_pages_after(cursor, self.batch_size)
                .await?;
            let Some(last_page) = pages.last() else {
                break;
            };

            if cursor.is_some_and(|previous| last_page.page_id <= previous) {
                return Err(AppError::Internal(format!(
                    "page enumeration did not advance past page '{}'",
                    last_page.page_id
                )));
            }
            cursor = Some(last_page.page_id);
            let fetched = pages.len();

            for page in pages {
                summary.pages_visited = summary.pages_visited.saturating_add(1);

                match self.process_page(page, request).await? {
                    PageOutcome::Approved(event) => {
                        summary.approved = summary.approved.saturating_add(1);
                        reporter.page_approved(&event)?;
                    }
                    PageOutcome::Skipped(reason) => {
                        summary.record_skip(reason);
                        reporter.page_skipped(&PageSkipped {
                            page_id: page.page_id,
                            reason,
                        })?;
                    }
                }
            }

            if fetched < self.batch_size {
                break;
            }
        }

        reporter.sweep_finished(&summary)?;
        Ok(summary)
    }

    async fn process_page(
        &self,
        page: PageSummary,
        request: &ApprovalSweepRequest,
    ) -> AppResult<PageOutcome> {
        if !request.namespace_filter.allows(page.namespace) {
            return Ok(PageOutcome::Skipped(SkipReason::FilteredOut));
        }

        let wiki_page = self
            .page_repository
            .find_page(page.page_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "page '{}' disappeared during the sweep",
                    page.page_id
                ))
            })?;

        if !self
            .approvability_policy
            .page_is_approvable(&wiki_page)
            .await?
        {
            return Ok(PageOutcome::Skipped(SkipReason::NotApprovable));
        }

        let approved_revision_id = self
            .approval_repository
            .find_approved_revision(page.page_id)
            .await?;

        let revision_id = match request
            .mode
            .decide(approved_revision_id, page.latest_revision_id)
        {
            ApprovalDecision::Approve(revision_id) => revision_id,
            ApprovalDecision::Skip(reason) => return Ok(PageOutcome::Skipped(reason)),
        };

        let title = self.display_title(&wiki_page);
        self.approval_repository
            .set_approved_revision(ApprovedRevisionWrite {
                page: wiki_page,
                revision_id,
                approver: request.approver.clone(),
                is_latest: true,
                notify_watchers: false,
            })
            .await?;

        Ok(PageOutcome::Approved(PageApproved {
            page_id: page.page_id,
            title,
            revision_id,
            previous_revision_id: approved_revision_id,
            approved_at: Utc::now(),
        }))
    }

    fn display_title(&self, page: &WikiPage) -> String {
        match self.namespace_registry.text_for_index(page.namespace()) {
            Some(namespace_text) => page.full_text(namespace_text.as_str()),
            None => page.full_text(page.namespace().to_string().as_str()),
        }
    }
}
