use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use wikiapprove_application::{
    ApprovabilityPolicy, ApprovalRepository, ApprovedRevisionWrite, PageRepository,
};
use wikiapprove_core::{AppError, AppResult};
use wikiapprove_domain::{
    ApprovabilityRules, Approver, PageApprovalFacts, PageId, PageSummary, RevisionId, WikiPage,
};

/// Approval stored by [`InMemoryWikiRepository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryApprovalRecord {
    /// Approved revision.
    pub revision_id: RevisionId,
    /// Actor that approved it.
    pub approver: Approver,
    /// Whether the revision was the page's latest when approved.
    pub is_latest: bool,
    /// When the approval was written.
    pub approved_at: DateTime<Utc>,
}

/// In-memory wiki page store and approval-record store.
#[derive(Debug)]
pub struct InMemoryWikiRepository {
    rules: ApprovabilityRules,
    approval_store_installed: bool,
    pages: RwLock<BTreeMap<PageId, WikiPage>>,
    page_properties: RwLock<HashMap<PageId, HashSet<String>>>,
    page_categories: RwLock<HashMap<PageId, Vec<String>>>,
    approvals: RwLock<HashMap<PageId, InMemoryApprovalRecord>>,
}

impl InMemoryWikiRepository {
    /// Creates an empty repository using the given approvability rules.
    #[must_use]
    pub fn new(rules: ApprovabilityRules) -> Self {
        Self {
            rules,
            approval_store_installed: true,
            pages: RwLock::new(BTreeMap::new()),
            page_properties: RwLock::new(HashMap::new()),
            page_categories: RwLock::new(HashMap::new()),
            approvals: RwLock::new(HashMap::new()),
        }
    }

    /// Simulates a wiki where the approval-record store is not installed.
    #[must_use]
    pub fn without_approval_store(mut self) -> Self {
        self.approval_store_installed = false;
        self
    }

    /// Inserts or replaces a page.
    pub async fn save_page(&self, page: WikiPage) {
        self.pages.write().await.insert(page.page_id(), page);
    }

    /// Deletes a page and everything attached to it.
    pub async fn delete_page(&self, page_id: PageId) {
        self.pages.write().await.remove(&page_id);
        self.page_properties.write().await.remove(&page_id);
        self.page_categories.write().await.remove(&page_id);
        self.approvals.write().await.remove(&page_id);
    }

    /// Sets a page property such as the approval opt-in marker.
    pub async fn set_page_property(&self, page_id: PageId, name: &str) {
        self.page_properties
            .write()
            .await
            .entry(page_id)
            .or_default()
            .insert(name.to_owned());
    }

    /// Adds a category to a page.
    pub async fn add_page_category(&self, page_id: PageId, category: &str) {
        self.page_categories
            .write()
            .await
            .entry(page_id)
            .or_default()
            .push(category.to_owned());
    }

    /// Returns the stored approval of a page.
    pub async fn approval(&self, page_id: PageId) -> Option<InMemoryApprovalRecord> {
        self.approvals.read().await.get(&page_id).cloned()
    }

    fn require_approval_store(&self) -> AppResult<()> {
        if self.approval_store_installed {
            return Ok(());
        }

        Err(AppError::Unavailable(
            "the approved revisions store is not installed on this wiki".to_owned(),
        ))
    }
}

impl Default for InMemoryWikiRepository {
    fn default() -> Self {
        Self::new(ApprovabilityRules::default())
    }
}

#[async_trait]
impl PageRepository for InMemoryWikiRepository {
    async fn list_pages_after(
        &self,
        after: Option<PageId>,
        limit: usize,
    ) -> AppResult<Vec<PageSummary>> {
        let pages = self.pages.read().await;
        let lower = match after {
            Some(after) => std::ops::Bound::Excluded(after),
            None => std::ops::Bound::Unbounded,
        };

        Ok(pages
            .range((lower, std::ops::Bound::Unbounded))
            .take(limit)
            .map(|(page_id, page)| PageSummary {
                page_id: *page_id,
                latest_revision_id: page.latest_revision_id(),
                namespace: page.namespace(),
            })
            .collect())
    }

    async fn find_page(&self, page_id: PageId) -> AppResult<Option<WikiPage>> {
        Ok(self.pages.read().await.get(&page_id).cloned())
    }
}

#[async_trait]
impl ApprovalRepository for InMemoryWikiRepository {
    async fn ensure_available(&self) -> AppResult<()> {
        self.require_approval_store()
    }

    async fn find_approved_revision(&self, page_id: PageId) -> AppResult<Option<RevisionId>> {
        self.require_approval_store()?;
        Ok(self
            .approvals
            .read()
            .await
            .get(&page_id)
            .map(|record| record.revision_id))
    }

    async fn set_approved_revision(&self, write: ApprovedRevisionWrite) -> AppResult<()> {
        self.require_approval_store()?;
        let page_id = write.page.page_id();
        if write.notify_watchers {
            return Err(AppError::Validation(format!(
                "watcher notifications are not supported for approvals of page '{page_id}'"
            )));
        }

        if !self.pages.read().await.contains_key(&page_id) {
            return Err(AppError::NotFound(format!("page '{page_id}' does not exist")));
        }

        self.approvals.write().await.insert(
            page_id,
            InMemoryApprovalRecord {
                revision_id: write.revision_id,
                approver: write.approver,
                is_latest: write.is_latest,
                approved_at: Utc::now(),
            },
        );

        Ok(())
    }
}

#[async_trait]
impl ApprovabilityPolicy for InMemoryWikiRepository {
    async fn page_is_approvable(&self, page: &WikiPage) -> AppResult<bool> {
        if self.rules.namespace_is_enabled(page.namespace()) {
            return Ok(true);
        }

        let facts = PageApprovalFacts {
            namespace: page.namespace(),
            has_opt_in_property: self
                .page_properties
                .read()
                .await
                .get(&page.page_id())
                .is_some_and(|properties| {
                    properties.contains(ApprovabilityRules::OPT_IN_PROPERTY)
                }),
            categories: self
                .page_categories
                .read()
                .await
                .get(&page.page_id())
                .cloned()
                .unwrap_or_default(),
        };

        Ok(self.rules.page_is_approvable(&facts))
    }
}
