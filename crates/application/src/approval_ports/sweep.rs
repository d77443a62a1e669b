use wikiapprove_domain::{ApprovalMode, Approver, NamespaceFilter, SkipReason};

/// Inputs for one approval sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovalSweepRequest {
    /// Eligibility policy variant.
    pub mode: ApprovalMode,
    /// Namespace restriction resolved before the sweep.
    pub namespace_filter: NamespaceFilter,
    /// Actor recorded on every approval.
    pub approver: Approver,
}

/// Counters reported at the end of a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApprovalSweepSummary {
    /// Pages returned by enumeration.
    pub pages_visited: u64,
    /// Pages outside the namespace filter.
    pub filtered_out: u64,
    /// Pages that cannot carry an approved revision.
    pub not_approvable: u64,
    /// Pages skipped because an approval already exists.
    pub already_approved: u64,
    /// Pages whose latest revision was already approved.
    pub already_current: u64,
    /// Pages approved by this sweep.
    pub approved: u64,
}

impl ApprovalSweepSummary {
    /// Counts one skipped page.
    pub fn record_skip(&mut self, reason: SkipReason) {
        let counter = match reason {
            SkipReason::FilteredOut => &mut self.filtered_out,
            SkipReason::NotApprovable => &mut self.not_approvable,
            SkipReason::AlreadyApproved => &mut self.already_approved,
            SkipReason::AlreadyCurrent => &mut self.already_current,
        };
        *counter = counter.saturating_add(1);
    }

    /// Returns the number of pages left untouched.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.filtered_out
            .saturating_add(self.not_approvable)
            .saturating_add(self.already_approved)
            .saturating_add(self.already_current)
    }
}
