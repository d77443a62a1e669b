//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod approval;
mod namespace;
mod page;

pub use approval::{
    ApprovabilityRules, ApprovalDecision, ApprovalMode, Approver, PageApprovalFacts,
    SkipReason,
};
pub use namespace::{NamespaceFilter, NamespaceId};
pub use page::{PageId, PageSummary, RevisionId, WikiPage};
