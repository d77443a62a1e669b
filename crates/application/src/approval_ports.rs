mod approvability;
mod approvals;
mod namespaces;
mod pages;
mod reporting;
mod sweep;

pub use approvability::ApprovabilityPolicy;
pub use approvals::{ApprovalRepository, ApprovedRevisionWrite};
pub use namespaces::NamespaceRegistry;
pub use pages::PageRepository;
pub use reporting::{PageApproved, PageSkipped, SweepReporter};
pub use sweep::{ApprovalSweepRequest, ApprovalSweepSummary};
