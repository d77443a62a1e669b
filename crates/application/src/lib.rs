//! Application services and ports.

#![forbid(unsafe_code)]

mod approval_ports;
mod approval_sweep_service;
mod namespace_filter_resolver;

pub use approval_ports::{
    ApprovabilityPolicy, ApprovalRepository, ApprovalSweepRequest, ApprovalSweepSummary,
    ApprovedRevisionWrite, NamespaceRegistry, PageApproved, PageRepository, PageSkipped,
    SweepReporter,
};
pub use approval_sweep_service::{ApprovalSweepService, DEFAULT_SWEEP_BATCH_SIZE};
pub use namespace_filter_resolver::{NAMESPACE_LIST_SEPARATOR, NamespaceFilterResolver};
