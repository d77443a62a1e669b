//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod configured_namespace_registry;
mod console_sweep_reporter;
mod in_memory_wiki_repository;
mod postgres_approvability_policy;
mod postgres_approval_repository;
mod postgres_page_repository;

pub use configured_namespace_registry::ConfiguredNamespaceRegistry;
pub use console_sweep_reporter::ConsoleSweepReporter;
pub use in_memory_wiki_repository::{InMemoryApprovalRecord, InMemoryWikiRepository};
pub use postgres_approvability_policy::PostgresApprovabilityPolicy;
pub use postgres_approval_repository::PostgresApprovalRepository;
pub use postgres_page_repository::PostgresPageRepository;
