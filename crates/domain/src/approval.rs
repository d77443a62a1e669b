//! Approval eligibility policy.
//!
//! Covers who approves, which pages may carry an approved revision at all,
//! and whether a sweep should (re)approve a page's latest revision.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use wikiapprove_core::NonEmptyString;

use crate::{NamespaceId, RevisionId};

/// Actor recorded on approval writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Approver {
    /// Unauthenticated actor with no account.
    #[default]
    Anonymous,
    /// Designated system or maintenance account.
    Account(NonEmptyString),
}

impl Approver {
    /// Builds an approver from an optional account name; blank means anonymous.
    #[must_use]
    pub fn from_account_name(name: Option<&str>) -> Self {
        name.map(str::trim)
            .and_then(|name| NonEmptyString::new(name).ok())
            .map_or(Self::Anonymous, Self::Account)
    }

    /// Returns the account name, if any.
    #[must_use]
    pub fn account_name(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Account(name) => Some(name.as_str()),
        }
    }

    /// Returns a label suitable for logs.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.account_name().unwrap_or("(anonymous)")
    }
}

/// Sweep policy variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalMode {
    /// Approve only pages without any approved revision.
    #[default]
    MissingOnly,
    /// Re-approve the latest revision whenever it differs from the approved one.
    Force,
}

impl ApprovalMode {
    /// Maps the command-line force flag onto a mode.
    #[must_use]
    pub fn from_force_flag(force: bool) -> Self {
        if force { Self::Force } else { Self::MissingOnly }
    }

    /// Decides what to do with an approvable page.
    #[must_use]
    pub fn decide(self, approved: Option<RevisionId>, latest: RevisionId) -> ApprovalDecision {
        match (self, approved) {
            (Self::MissingOnly, Some(_)) => ApprovalDecision::Skip(SkipReason::AlreadyApproved),
            (Self::Force, Some(approved)) if approved == latest => {
                ApprovalDecision::Skip(SkipReason::AlreadyCurrent)
            }
            _ => ApprovalDecision::Approve(latest),
        }
    }
}

/// Why a page was left untouched by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Namespace not included in the active filter.
    FilteredOut,
    /// Page cannot carry an approved revision.
    NotApprovable,
    /// Page already has an approved revision.
    AlreadyApproved,
    /// Latest revision is already the approved one.
    AlreadyCurrent,
}

impl SkipReason {
    /// Returns a stable value for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FilteredOut => "filtered_out",
            Self::NotApprovable => "not_approvable",
            Self::AlreadyApproved => "already_approved",
            Self::AlreadyCurrent => "already_current",
        }
    }
}

/// Outcome of the eligibility policy for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    /// Approve the given (latest) revision.
    Approve(RevisionId),
    /// Leave the page untouched.
    Skip(SkipReason),
}

/// Facts about one page consulted by [`ApprovabilityRules`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageApprovalFacts {
    /// Namespace of the page.
    pub namespace: NamespaceId,
    /// Whether the page opted in through its page property.
    pub has_opt_in_property: bool,
    /// Categories of the page, in storage form.
    pub categories: Vec<String>,
}

/// Site configuration deciding which pages are approvable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovabilityRules {
    enabled_namespaces: BTreeSet<NamespaceId>,
    selected_categories: BTreeSet<String>,
}

impl ApprovabilityRules {
    /// Page property set by the opt-in magic word.
    pub const OPT_IN_PROPERTY: &'static str = "approvedrevs";

    /// Creates rules from enabled namespaces and selected categories.
    #[must_use]
    pub fn new(
        enabled_namespaces: impl IntoIterator<Item = NamespaceId>,
        selected_categories: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            enabled_namespaces: enabled_namespaces.into_iter().collect(),
            selected_categories: selected_categories
                .into_iter()
                .map(|category| normalize_category(category.as_str()))
                .filter(|category| !category.is_empty())
                .collect(),
        }
    }

    /// Returns the namespaces approvable by default on a fresh install.
    #[must_use]
    pub fn default_enabled_namespaces() -> [NamespaceId; 6] {
        [0, 2, 4, 6, 10, 12].map(NamespaceId::new)
    }

    /// Returns the enabled namespaces.
    #[must_use]
    pub fn enabled_namespaces(&self) -> &BTreeSet<NamespaceId> {
        &self.enabled_namespaces
    }

    /// Returns the selected categories in storage form.
    #[must_use]
    pub fn selected_categories(&self) -> &BTreeSet<String> {
        &self.selected_categories
    }

    /// Returns whether the namespace alone makes its pages approvable.
    #[must_use]
    pub fn namespace_is_enabled(&self, namespace: NamespaceId) -> bool {
        !namespace.is_virtual() && self.enabled_namespaces.contains(&namespace)
    }

    /// Returns whether a page with the given facts is approvable.
    #[must_use]
    pub fn page_is_approvable(&self, facts: &PageApprovalFacts) -> bool {
        if facts.namespace.is_virtual() {
            return false;
        }

        if self.namespace_is_enabled(facts.namespace) || facts.has_opt_in_property {
            return true;
        }

        facts
            .categories
            .iter()
            .any(|category| self.selected_categories.contains(&normalize_category(category)))
    }
}

impl Default for ApprovabilityRules {
    fn default() -> Self {
        Self::new(Self::default_enabled_namespaces(), Vec::new())
    }
}

fn normalize_category(value: &str) -> String {
    value.trim().replace(' ', "_")
}
