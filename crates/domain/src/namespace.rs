use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Numeric namespace index as used by the wiki platform.
///
/// Defaults to the main namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NamespaceId(i32);

impl NamespaceId {
    /// The main content namespace.
    pub const MAIN: Self = Self(0);

    /// Creates a namespace identifier from its index.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the namespace index.
    #[must_use]
    pub fn as_i32(&self) -> i32 {
        self.0
    }

    /// Returns whether the namespace is virtual (special pages, media links).
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.0 < 0
    }
}

impl Display for NamespaceId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Optional restriction of a run to a set of namespaces.
///
/// `All` passes every namespace. `Only` never holds an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamespaceFilter {
    /// No filtering.
    #[default]
    All,
    /// Only the listed namespaces pass.
    Only(BTreeSet<NamespaceId>),
}

impl NamespaceFilter {
    /// Builds a filter from resolved namespaces; no namespaces means no filter.
    #[must_use]
    pub fn from_namespaces(namespaces: impl IntoIterator<Item = NamespaceId>) -> Self {
        let namespaces: BTreeSet<NamespaceId> = namespaces.into_iter().collect();
        if namespaces.is_empty() {
            return Self::All;
        }

        Self::Only(namespaces)
    }

    /// Returns whether pages in the namespace pass the filter.
    #[must_use]
    pub fn allows(&self, namespace: NamespaceId) -> bool {
        match self {
            Self::All => true,
            Self::Only(namespaces) => namespaces.contains(&namespace),
        }
    }

    /// Returns whether a restriction is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Only(_))
    }

    /// Returns the allowed namespaces when a restriction is active.
    #[must_use]
    pub fn namespaces(&self) -> Option<&BTreeSet<NamespaceId>> {
        match self {
            Self::All => None,
            Self::Only(namespaces) => Some(namespaces),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NamespaceFilter, NamespaceId};

    #[test]
    fn empty_namespace_list_means_no_filter() {
        let filter = NamespaceFilter::from_namespaces(Vec::new());

        assert_eq!(filter, NamespaceFilter::All);
        assert!(filter.allows(NamespaceId::new(14)));
        assert!(!filter.is_active());
    }

    #[test]
    fn only_filter_deduplicates_and_restricts() {
        let filter = NamespaceFilter::from_namespaces([
            NamespaceId::new(1),
            NamespaceId::MAIN,
            NamespaceId::new(1),
        ]);

        assert!(filter.is_active());
        assert_eq!(filter.namespaces().map(|set| set.len()), Some(2));
        assert!(filter.allows(NamespaceId::MAIN));
        assert!(!filter.allows(NamespaceId::new(2)));
    }
}
