use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::NamespaceId;

/// Stable page identifier assigned by the page store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageId(i64);

impl PageId {
    /// Creates a page identifier from its stored value.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the stored value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for PageId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Revision identifier assigned by the revision store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RevisionId(i64);

impl RevisionId {
    /// Creates a revision identifier from its stored value.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the stored value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for RevisionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Page row as produced by page enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    /// Page identifier.
    pub page_id: PageId,
    /// Current revision of the page.
    pub latest_revision_id: RevisionId,
    /// Namespace the page lives in.
    pub namespace: NamespaceId,
}

/// Fully resolved page handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikiPage {
    page_id: PageId,
    namespace: NamespaceId,
    db_key: String,
    latest_revision_id: RevisionId,
}

impl WikiPage {
    /// Creates a page handle.
    ///
    /// `db_key` is the title inside its namespace in storage form, with
    /// underscores in place of spaces and without the namespace prefix.
    #[must_use]
    pub fn new(
        page_id: PageId,
        namespace: NamespaceId,
        db_key: impl Into<String>,
        latest_revision_id: RevisionId,
    ) -> Self {
        Self {
            page_id,
            namespace,
            db_key: db_key.into(),
            latest_revision_id,
        }
    }

    /// Returns the page identifier.
    #[must_use]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Returns the page namespace.
    #[must_use]
    pub fn namespace(&self) -> NamespaceId {
        self.namespace
    }

    /// Returns the title in storage form.
    #[must_use]
    pub fn db_key(&self) -> &str {
        self.db_key.as_str()
    }

    /// Returns the current revision of the page.
    #[must_use]
    pub fn latest_revision_id(&self) -> RevisionId {
        self.latest_revision_id
    }

    /// Returns the human-readable title including the namespace prefix.
    ///
    /// `namespace_text` is the registry display text for the page namespace;
    /// an empty value means the main namespace and yields no prefix.
    #[must_use]
    pub fn full_text(&self, namespace_text: &str) -> String {
        let title = self.db_key.replace('_', " ");
        if namespace_text.is_empty() {
            return title;
        }

        format!("{}:{title}", namespace_text.replace('_', " "))
    }
}
