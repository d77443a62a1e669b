use wikiapprove_domain::NamespaceId;

/// Platform namespace name table.
pub trait NamespaceRegistry: Send + Sync {
    /// Resolves a namespace name or alias to its index.
    fn index_for_name(&self, name: &str) -> Option<NamespaceId>;

    /// Returns the display text for a namespace index.
    ///
    /// The main namespace has empty display text; unknown indexes yield `None`.
    fn text_for_index(&self, namespace: NamespaceId) -> Option<String>;
}
