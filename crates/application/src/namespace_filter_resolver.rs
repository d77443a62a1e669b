//! Resolution of user-supplied namespace lists into a [`NamespaceFilter`].

use std::sync::Arc;

use wikiapprove_core::{AppError, AppResult};
use wikiapprove_domain::{NamespaceFilter, NamespaceId};

use crate::approval_ports::NamespaceRegistry;

/// Separator used between namespaces on the command line.
pub const NAMESPACE_LIST_SEPARATOR: char = '|';

/// Turns namespace names or indexes into a filter, validating every token.
#[derive(Clone)]
pub struct NamespaceFilterResolver {
    registry: Arc<dyn NamespaceRegistry>,
}

impl NamespaceFilterResolver {
    /// Creates a resolver backed by the platform namespace registry.
    #[must_use]
    pub fn new(registry: Arc<dyn NamespaceRegistry>) -> Self {
        Self { registry }
    }

    /// Resolves a raw pipe-separated list; `None` or a blank value means no filter.
    pub fn resolve_list(&self, raw: Option<&str>) -> AppResult<NamespaceFilter> {
        let Some(raw) = raw else {
            return Ok(NamespaceFilter::All);
        };

        self.resolve(raw.split(NAMESPACE_LIST_SEPARATOR))
    }

    /// Resolves tokens into a deduplicated filter.
    ///
    /// Blank tokens are ignored; other tokens are resolved exactly as given.
    /// Fails on the first token that is neither a known namespace name nor a
    /// known namespace index.
    pub fn resolve<I, S>(&self, tokens: I) -> AppResult<NamespaceFilter>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut namespaces = Vec::new();
        for token in tokens {
            let token = token.as_ref();
            if token.trim().is_empty() {
                continue;
            }

            namespaces.push(self.resolve_token(token)?);
        }

        Ok(NamespaceFilter::from_namespaces(namespaces))
    }

    /// Resolves one namespace name or index.
    pub fn resolve_token(&self, token: &str) -> AppResult<NamespaceId> {
        if let Some(namespace) = self.registry.index_for_name(token) {
            return Ok(namespace);
        }

        if let Ok(index) = token.parse::<i32>() {
            let namespace = NamespaceId::new(index);
            if index.to_string() == token && self.registry.text_for_index(namespace).is_some() {
                return Ok(namespace);
            }
        }

        Err(AppError::Validation(format!(
            "Unknown namespace text / index specified: {token}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use proptest::prelude::*;
    use wikiapprove_core::AppError;
    use wikiapprove_domain::{NamespaceFilter, NamespaceId};

    use super::NamespaceFilterResolver;
    use crate::approval_ports::NamespaceRegistry;

    struct FakeNamespaceRegistry {
        names: HashMap<String, NamespaceId>,
    }

    impl FakeNamespaceRegistry {
        fn standard() -> Self {
            let names = [("", 0), ("talk", 1), ("user", 2), ("user_talk", 3), ("help", 12)]
                .into_iter()
                .map(|(name, index)| (name.to_owned(), NamespaceId::new(index)))
                .collect();

            Self { names }
        }
    }

    impl NamespaceRegistry for FakeNamespaceRegistry {
        fn index_for_name(&self, name: &str) -> Option<NamespaceId> {
            self.names
                .get(name.to_lowercase().replace(' ', "_").as_str())
                .copied()
        }

        fn text_for_index(&self, namespace: NamespaceId) -> Option<String> {
            self.names
                .iter()
                .find(|(_, index)| **index == namespace)
                .map(|(name, _)| name.clone())
        }
    }

    fn resolver() -> NamespaceFilterResolver {
        NamespaceFilterResolver::new(Arc::new(FakeNamespaceRegistry::standard()))
    }

    fn only(indexes: &[i32]) -> NamespaceFilter {
        NamespaceFilter::from_namespaces(indexes.iter().copied().map(NamespaceId::new))
    }

    #[test]
    fn names_and_indexes_resolve_to_the_same_set() {
        let resolved = resolver().resolve(["Talk", "0"]);
        assert!(matches!(resolved, Ok(filter) if filter == only(&[0, 1])));
    }

    #[test]
    fn resolution_ignores_token_order_and_duplicates() {
        let resolver = resolver();
        let forward = resolver.resolve(["Talk", "0"]).ok();
        let backward = resolver.resolve(["0", "Talk", "talk", "1"]).ok();

        assert!(forward.is_some());
        assert_eq!(forward, backward);
    }

    #[test]
    fn missing_or_blank_list_means_no_filter() {
        let resolver = resolver();

        assert!(matches!(resolver.resolve_list(None), Ok(NamespaceFilter::All)));
        assert!(matches!(resolver.resolve_list(Some("")), Ok(NamespaceFilter::All)));
        assert!(matches!(resolver.resolve_list(Some(" | ")), Ok(NamespaceFilter::All)));
    }

    #[test]
    fn pipe_separated_list_is_split() {
        let resolved = resolver().resolve_list(Some("User talk|Help"));
        assert!(matches!(resolved, Ok(filter) if filter == only(&[3, 12])));
    }

    #[test]
    fn unknown_name_is_rejected_with_token() {
        let resolved = resolver().resolve(["Talk", "NotARealNamespace"]);

        match resolved {
            Err(AppError::Validation(message)) => {
                assert!(message.contains("NotARealNamespace"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_index_is_rejected() {
        assert!(resolver().resolve(["42"]).is_err());
    }

    #[test]
    fn non_canonical_integer_form_is_rejected() {
        assert!(resolver().resolve(["01"]).is_err());
        assert!(resolver().resolve(["+2"]).is_err());
    }

    #[test]
    fn padded_tokens_are_not_trimmed() {
        let resolver = resolver();

        for token in [" 1", "1 ", "Talk ", " Talk"] {
            let resolved = resolver.resolve([token]);
            assert!(
                matches!(&resolved, Err(AppError::Validation(message)) if message.ends_with(token)),
                "token {token:?} resolved to {resolved:?}"
            );
        }
        assert!(resolver.resolve_list(Some("Talk| 0")).is_err());
    }

    proptest! {
        #[test]
        fn resolution_is_order_independent(
            tokens in proptest::collection::vec(
                prop::sample::select(vec!["Talk", "talk", "0", "1", "User", "2", "user_talk", "12"]),
                0..8,
            )
        ) {
            let resolver = resolver();
            let mut reversed = tokens.clone();
            reversed.reverse();

            let forward = resolver.resolve(tokens.iter()).ok();
            let backward = resolver.resolve(reversed.iter()).ok();
            let repeated = resolver.resolve(tokens.iter().chain(tokens.iter())).ok();

            prop_assert!(forward.is_some());
            prop_assert_eq!(&forward, &backward);
            prop_assert_eq!(&forward, &repeated);
        }
    }
}
