//! Namespace registry built from the platform's canonical table plus site configuration.

use std::collections::{BTreeMap, HashMap};

use wikiapprove_application::NamespaceRegistry;
use wikiapprove_core::{AppError, AppResult};
use wikiapprove_domain::NamespaceId;

const CANONICAL_NAMESPACES: &[(i32, &str)] = &[
    (-2, "Media"),
    (-1, "Special"),
    (0, ""),
    (1, "Talk"),
    (2, "User"),
    (3, "User_talk"),
    (4, "Project"),
    (5, "Project_talk"),
    (6, "File"),
    (7, "File_talk"),
    (8, "MediaWiki"),
    (9, "MediaWiki_talk"),
    (10, "Template"),
    (11, "Template_talk"),
    (12, "Help"),
    (13, "Help_talk"),
    (14, "Category"),
    (15, "Category_talk"),
];

const CANONICAL_ALIASES: &[(&str, i32)] = &[
    ("Main", 0),
    ("(Main)", 0),
    ("Image", 6),
    ("Image_talk", 7),
];

/// In-process namespace table.
#[derive(Debug, Clone)]
pub struct ConfiguredNamespaceRegistry {
    names: HashMap<String, NamespaceId>,
    texts: BTreeMap<NamespaceId, String>,
}

impl ConfiguredNamespaceRegistry {
    /// Creates a registry holding only the canonical namespaces.
    #[must_use]
    pub fn canonical() -> Self {
        let mut registry = Self {
            names: HashMap::new(),
            texts: BTreeMap::new(),
        };

        for (index, text) in CANONICAL_NAMESPACES {
            let namespace = NamespaceId::new(*index);
            registry.names.insert(normalize_name(text), namespace);
            registry.texts.insert(namespace, (*text).to_owned());
        }

        for (alias, index) in CANONICAL_ALIASES {
            registry
                .names
                .insert(normalize_name(alias), NamespaceId::new(*index));
        }

        registry
    }

    /// Names the project namespace after the site, keeping `Project` as an alias.
    pub fn with_project_name(mut self, site_name: &str) -> AppResult<Self> {
        let site_name = site_name.trim().replace(' ', "_");
        if site_name.is_empty() {
            return Err(AppError::Validation(
                "project namespace name must not be empty".to_owned(),
            ));
        }

        let talk_name = format!("{site_name}_talk");
        for (text, index) in [(site_name, 4), (talk_name, 5)] {
            let namespace = NamespaceId::new(index);
            self.claim_name(text.as_str(), namespace)?;
            self.texts.insert(namespace, text);
        }

        Ok(self)
    }

    /// Registers an extension-defined namespace.
    pub fn with_namespace(mut self, namespace: NamespaceId, text: &str) -> AppResult<Self> {
        let text = text.trim().replace(' ', "_");
        if text.is_empty() {
            return Err(AppError::Validation(format!(
                "namespace {namespace} must have a non-empty name"
            )));
        }

        if self.texts.contains_key(&namespace) {
            return Err(AppError::Validation(format!(
                "namespace index {namespace} is already defined"
            )));
        }

        self.claim_name(text.as_str(), namespace)?;
        self.texts.insert(namespace, text);
        Ok(self)
    }

    fn claim_name(&mut self, text: &str, namespace: NamespaceId) -> AppResult<()> {
        let key = normalize_name(text);
        match self.names.get(&key) {
            Some(existing) if *existing != namespace => Err(AppError::Validation(format!(
                "namespace name '{text}' is already used by namespace {existing}"
            ))),
            _ => {
                self.names.insert(key, namespace);
                Ok(())
            }
        }
    }
}

impl Default for ConfiguredNamespaceRegistry {
    fn default() -> Self {
        Self::canonical()
    }
}

impl NamespaceRegistry for ConfiguredNamespaceRegistry {
    fn index_for_name(&self, name: &str) -> Option<NamespaceId> {
        self.names.get(&normalize_name(name)).copied()
    }

    fn text_for_index(&self, namespace: NamespaceId) -> Option<String> {
        self.texts.get(&namespace).cloned()
    }
}

fn normalize_name(name: &str) -> String {
    name.replace(' ', "_").to_lowercase()
}

#[cfg(test)]
mod tests {
    use wikiapprove_application::NamespaceRegistry;
    use wikiapprove_core::AppError;
    use wikiapprove_domain::NamespaceId;

    use super::ConfiguredNamespaceRegistry;

    #[test]
    fn canonical_names_resolve_case_and_space_insensitively() {
        let registry = ConfiguredNamespaceRegistry::canonical();

        assert_eq!(registry.index_for_name("User talk"), Some(NamespaceId::new(3)));
        assert_eq!(registry.index_for_name("user_TALK"), Some(NamespaceId::new(3)));
        assert_eq!(registry.index_for_name("Image"), Some(NamespaceId::new(6)));
        assert_eq!(registry.index_for_name("(Main)"), Some(NamespaceId::MAIN));
        assert_eq!(registry.index_for_name("NotARealNamespace"), None);
        assert_eq!(registry.index_for_name(" Talk"), None);
    }

    #[test]
    fn main_namespace_has_empty_display_text() {
        let registry = ConfiguredNamespaceRegistry::canonical();

        assert_eq!(registry.text_for_index(NamespaceId::MAIN), Some(String::new()));
        assert_eq!(registry.text_for_index(NamespaceId::new(99)), None);
    }

    #[test]
    fn project_name_replaces_display_text_and_keeps_alias() {
        let registry = ConfiguredNamespaceRegistry::canonical().with_project_name("Acme Wiki");
        assert!(registry.is_ok());
        let registry = registry.unwrap_or_default();

        assert_eq!(
            registry.text_for_index(NamespaceId::new(4)),
            Some("Acme_Wiki".to_owned())
        );
        assert_eq!(registry.index_for_name("Acme Wiki talk"), Some(NamespaceId::new(5)));
        assert_eq!(registry.index_for_name("Project"), Some(NamespaceId::new(4)));
    }

    #[test]
    fn extra_namespaces_are_registered() {
        let registry = ConfiguredNamespaceRegistry::canonical()
            .with_namespace(NamespaceId::new(3000), "Recipe")
            .and_then(|registry| registry.with_namespace(NamespaceId::new(3001), "Recipe talk"));
        assert!(registry.is_ok());
        let registry = registry.unwrap_or_default();

        assert_eq!(registry.index_for_name("recipe"), Some(NamespaceId::new(3000)));
        assert_eq!(
            registry.text_for_index(NamespaceId::new(3001)),
            Some("Recipe_talk".to_owned())
        );
    }

    #[test]
    fn conflicting_definitions_are_configuration_errors() {
        let registry = ConfiguredNamespaceRegistry::canonical();

        let taken_index = registry
            .clone()
            .with_namespace(NamespaceId::new(2), "People")
            .err();
        let taken_name = registry
            .clone()
            .with_namespace(NamespaceId::new(3000), "Help")
            .err();
        let taken_project_name = registry.with_project_name("Template").err();

        for error in [taken_index, taken_name, taken_project_name] {
            assert!(matches!(&error, Some(AppError::Validation(_))));
            assert!(error.is_some_and(|error| error.is_configuration()));
        }
    }
}
