use std::env;

use wikiapprove_application::{DEFAULT_SWEEP_BATCH_SIZE, NAMESPACE_LIST_SEPARATOR};
use wikiapprove_core::{AppError, AppResult};
use wikiapprove_domain::{ApprovabilityRules, Approver, NamespaceId};
use wikiapprove_infrastructure::ConfiguredNamespaceRegistry;

use crate::sweep_cli::SweepCli;

#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub batch_size: usize,
    pub approver: Approver,
    pub approvability_rules: ApprovabilityRules,
    pub project_namespace: Option<String>,
    pub extra_namespaces: Vec<(NamespaceId, String)>,
}

impl SweepConfig {
    pub fn load(cli: &SweepCli) -> AppResult<Self> {
        let database_url = required_env("DATABASE_URL")?;
        let max_connections = parse_env_u32("DATABASE_MAX_CONNECTIONS", 2)?;
        let batch_size = match cli.batch_size {
            Some(batch_size) => batch_size,
            None => parse_env_usize("SWEEP_BATCH_SIZE", DEFAULT_SWEEP_BATCH_SIZE)?,
        };
        let approver = match cli.approver.as_deref() {
            Some(name) => Approver::from_account_name(Some(name)),
            None => Approver::from_account_name(env::var("SWEEP_APPROVER").ok().as_deref()),
        };

        let enabled_namespaces = match optional_env("APPROVED_REVS_ENABLED_NAMESPACES") {
            Some(value) => parse_namespace_indexes(value.as_str())?,
            None => ApprovabilityRules::default_enabled_namespaces().to_vec(),
        };
        let selected_categories = optional_env("APPROVED_REVS_SELECTED_CATEGORIES")
            .map(|value| split_list(value.as_str()))
            .unwrap_or_default();
        let project_namespace = optional_env("WIKI_PROJECT_NAMESPACE");
        let extra_namespaces = match optional_env("WIKI_EXTRA_NAMESPACES") {
            Some(value) => parse_namespace_definitions(value.as_str())?,
            None => Vec::new(),
        };

        if max_connections == 0 {
            return Err(AppError::Validation(
                "DATABASE_MAX_CONNECTIONS must be greater than zero".to_owned(),
            ));
        }

        if batch_size == 0 {
            return Err(AppError::Validation(
                "batch size must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            database_url,
            max_connections,
            batch_size,
            approver,
            approvability_rules: ApprovabilityRules::new(enabled_namespaces, selected_categories),
            project_namespace,
            extra_namespaces,
        })
    }

    pub fn namespace_registry(&self) -> AppResult<ConfiguredNamespaceRegistry> {
        let mut registry = ConfiguredNamespaceRegistry::canonical();
        if let Some(project_namespace) = &self.project_namespace {
            registry = registry.with_project_name(project_namespace.as_str())?;
        }

        for (namespace, text) in &self.extra_namespaces {
            registry = registry.with_namespace(*namespace, text.as_str())?;
        }

        Ok(registry)
    }
}

#[cfg(test)]
impl SweepConfig {
    pub(crate) fn with_database_url(database_url: &str) -> Self {
        Self {
            database_url: database_url.to_owned(),
            max_connections: 1,
            batch_size: DEFAULT_SWEEP_BATCH_SIZE,
            approver: Approver::Anonymous,
            approvability_rules: ApprovabilityRules::default(),
            project_namespace: None,
            extra_namespaces: Vec::new(),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(NAMESPACE_LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_namespace_indexes(value: &str) -> AppResult<Vec<NamespaceId>> {
    split_list(value)
        .into_iter()
        .map(|item| {
            item.parse::<i32>().map(NamespaceId::new).map_err(|error| {
                AppError::Validation(format!(
                    "invalid APPROVED_REVS_ENABLED_NAMESPACES entry '{item}': {error}"
                ))
            })
        })
        .collect()
}

fn parse_namespace_definitions(value: &str) -> AppResult<Vec<(NamespaceId, String)>> {
    split_list(value)
        .into_iter()
        .map(|item| {
            let Some((index, name)) = item.split_once('=') else {
                return Err(AppError::Validation(format!(
                    "invalid WIKI_EXTRA_NAMESPACES entry '{item}': expected INDEX=Name"
                )));
            };

            let index = index.trim().parse::<i32>().map_err(|error| {
                AppError::Validation(format!(
                    "invalid WIKI_EXTRA_NAMESPACES index in '{item}': {error}"
                ))
            })?;

            Ok((NamespaceId::new(index), name.trim().to_owned()))
        })
        .collect()
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_env_usize(name: &str, default: usize) -> AppResult<usize> {
    match env::var(name) {
        Ok(value) => value.parse::<usize>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> AppResult<u32> {
    match env::var(name) {
        Ok(value) => value.parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
