use async_trait::async_trait;
use sqlx::PgPool;

use wikiapprove_application::ApprovabilityPolicy;
use wikiapprove_core::{AppError, AppResult};
use wikiapprove_domain::{ApprovabilityRules, PageApprovalFacts, WikiPage};

/// Approvability predicate reading page properties and categories from PostgreSQL.
#[derive(Clone)]
pub struct PostgresApprovabilityPolicy {
    pool: PgPool,
    rules: ApprovabilityRules,
}

impl PostgresApprovabilityPolicy {
    /// Creates a policy with the provided connection pool and site rules.
    #[must_use]
    pub fn new(pool: PgPool, rules: ApprovabilityRules) -> Self {
        Self { pool, rules }
    }
}

#[async_trait]
impl ApprovabilityPolicy for PostgresApprovabilityPolicy {
    async fn page_is_approvable(&self, page: &WikiPage) -> AppResult<bool> {
        if self.rules.namespace_is_enabled(page.namespace()) {
            return Ok(true);
        }

        if page.namespace().is_virtual() {
            return Ok(false);
        }

        let page_id = page.page_id();
        let has_opt_in_property = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM wiki_page_properties
                WHERE page_id = $1 AND name = $2
            )
            "#,
        )
        .bind(page_id.as_i64())
        .bind(ApprovabilityRules::OPT_IN_PROPERTY)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to read page properties of page '{page_id}': {error}"
            ))
        })?;

        let categories = if has_opt_in_property || self.rules.selected_categories().is_empty() {
            Vec::new()
        } else {
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT category
                FROM wiki_page_categories
                WHERE page_id = $1
                ORDER BY category
                "#,
            )
            .bind(page_id.as_i64())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to read categories of page '{page_id}': {error}"
                ))
            })?
        };

        Ok(self.rules.page_is_approvable(&PageApprovalFacts {
            namespace: page.namespace(),
            has_opt_in_property,
            categories,
        }))
    }
}
