use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use wikiapprove_application::PageRepository;
use wikiapprove_core::{AppError, AppResult};
use wikiapprove_domain::{NamespaceId, PageId, PageSummary, RevisionId, WikiPage};

/// PostgreSQL-backed read access to wiki pages.
#[derive(Clone)]
pub struct PostgresPageRepository {
    pool: PgPool,
}

impl PostgresPageRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PageSummaryRow {
    page_id: i64,
    namespace_id: i32,
    latest_revision_id: i64,
}

#[derive(Debug, FromRow)]
struct PageRow {
    page_id: i64,
    namespace_id: i32,
    title: String,
    latest_revision_id: i64,
}

#[async_trait]
impl PageRepository for PostgresPageRepository {
    async fn list_pages_after(
        &self,
        after: Option<PageId>,
        limit: usize,
    ) -> AppResult<Vec<PageSummary>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, PageSummaryRow>(
            r#"
            SELECT page_id, namespace_id, latest_revision_id
            FROM wiki_pages
            WHERE ($1::BIGINT IS NULL OR page_id > $1)
            ORDER BY page_id
            LIMIT $2
            "#,
        )
        .bind(after.map(|page_id| page_id.as_i64()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list wiki pages: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| PageSummary {
                page_id: PageId::new(row.page_id),
                latest_revision_id: RevisionId::new(row.latest_revision_id),
                namespace: NamespaceId::new(row.namespace_id),
            })
            .collect())
    }

    async fn find_page(&self, page_id: PageId) -> AppResult<Option<WikiPage>> {
        let row = sqlx::query_as::<_, PageRow>(
            r#"
            SELECT page_id, namespace_id, title, latest_revision_id
            FROM wiki_pages
            WHERE page_id = $1
            "#,
        )
        .bind(page_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find wiki page '{page_id}': {error}"))
        })?;

        Ok(row.map(|row| {
            WikiPage::new(
                PageId::new(row.page_id),
                NamespaceId::new(row.namespace_id),
                row.title,
                RevisionId::new(row.latest_revision_id),
            )
        }))
    }
}
