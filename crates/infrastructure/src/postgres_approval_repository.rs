use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use wikiapprove_application::{ApprovalRepository, ApprovedRevisionWrite};
use wikiapprove_core::{AppError, AppResult};
use wikiapprove_domain::{PageId, RevisionId};

/// PostgreSQL-backed approval-record store.
#[derive(Clone)]
pub struct PostgresApprovalRepository {
    pool: PgPool,
}

impl PostgresApprovalRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApprovalRepository for PostgresApprovalRepository {
    async fn ensure_available(&self) -> AppResult<()> {
        let installed = sqlx::query_scalar::<_, bool>(
            "SELECT to_regclass('approved_revisions') IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to inspect approval store: {error}"))
        })?;

        if !installed {
            return Err(AppError::Unavailable(
                "the approved revisions store is not installed on this wiki".to_owned(),
            ));
        }

        Ok(())
    }

    async fn find_approved_revision(&self, page_id: PageId) -> AppResult<Option<RevisionId>> {
        let revision_id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT revision_id
            FROM approved_revisions
            WHERE page_id = $1
            "#,
        )
        .bind(page_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to read approved revision for page '{page_id}': {error}"
            ))
        })?;

        Ok(revision_id.map(RevisionId::new))
    }

    async fn set_approved_revision(&self, write: ApprovedRevisionWrite) -> AppResult<()> {
        let page_id = write.page.page_id();
        if write.notify_watchers {
            return Err(AppError::Validation(format!(
                "watcher notifications are not supported for approvals of page '{page_id}'"
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO approved_revisions (page_id, revision_id, approved_by, approved_latest, approved_at)
            VALUES ($1, $2, $3, $4, now())
            ON CONFLICT (page_id) DO UPDATE
            SET revision_id = EXCLUDED.revision_id,
                approved_by = EXCLUDED.approved_by,
                approved_latest = EXCLUDED.approved_latest,
                approved_at = EXCLUDED.approved_at
            "#,
        )
        .bind(page_id.as_i64())
        .bind(write.revision_id.as_i64())
        .bind(write.approver.account_name())
        .bind(write.is_latest)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to approve revision '{}' of page '{page_id}': {error}",
                write.revision_id
            ))
        })?;

        debug!(
            page_id = %page_id,
            revision_id = %write.revision_id,
            "stored approved revision"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests;
