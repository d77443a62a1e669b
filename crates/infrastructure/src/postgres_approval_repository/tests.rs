use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use wikiapprove_application::{
    ApprovabilityPolicy, ApprovalRepository, ApprovedRevisionWrite, PageRepository,
};
use wikiapprove_core::AppError;
use wikiapprove_domain::{ApprovabilityRules, Approver, NamespaceId, PageId, RevisionId, WikiPage};

use super::PostgresApprovalRepository;
use crate::{PostgresApprovabilityPolicy, PostgresPageRepository};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres approval tests: {error}");
    }

    Some(pool)
}

fn test_page_id(offset: i64) -> i64 {
    i64::from(std::process::id()) * 1_000 + offset
}

async fn insert_page(pool: &PgPool, page: &WikiPage) {
    let insert = sqlx::query(
        r#"
        INSERT INTO wiki_pages (page_id, namespace_id, title, latest_revision_id)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (page_id) DO UPDATE
        SET namespace_id = EXCLUDED.namespace_id,
            title = EXCLUDED.title,
            latest_revision_id = EXCLUDED.latest_revision_id
        "#,
    )
    .bind(page.page_id().as_i64())
    .bind(page.namespace().as_i32())
    .bind(page.db_key())
    .bind(page.latest_revision_id().as_i64())
    .execute(pool)
    .await;

    assert!(insert.is_ok());

    let reset = sqlx::query("DELETE FROM approved_revisions WHERE page_id = $1")
        .bind(page.page_id().as_i64())
        .execute(pool)
        .await;
    assert!(reset.is_ok());
}

fn test_page(offset: i64, namespace: i32, latest: i64) -> WikiPage {
    let page_id = test_page_id(offset);
    WikiPage::new(
        PageId::new(page_id),
        NamespaceId::new(namespace),
        format!("Approval_test_{page_id}"),
        RevisionId::new(latest),
    )
}

#[tokio::test]
async fn approval_upsert_overwrites_previous_revision() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresApprovalRepository::new(pool.clone());
    assert!(repository.ensure_available().await.is_ok());

    let page = test_page(1, 0, 12);
    insert_page(&pool, &page).await;
    assert!(matches!(
        repository.find_approved_revision(page.page_id()).await,
        Ok(None)
    ));

    for revision_id in [10, 12] {
        let write = repository
            .set_approved_revision(ApprovedRevisionWrite {
                page: page.clone(),
                revision_id: RevisionId::new(revision_id),
                approver: Approver::from_account_name(Some("Maintenance script")),
                is_latest: revision_id == 12,
                notify_watchers: false,
            })
            .await;
        assert!(write.is_ok());
    }

    let approved = repository.find_approved_revision(page.page_id()).await;
    assert!(matches!(approved, Ok(Some(revision_id)) if revision_id == RevisionId::new(12)));

    let approved_by = sqlx::query_scalar::<_, Option<String>>(
        "SELECT approved_by FROM approved_revisions WHERE page_id = $1",
    )
    .bind(page.page_id().as_i64())
    .fetch_one(&pool)
    .await;
    assert!(matches!(approved_by, Ok(Some(name)) if name == "Maintenance script"));
}

#[tokio::test]
async fn notification_requests_are_rejected_without_writing() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresApprovalRepository::new(pool.clone());
    let page = test_page(2, 0, 3);
    insert_page(&pool, &page).await;

    let write = repository
        .set_approved_revision(ApprovedRevisionWrite {
            page: page.clone(),
            revision_id: RevisionId::new(3),
            approver: Approver::Anonymous,
            is_latest: true,
            notify_watchers: true,
        })
        .await;

    assert!(matches!(write, Err(AppError::Validation(_))));
    assert!(matches!(
        repository.find_approved_revision(page.page_id()).await,
        Ok(None)
    ));
}

#[tokio::test]
async fn page_enumeration_uses_keyset_cursor() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresPageRepository::new(pool.clone());
    let pages = [test_page(10, 0, 1), test_page(11, 1, 2), test_page(12, 12, 3)];
    for page in &pages {
        insert_page(&pool, page).await;
    }

    let batch = repository
        .list_pages_after(Some(PageId::new(test_page_id(10))), 1)
        .await;
    assert!(batch.is_ok());
    let batch = batch.unwrap_or_default();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].page_id, pages[1].page_id());
    assert_eq!(batch[0].namespace, NamespaceId::new(1));

    let found = repository.find_page(pages[2].page_id()).await;
    assert!(matches!(found, Ok(Some(page)) if page == pages[2]));

    let missing = repository.find_page(PageId::new(-test_page_id(99))).await;
    assert!(matches!(missing, Ok(None)));
}

#[tokio::test]
async fn approvability_reads_property_and_categories() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let policy = PostgresApprovabilityPolicy::new(
        pool.clone(),
        ApprovabilityRules::new([NamespaceId::MAIN], vec!["Reviewed".to_owned()]),
    );
    let enabled = test_page(20, 0, 1);
    let opted_in = test_page(21, 1, 1);
    let categorized = test_page(22, 1, 1);
    let plain = test_page(23, 1, 1);
    for page in [&enabled, &opted_in, &categorized, &plain] {
        insert_page(&pool, page).await;
    }

    let property = sqlx::query(
        "INSERT INTO wiki_page_properties (page_id, name) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(opted_in.page_id().as_i64())
    .bind(ApprovabilityRules::OPT_IN_PROPERTY)
    .execute(&pool)
    .await;
    assert!(property.is_ok());

    let category = sqlx::query(
        "INSERT INTO wiki_page_categories (page_id, category) VALUES ($1, 'Reviewed') ON CONFLICT DO NOTHING",
    )
    .bind(categorized.page_id().as_i64())
    .execute(&pool)
    .await;
    assert!(category.is_ok());

    assert!(matches!(policy.page_is_approvable(&enabled).await, Ok(true)));
    assert!(matches!(policy.page_is_approvable(&opted_in).await, Ok(true)));
    assert!(matches!(policy.page_is_approvable(&categorized).await, Ok(true)));
    assert!(matches!(policy.page_is_approvable(&plain).await, Ok(false)));
}
