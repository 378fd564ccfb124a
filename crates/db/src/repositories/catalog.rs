use async_trait::async_trait;
use sqlx::Row;

use creditsim_core::cpq::catalog::{CatalogError, CatalogProvider};
use creditsim_core::domain::catalog::{CatalogItem, CatalogItemId};

use super::{CatalogRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCatalogRepository {
    pool: DbPool,
}

impl SqlCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for SqlCatalogRepository {
    async fn list(&self) -> Result<Vec<CatalogItem>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, credits FROM service_catalog ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(decode_row).collect()
    }

    async fn find_by_id(&self, id: &CatalogItemId) -> Result<Option<CatalogItem>, RepositoryError> {
        let row = sqlx::query("SELECT id, name, credits FROM service_catalog WHERE id = ?1")
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode_row).transpose()
    }

    async fn save(&self, item: CatalogItem) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO service_catalog (id, name, credits) VALUES (?1, ?2, ?3) \
             ON CONFLICT(id) DO UPDATE SET \
                name = excluded.name, \
                credits = excluded.credits, \
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        )
        .bind(&item.id.0)
        .bind(&item.name)
        .bind(i64::from(item.credits))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CatalogProvider for SqlCatalogRepository {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        let items = self.list().await?;
        tracing::debug!(
            event_name = "db.catalog.fetched",
            item_count = items.len(),
            "service catalog fetched"
        );
        Ok(items)
    }
}

fn decode_row(row: &sqlx::sqlite::SqliteRow) -> Result<CatalogItem, RepositoryError> {
    let id: String = row.try_get("id")?;
    let name: String = row.try_get("name")?;
    let credits: i64 = row.try_get("credits")?;
    let credits = u32::try_from(credits).map_err(|_| {
        RepositoryError::Decode(format!("catalog item `{id}` has out-of-range credits {credits}"))
    })?;

    Ok(CatalogItem { id: CatalogItemId(id), name, credits })
}

#[cfg(test)]
mod tests {
    use creditsim_core::cpq::catalog::{load_catalog, CatalogError, CatalogProvider};
    use creditsim_core::domain::catalog::{CatalogItem, CatalogItemId};

    use super::SqlCatalogRepository;
    use crate::repositories::CatalogRepository;
    use crate::{connect_with_settings, migrations, DbPool};

    async fn migrated_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        pool
    }

    #[tokio::test]
    async fn list_is_ordered_by_name() {
        let repo = SqlCatalogRepository::new(migrated_pool().await);
        repo.save(CatalogItem::new("svc-web", "Website", 60)).await.expect("save web");
        repo.save(CatalogItem::new("svc-ads", "Advertising", 40)).await.expect("save ads");
        repo.save(CatalogItem::new("svc-brand", "Branding", 25)).await.expect("save brand");

        let names: Vec<String> =
            repo.list().await.expect("list").into_iter().map(|item| item.name).collect();

        assert_eq!(names, vec!["Advertising", "Branding", "Website"]);
    }

    #[tokio::test]
    async fn save_upserts_existing_item() {
        let repo = SqlCatalogRepository::new(migrated_pool().await);
        repo.save(CatalogItem::new("svc-seo", "SEO audit", 10)).await.expect("insert");
        repo.save(CatalogItem::new("svc-seo", "SEO audit plus", 14)).await.expect("update");

        let found = repo
            .find_by_id(&CatalogItemId("svc-seo".to_string()))
            .await
            .expect("find")
            .expect("item should exist");

        assert_eq!(found, CatalogItem::new("svc-seo", "SEO audit plus", 14));
        assert_eq!(repo.list().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown_item() {
        let repo = SqlCatalogRepository::new(migrated_pool().await);

        let found =
            repo.find_by_id(&CatalogItemId("svc-missing".to_string())).await.expect("find");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn negative_credits_fail_to_decode() {
        let pool = migrated_pool().await;
        sqlx::query("INSERT INTO service_catalog (id, name, credits) VALUES ('svc-bad', 'Bad', 5)")
            .execute(&pool)
            .await
            .expect("insert");
        // bypass the CHECK constraint the way a hand-edited database would
        sqlx::query("PRAGMA ignore_check_constraints = ON").execute(&pool).await.expect("pragma");
        sqlx::query("UPDATE service_catalog SET credits = -5 WHERE id = 'svc-bad'")
            .execute(&pool)
            .await
            .expect("update");

        let repo = SqlCatalogRepository::new(pool);
        let error = repo.fetch_catalog().await.expect_err("decode should fail");

        assert!(matches!(error, CatalogError::Decode(ref message) if message.contains("svc-bad")));
    }

    #[tokio::test]
    async fn missing_schema_degrades_to_empty_catalog() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        let repo = SqlCatalogRepository::new(pool);

        let load = load_catalog(&repo).await;

        assert!(load.catalog.is_empty());
        assert!(matches!(load.error, Some(CatalogError::Unavailable(_))));
    }
}
