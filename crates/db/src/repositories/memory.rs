use async_trait::async_trait;
use tokio::sync::RwLock;

use creditsim_core::cpq::catalog::{CatalogError, CatalogProvider};
use creditsim_core::domain::catalog::{CatalogItem, CatalogItemId};

use super::{CatalogRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryCatalogRepository {
    items: RwLock<Vec<CatalogItem>>,
}

impl InMemoryCatalogRepository {
    pub fn with_items(items: Vec<CatalogItem>) -> Self {
        Self { items: RwLock::new(items) }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list(&self) -> Result<Vec<CatalogItem>, RepositoryError> {
        let mut items = self.items.read().await.clone();
        items.sort_by(|left, right| left.name.cmp(&right.name).then(left.id.0.cmp(&right.id.0)));
        Ok(items)
    }

    async fn find_by_id(&self, id: &CatalogItemId) -> Result<Option<CatalogItem>, RepositoryError> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| &item.id == id).cloned())
    }

    async fn save(&self, item: CatalogItem) -> Result<(), RepositoryError> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogProvider for InMemoryCatalogRepository {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        Ok(self.list().await?)
    }
}
