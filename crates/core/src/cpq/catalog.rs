use async_trait::async_trait;
use thiserror::Error;

use crate::domain::catalog::{CatalogItem, CatalogItemId};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog source unavailable: {0}")]
    Unavailable(String),
    #[error("catalog entry could not be decoded: {0}")]
    Decode(String),
}

/// Source of purchasable services. Implementations own retry and caching.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, CatalogError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    pub fn find(&self, item_id: &CatalogItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| &item.id == item_id)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Outcome of a catalog fetch. A failed fetch still yields a usable (empty)
/// catalog; the error is handed back for the caller to report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogLoad {
    pub catalog: Catalog,
    pub error: Option<CatalogError>,
}

pub async fn load_catalog<P>(provider: &P) -> CatalogLoad
where
    P: CatalogProvider + ?Sized,
{
    match provider.fetch_catalog().await {
        Ok(items) => CatalogLoad { catalog: Catalog::new(items), error: None },
        Err(error) => CatalogLoad { catalog: Catalog::default(), error: Some(error) },
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::domain::catalog::{CatalogItem, CatalogItemId};

    use super::{load_catalog, Catalog, CatalogError, CatalogProvider};

    struct FixedProvider(Vec<CatalogItem>);

    #[async_trait]
    impl CatalogProvider for FixedProvider {
        async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, CatalogError> {
            Ok(self.0.clone())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl CatalogProvider for FailingProvider {
        async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn successful_fetch_preserves_provider_order() {
        let provider = FixedProvider(vec![
            CatalogItem::new("svc-ads", "Advertising", 40),
            CatalogItem::new("svc-brand", "Branding", 25),
        ]);

        let load = load_catalog(&provider).await;

        assert!(load.error.is_none());
        let ids: Vec<_> = load.catalog.items().iter().map(|item| item.id.0.as_str()).collect();
        assert_eq!(ids, vec!["svc-ads", "svc-brand"]);
    }

    #[tokio::test]
    async fn failed_fetch_yields_empty_catalog_and_reports_error() {
        let load = load_catalog(&FailingProvider).await;

        assert!(load.catalog.is_empty());
        assert_eq!(
            load.error,
            Some(CatalogError::Unavailable("connection refused".to_string()))
        );
    }

    #[test]
    fn find_returns_matching_item() {
        let catalog = Catalog::new(vec![CatalogItem::new("svc-web", "Website", 60)]);

        let web = catalog.find(&CatalogItemId("svc-web".to_string()));
        assert_eq!(web.map(|item| item.credits), Some(60));
        assert!(catalog.find(&CatalogItemId("svc-missing".to_string())).is_none());
    }
}
