use async_trait::async_trait;
use thiserror::Error;

use creditsim_core::cpq::catalog::CatalogError;
use creditsim_core::domain::catalog::{CatalogItem, CatalogItemId};

pub mod catalog;
pub mod memory;

pub use catalog::SqlCatalogRepository;
pub use memory::InMemoryCatalogRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for CatalogError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Database(source) => CatalogError::Unavailable(source.to_string()),
            RepositoryError::Decode(message) => CatalogError::Decode(message),
        }
    }
}

/// Storage for the service catalog. Listings are ordered by name.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<CatalogItem>, RepositoryError>;
    async fn find_by_id(&self, id: &CatalogItemId) -> Result<Option<CatalogItem>, RepositoryError>;
    async fn save(&self, item: CatalogItem) -> Result<(), RepositoryError>;
}
