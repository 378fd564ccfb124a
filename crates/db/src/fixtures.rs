use creditsim_core::domain::catalog::{CatalogItem, CatalogItemId};

use crate::connection::DbPool;
use crate::repositories::{CatalogRepository, RepositoryError, SqlCatalogRepository};

/// Demo services used by `creditsim seed` and by tests that need a catalog.
const DEMO_SERVICES: &[(&str, &str, u32)] = &[
    ("svc-ads", "Advertising campaign", 40),
    ("svc-brand", "Brand identity", 25),
    ("svc-content", "Content production", 15),
    ("svc-seo", "SEO audit", 10),
    ("svc-social", "Social media management", 20),
    ("svc-web", "Website redesign", 60),
];

pub struct DemoCatalog;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub items_seeded: Vec<CatalogItemId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}

impl DemoCatalog {
    pub fn items() -> Vec<CatalogItem> {
        DEMO_SERVICES
            .iter()
            .map(|(id, name, credits)| CatalogItem::new(*id, *name, *credits))
            .collect()
    }

    /// Upserts the demo services; running it twice leaves the same rows.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let repo = SqlCatalogRepository::new(pool.clone());
        let mut items_seeded = Vec::with_capacity(DEMO_SERVICES.len());

        for item in Self::items() {
            items_seeded.push(item.id.clone());
            repo.save(item).await?;
        }

        tracing::info!(
            event_name = "db.fixtures.demo_catalog_loaded",
            item_count = items_seeded.len(),
            "demo catalog seeded"
        );
        Ok(SeedResult { items_seeded })
    }

    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let repo = SqlCatalogRepository::new(pool.clone());
        let mut checks = Vec::with_capacity(DEMO_SERVICES.len());

        for (id, name, credits) in DEMO_SERVICES {
            let found = repo.find_by_id(&CatalogItemId((*id).to_string())).await?;
            let matches =
                found.is_some_and(|item| item.name == *name && item.credits == *credits);
            checks.push((*id, matches));
        }

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(VerificationResult { all_present, checks })
    }
}
