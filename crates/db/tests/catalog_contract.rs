use creditsim_core::cpq::catalog::load_catalog;
use creditsim_core::cpq::simulator::BudgetSimulator;
use creditsim_core::domain::catalog::{CatalogItem, CatalogItemId};
use creditsim_db::{
    connect_with_settings, migrations, CatalogRepository, DbPool, DemoCatalog,
    InMemoryCatalogRepository, SqlCatalogRepository,
};
use rust_decimal::Decimal;

type ContractResult<T = ()> = Result<T, String>;

macro_rules! require {
    ($cond:expr) => {
        if !$cond {
            return Err(format!("assertion failed: `{}`", stringify!($cond)));
        }
    };
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left,
                $right
            ));
        }
    };
}

async fn migrated_pool() -> ContractResult<DbPool> {
    let pool = connect_with_settings("sqlite::memory:", 1, 5)
        .await
        .map_err(|error| format!("connect failed: {error}"))?;
    migrations::run_pending(&pool).await.map_err(|error| format!("migrate failed: {error}"))?;
    Ok(pool)
}

/// Behaviour every catalog store must share.
async fn check_repository_contract(repo: &dyn CatalogRepository) -> ContractResult {
    for item in [
        CatalogItem::new("svc-web", "Website", 60),
        CatalogItem::new("svc-ads", "Advertising", 40),
        CatalogItem::new("svc-brand", "Branding", 25),
    ] {
        repo.save(item).await.map_err(|error| error.to_string())?;
    }

    let names = repo
        .list()
        .await
        .map_err(|error| error.to_string())?
        .into_iter()
        .map(|item| item.name)
        .collect::<Vec<_>>();
    require_eq!(names, vec!["Advertising", "Branding", "Website"]);

    repo.save(CatalogItem::new("svc-web", "Website", 75)).await.map_err(|error| error.to_string())?;
    let listed = repo.list().await.map_err(|error| error.to_string())?;
    require_eq!(listed.len(), 3);

    let web = repo
        .find_by_id(&CatalogItemId("svc-web".to_string()))
        .await
        .map_err(|error| error.to_string())?;
    require!(web.as_ref().map(|item| item.credits) == Some(75), "upsert should replace credits");

    let missing = repo
        .find_by_id(&CatalogItemId("svc-missing".to_string()))
        .await
        .map_err(|error| error.to_string())?;
    require!(missing.is_none(), "unknown ids should not resolve");

    Ok(())
}

#[tokio::test]
async fn sql_repository_honours_catalog_contract() -> ContractResult {
    let pool = migrated_pool().await?;
    check_repository_contract(&SqlCatalogRepository::new(pool)).await
}

#[tokio::test]
async fn in_memory_repository_honours_catalog_contract() -> ContractResult {
    check_repository_contract(&InMemoryCatalogRepository::default()).await
}

#[tokio::test]
async fn demo_catalog_feeds_a_simulator_session() -> ContractResult {
    let pool = migrated_pool().await?;
    DemoCatalog::load(&pool).await.map_err(|error| error.to_string())?;

    let load = load_catalog(&SqlCatalogRepository::new(pool)).await;
    require!(load.error.is_none(), "catalog should load: {:?}", load.error);
    require_eq!(load.catalog.len(), DemoCatalog::items().len());

    let mut simulator = BudgetSimulator::with_catalog(load.catalog);
    simulator.set_budget_text("60000");
    simulator
        .add_catalog_item(&CatalogItemId("svc-web".to_string()))
        .map_err(|error| error.to_string())?;

    // 20% discount puts a credit at 80.
    require_eq!(simulator.pricing().unit_price, Decimal::from(80));
    require_eq!(simulator.quote().total_cost(), Decimal::from(4800));
    require!(!simulator.quote().is_over_budget(simulator.pricing().budget));

    Ok(())
}
