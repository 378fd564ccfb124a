use creditsim_core::config::LoadOptions;
use creditsim_core::errors::ApplicationError;
use creditsim_db::{CatalogRepository, SqlCatalogRepository};

use crate::commands::{open_migrated_pool, prepare, CommandResult};

pub fn run(options: &LoadOptions) -> CommandResult {
    let (config, runtime) = match prepare("catalog", options) {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = open_migrated_pool(&config).await?;
        let repo = SqlCatalogRepository::new(pool.clone());
        let listed = repo.list().await.map_err(|error| {
            let interface =
                ApplicationError::Persistence(error.to_string()).into_interface("cli-catalog");
            ("catalog_unavailable", interface.to_string(), 4u8)
        });
        pool.close().await;
        listed
    });

    match result {
        Ok(items) => {
            let message = format!("{} catalog item(s)", items.len());
            match serde_json::to_value(&items) {
                Ok(data) => CommandResult::success_with_data("catalog", message, Some(data)),
                Err(error) => {
                    CommandResult::failure("catalog", "serialization", error.to_string(), 1)
                }
            }
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("catalog", error_class, message, exit_code)
        }
    }
}
