use creditsim_core::config::LoadOptions;
use creditsim_core::cpq::catalog::{load_catalog, CatalogError};
use creditsim_core::cpq::simulator::{BudgetSimulator, SimulationSummary};
use creditsim_core::domain::catalog::CatalogItemId;
use creditsim_core::domain::quote::LineItemId;
use creditsim_core::errors::ApplicationError;
use creditsim_db::SqlCatalogRepository;
use serde::Serialize;

use crate::commands::{open_migrated_pool, prepare, CommandResult, StepFailure};
use crate::SimulateArgs;

#[derive(Debug, Serialize)]
struct SimulateReport {
    budget_input: String,
    months_input: String,
    catalog_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    catalog_warning: Option<CatalogWarning>,
    removed_lines: Vec<LineItemId>,
    summary: SimulationSummary,
}

#[derive(Debug, Serialize)]
struct CatalogWarning {
    message: String,
    detail: String,
}

pub fn run(options: &LoadOptions, args: &SimulateArgs) -> CommandResult {
    let (config, runtime) = match prepare("simulate", options) {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let loaded = runtime.block_on(async {
        let pool = open_migrated_pool(&config).await?;
        let load = load_catalog(&SqlCatalogRepository::new(pool.clone())).await;
        pool.close().await;
        Ok::<_, StepFailure>(load)
    });

    let load = match loaded {
        Ok(load) => load,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("simulate", error_class, message, exit_code);
        }
    };

    let catalog_warning = load.error.map(warning_for_catalog_error);
    tracing::info!(
        event_name = "simulator.catalog.loaded",
        item_count = load.catalog.len(),
        "simulator catalog ready"
    );

    let mut simulator = BudgetSimulator::from_config(&config.simulator, load.catalog);
    if let Some(budget) = &args.budget {
        simulator.set_budget_text(budget);
    }
    if let Some(months) = &args.months {
        simulator.set_months_text(months);
    }

    for item_id in &args.add {
        if let Err(error) = simulator.add_catalog_item(&CatalogItemId(item_id.clone())) {
            let interface = ApplicationError::from(error).into_interface("cli-simulate");
            return CommandResult::failure(
                "simulate",
                "unknown_catalog_item",
                interface.to_string(),
                7,
            );
        }
    }

    let mut removed_lines = Vec::new();
    for raw_id in &args.remove {
        let line_id = LineItemId(*raw_id);
        if simulator.remove_item(line_id) {
            removed_lines.push(line_id);
        }
    }

    let summary = simulator.summary();
    let message = summary_message(&summary);
    let report = SimulateReport {
        budget_input: simulator.budget_text().to_string(),
        months_input: simulator.months_text().to_string(),
        catalog_size: simulator.catalog().len(),
        catalog_warning,
        removed_lines,
        summary,
    };

    match serde_json::to_value(&report) {
        Ok(data) => CommandResult::success_with_data("simulate", message, Some(data)),
        Err(error) => CommandResult::failure("simulate", "serialization", error.to_string(), 1),
    }
}

fn warning_for_catalog_error(error: CatalogError) -> CatalogWarning {
    let interface = ApplicationError::from(error).into_interface("cli-simulate");
    tracing::warn!(
        event_name = "simulator.catalog.unavailable",
        error = %interface,
        "catalog could not be loaded; continuing with an empty catalog"
    );
    CatalogWarning { message: interface.user_message().to_string(), detail: interface.to_string() }
}

fn summary_message(summary: &SimulationSummary) -> String {
    let total = summary.totals.total_cost.round_dp(2).normalize();
    let budget = summary.pricing.budget.round_dp(2).normalize();
    let lines = summary.lines.len();

    if summary.usage.over_budget {
        let over_by = summary.usage.over_by.round_dp(2).normalize();
        format!("{lines} line(s) totalling {total}; over budget {budget} by {over_by}")
    } else {
        let remaining = summary.usage.remaining.round_dp(2).normalize();
        format!("{lines} line(s) totalling {total}; {remaining} of budget {budget} remaining")
    }
}

#[cfg(test)]
mod tests {
    use creditsim_core::cpq::catalog::{Catalog, CatalogError};
    use creditsim_core::cpq::simulator::BudgetSimulator;
    use creditsim_core::domain::catalog::CatalogItem;

    use super::{summary_message, warning_for_catalog_error};

    #[test]
    fn catalog_failure_becomes_user_facing_warning() {
        let error = CatalogError::Unavailable("no such table".to_string());
        let warning = warning_for_catalog_error(error);

        assert_eq!(
            warning.message,
            "The service is temporarily unavailable. Please retry shortly."
        );
        assert_eq!(
            warning.detail,
            "service unavailable: catalog source unavailable: no such table"
        );
    }

    #[test]
    fn message_reports_remaining_budget() {
        let mut simulator = BudgetSimulator::with_catalog(Catalog::default());
        simulator.set_budget_text("60000");
        simulator.add_item(CatalogItem::new("svc-ads", "Advertising", 10));

        assert_eq!(
            summary_message(&simulator.summary()),
            "1 line(s) totalling 800; 59200 of budget 60000 remaining"
        );
    }

    #[test]
    fn message_reports_overrun() {
        let mut simulator = BudgetSimulator::with_catalog(Catalog::default());
        simulator.set_budget_text("0");
        simulator.add_item(CatalogItem::new("svc-web", "Website", 50));

        assert_eq!(
            summary_message(&simulator.summary()),
            "1 line(s) totalling 5000; over budget 0 by 5000"
        );
    }
}
