pub mod catalog;
pub mod pricing;
pub mod quote_builder;
pub mod simulator;

pub use catalog::{load_catalog, Catalog, CatalogError, CatalogLoad, CatalogProvider};
pub use pricing::{PricingInput, PricingModel, PricingState, VolumeDiscountPricing};
pub use quote_builder::{BudgetUsage, QuoteBuilder, QuoteTotals};
pub use simulator::{BudgetSimulator, CreditMetrics, SimulationSummary};
