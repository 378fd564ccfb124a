pub mod config;
pub mod cpq;
pub mod domain;
pub mod errors;

pub use cpq::{
    BudgetSimulator, BudgetUsage, Catalog, CatalogError, CatalogLoad, CatalogProvider,
    CreditMetrics, PricingInput, PricingModel, PricingState, QuoteBuilder, QuoteTotals,
    SimulationSummary, VolumeDiscountPricing,
};
pub use domain::catalog::{CatalogItem, CatalogItemId};
pub use domain::quote::{LineItemId, QuoteLineItem};
pub use errors::{ApplicationError, DomainError, InterfaceError};
