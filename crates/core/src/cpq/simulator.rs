use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::SimulatorConfig;
use crate::cpq::catalog::Catalog;
use crate::cpq::pricing::{
    PricingInput, PricingModel, PricingState, VolumeDiscountPricing, LIST_PRICE_PER_CREDIT,
};
use crate::cpq::quote_builder::{BudgetUsage, QuoteBuilder, QuoteTotals};
use crate::domain::catalog::{CatalogItem, CatalogItemId};
use crate::domain::quote::{LineItemId, QuoteLineItem};
use crate::errors::DomainError;

/// What the whole budget would buy at the current unit price.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditMetrics {
    pub total_credits: Decimal,
    pub savings_per_credit: Decimal,
    pub total_savings: Decimal,
}

impl CreditMetrics {
    pub fn for_pricing(pricing: &PricingState) -> Self {
        let total_credits = if pricing.unit_price > Decimal::ZERO {
            pricing.budget.checked_div(pricing.unit_price).unwrap_or(Decimal::MAX).floor()
        } else {
            Decimal::ZERO
        };
        let savings_per_credit = LIST_PRICE_PER_CREDIT - pricing.unit_price;
        let total_savings = total_credits.checked_mul(savings_per_credit).unwrap_or(
            if savings_per_credit.is_sign_negative() { Decimal::MIN } else { Decimal::MAX },
        );

        Self { total_credits, savings_per_credit, total_savings }
    }
}

/// Render-ready snapshot of a simulator session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub pricing: PricingState,
    pub credits: CreditMetrics,
    pub lines: Vec<QuoteLineItem>,
    pub totals: QuoteTotals,
    pub list_savings: Decimal,
    pub usage: BudgetUsage,
    pub usage_display_percent: Decimal,
}

/// One simulator session: pricing inputs, the working quote and the catalog
/// it draws from.
///
/// Every mutator ends with [`BudgetSimulator::recompute`], so derived values
/// are never observed out of date.
pub struct BudgetSimulator<P = VolumeDiscountPricing> {
    pricing_model: P,
    budget_text: String,
    months_text: String,
    input: PricingInput,
    pricing: PricingState,
    credits: CreditMetrics,
    quote: QuoteBuilder,
    catalog: Catalog,
}

impl BudgetSimulator<VolumeDiscountPricing> {
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self::new(VolumeDiscountPricing, catalog)
    }

    pub fn from_config(config: &SimulatorConfig, catalog: Catalog) -> Self {
        let mut simulator = Self::with_catalog(catalog);
        simulator.set_budget_text(&config.default_budget);
        simulator.set_months_text(&config.default_months);
        simulator
    }
}

impl<P: PricingModel> BudgetSimulator<P> {
    pub fn new(pricing_model: P, catalog: Catalog) -> Self {
        let input = PricingInput::default();
        let pricing = pricing_model.price(input);
        let mut simulator = Self {
            pricing_model,
            budget_text: String::new(),
            months_text: String::new(),
            input,
            pricing,
            credits: CreditMetrics::for_pricing(&pricing),
            quote: QuoteBuilder::new(pricing.unit_price),
            catalog,
        };
        simulator.recompute();
        simulator
    }

    pub fn set_budget_text(&mut self, budget: &str) {
        self.budget_text = budget.to_string();
        self.input = PricingInput::from_text(&self.budget_text, &self.months_text);
        self.recompute();
    }

    pub fn set_months_text(&mut self, months: &str) {
        self.months_text = months.to_string();
        self.input = PricingInput::from_text(&self.budget_text, &self.months_text);
        self.recompute();
    }

    pub fn set_input(&mut self, input: PricingInput) {
        self.budget_text = input.budget().to_string();
        self.months_text = input.months().to_string();
        self.input = input;
        self.recompute();
    }

    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.recompute();
    }

    pub fn add_item(&mut self, item: CatalogItem) -> LineItemId {
        let line_id = self.quote.add_item(item);
        self.recompute();
        line_id
    }

    pub fn add_catalog_item(&mut self, item_id: &CatalogItemId) -> Result<LineItemId, DomainError> {
        let item = self
            .catalog
            .find(item_id)
            .cloned()
            .ok_or_else(|| DomainError::UnknownCatalogItem { item_id: item_id.0.clone() })?;
        Ok(self.add_item(item))
    }

    pub fn remove_item(&mut self, line_id: LineItemId) -> bool {
        let removed = self.quote.remove_item(line_id);
        self.recompute();
        removed
    }

    /// Re-derives pricing from the current inputs and pushes a changed unit
    /// price into every quote line before anything else reads totals.
    pub fn recompute(&mut self) {
        self.pricing = self.pricing_model.price(self.input);
        if self.quote.unit_price() != self.pricing.unit_price {
            self.quote.on_unit_price_changed(self.pricing.unit_price);
        }
        self.credits = CreditMetrics::for_pricing(&self.pricing);
    }

    pub fn budget_text(&self) -> &str {
        &self.budget_text
    }

    pub fn months_text(&self) -> &str {
        &self.months_text
    }

    pub fn pricing(&self) -> &PricingState {
        &self.pricing
    }

    pub fn credit_metrics(&self) -> &CreditMetrics {
        &self.credits
    }

    pub fn quote(&self) -> &QuoteBuilder {
        &self.quote
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn budget_usage(&self) -> BudgetUsage {
        self.quote.budget_usage(self.pricing.budget)
    }

    pub fn summary(&self) -> SimulationSummary {
        let totals = self.quote.totals();
        let usage = self.budget_usage();

        SimulationSummary {
            pricing: self.pricing,
            credits: self.credits,
            lines: self.quote.lines().to_vec(),
            totals,
            list_savings: totals.list_savings(),
            usage,
            usage_display_percent: usage.display_percent(),
        }
    }
}
