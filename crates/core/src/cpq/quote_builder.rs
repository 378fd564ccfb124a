use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cpq::pricing::LIST_PRICE_PER_CREDIT;
use crate::domain::catalog::CatalogItem;
use crate::domain::quote::{LineItemId, QuoteLineItem};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteTotals {
    pub total_cost: Decimal,
    pub total_at_list_price: Decimal,
    pub total_credits: u64,
}

impl QuoteTotals {
    /// Amount saved against list price.
    pub fn list_savings(&self) -> Decimal {
        self.total_at_list_price - self.total_cost
    }
}

/// How much of a budget the quote consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetUsage {
    /// Unclamped; exceeds 100 when over budget.
    pub percent: Decimal,
    pub over_budget: bool,
    pub over_by: Decimal,
    pub remaining: Decimal,
}

impl BudgetUsage {
    /// Percentage capped at 100, for progress-bar style rendering.
    pub fn display_percent(&self) -> Decimal {
        self.percent.min(Decimal::ONE_HUNDRED)
    }
}

/// Ordered working quote.
///
/// Every line's cost is kept equal to `credits * unit_price`; a unit price
/// change rewrites all lines before totals are recomputed.
#[derive(Clone, Debug)]
pub struct QuoteBuilder {
    lines: Vec<QuoteLineItem>,
    unit_price: Decimal,
    next_line_id: u64,
    totals: QuoteTotals,
}

impl Default for QuoteBuilder {
    fn default() -> Self {
        Self::new(LIST_PRICE_PER_CREDIT)
    }
}

impl QuoteBuilder {
    pub fn new(unit_price: Decimal) -> Self {
        Self { lines: Vec::new(), unit_price, next_line_id: 1, totals: QuoteTotals::default() }
    }

    pub fn add_item(&mut self, item: CatalogItem) -> LineItemId {
        let id = LineItemId(self.next_line_id);
        self.next_line_id += 1;

        let cost = Decimal::from(item.credits) * self.unit_price;
        self.lines.push(QuoteLineItem { id, item, cost });
        self.recompute_totals();
        id
    }

    /// Returns whether a line was removed. Unknown ids leave the quote untouched.
    pub fn remove_item(&mut self, line_id: LineItemId) -> bool {
        let Some(position) = self.lines.iter().position(|line| line.id == line_id) else {
            return false;
        };

        self.lines.remove(position);
        self.recompute_totals();
        true
    }

    pub fn on_unit_price_changed(&mut self, unit_price: Decimal) {
        self.unit_price = unit_price;
        for line in &mut self.lines {
            line.cost = line.cost_at(unit_price);
        }
        self.recompute_totals();
    }

    pub fn lines(&self) -> &[QuoteLineItem] {
        &self.lines
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn totals(&self) -> QuoteTotals {
        self.totals
    }

    pub fn total_cost(&self) -> Decimal {
        self.totals.total_cost
    }

    pub fn total_at_list_price(&self) -> Decimal {
        self.totals.total_at_list_price
    }

    pub fn is_over_budget(&self, budget: Decimal) -> bool {
        self.total_cost() > budget
    }

    /// `total / budget * 100`, or 0 for a zero budget. Ratios too large for
    /// `Decimal` saturate at `Decimal::MAX`.
    pub fn budget_usage_percent(&self, budget: Decimal) -> Decimal {
        if budget <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        self.total_cost()
            .checked_div(budget)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::MAX)
    }

    pub fn budget_usage(&self, budget: Decimal) -> BudgetUsage {
        let total = self.total_cost();
        let over_budget = self.is_over_budget(budget);

        BudgetUsage {
            percent: self.budget_usage_percent(budget),
            over_budget,
            over_by: if over_budget { total - budget } else { Decimal::ZERO },
            remaining: if over_budget { Decimal::ZERO } else { budget - total },
        }
    }

    fn recompute_totals(&mut self) {
        let mut totals = QuoteTotals::default();
        for line in &self.lines {
            totals.total_cost += line.cost;
            totals.total_at_list_price += line.cost_at(LIST_PRICE_PER_CREDIT);
            totals.total_credits += u64::from(line.item.credits);
        }
        self.totals = totals;
    }
}
