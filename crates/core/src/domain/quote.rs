use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::CatalogItem;

/// Session-local identifier of a quote line.
///
/// Only meaningful inside the builder that issued it; two additions of the
/// same catalog item get two different ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineItemId(pub u64);

impl fmt::Display for LineItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line-{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteLineItem {
    pub id: LineItemId,
    pub item: CatalogItem,
    pub cost: Decimal,
}

impl QuoteLineItem {
    pub fn credits(&self) -> Decimal {
        Decimal::from(self.item.credits)
    }

    pub fn cost_at(&self, unit_price: Decimal) -> Decimal {
        self.credits() * unit_price
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::catalog::CatalogItem;

    use super::{LineItemId, QuoteLineItem};

    #[test]
    fn cost_at_multiplies_credits_by_unit_price() {
        let line = QuoteLineItem {
            id: LineItemId(1),
            item: CatalogItem::new("svc-seo", "SEO audit", 12),
            cost: Decimal::ZERO,
        };

        assert_eq!(line.cost_at(Decimal::from(80)), Decimal::from(960));
    }

    #[test]
    fn line_ids_render_with_prefix() {
        assert_eq!(LineItemId(7).to_string(), "line-7");
    }
}
