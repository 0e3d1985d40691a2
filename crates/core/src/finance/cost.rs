//! Cost-of-goods derivation from the ingredient catalog.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use vendora_shared::config::IngredientCatalog;

use super::types::{IngredientLine, Usage};
use crate::transaction::TransactionRecord;

/// Prices ingredients and derives per-transaction cost of goods.
#[derive(Debug, Clone, Default)]
pub struct CostModel {
    prices: BTreeMap<String, Decimal>,
    package_sizes: BTreeMap<String, Decimal>,
}

impl CostModel {
    /// Creates a model from the configured catalog.
    #[must_use]
    pub fn new(catalog: &IngredientCatalog) -> Self {
        Self {
            prices: catalog.prices.clone(),
            package_sizes: catalog.package_sizes.clone(),
        }
    }

    /// Configured price per unit.
    #[must_use]
    pub fn price(&self, ingredient: &str) -> Option<Decimal> {
        self.prices.get(ingredient).copied()
    }

    /// Cost of goods for one transaction.
    ///
    /// Zero unless the delivery succeeded. An explicit cost on the record
    /// wins over the ingredient-derived one.
    #[must_use]
    pub fn cost_of(&self, record: &TransactionRecord) -> Decimal {
        if !record.is_delivered() {
            return Decimal::ZERO;
        }
        record.cost_of_goods.unwrap_or_else(|| {
            record
                .ingredient_usage
                .iter()
                .map(|(ingredient, quantity)| {
                    self.price(ingredient).map_or(Decimal::ZERO, |p| p * *quantity)
                })
                .sum()
        })
    }

    /// Prices one ingredient quantity.
    #[must_use]
    pub fn line(&self, ingredient: &str, quantity: Decimal) -> IngredientLine {
        let unit_price = self.price(ingredient);
        let packages_used = self
            .package_sizes
            .get(ingredient)
            .filter(|size| size.is_sign_positive() && !size.is_zero())
            .and_then(|size| quantity.checked_div(*size))
            .map(|packages| packages.ceil());

        IngredientLine {
            ingredient: ingredient.to_string(),
            quantity,
            unit_price,
            cost: unit_price.map_or(Decimal::ZERO, |p| p * quantity),
            packages_used,
        }
    }

    /// Prices every ingredient in a usage tally, name ascending.
    #[must_use]
    pub fn lines(&self, usage: &Usage) -> Vec<IngredientLine> {
        usage
            .0
            .iter()
            .map(|(ingredient, quantity)| self.line(ingredient, *quantity))
            .collect()
    }

    /// Consumed ingredients that have no configured price.
    #[must_use]
    pub fn unpriced(&self, usage: &Usage) -> Vec<String> {
        usage
            .0
            .iter()
            .filter(|(ingredient, quantity)| {
                !quantity.is_zero() && !self.prices.contains_key(ingredient.as_str())
            })
            .map(|(ingredient, _)| ingredient.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Tx;
    use crate::transaction::DeliveryStatus;
    use rust_decimal_macros::dec;

    fn model() -> CostModel {
        let mut catalog = IngredientCatalog::default();
        catalog.prices.insert("coffee".to_string(), dec!(120));
        catalog.prices.insert("milk".to_string(), dec!(15));
        catalog.package_sizes.insert("coffee".to_string(), dec!(1000));
        CostModel::new(&catalog)
    }

    #[test]
    fn test_cost_from_ingredients() {
        let record = Tx::new(1, dec!(5000))
            .ingredient("coffee", dec!(8))
            .ingredient("milk", dec!(100))
            .ingredient("sugar", dec!(5))
            .build();
        assert_eq!(model().cost_of(&record), dec!(2460));
    }

    #[test]
    fn test_explicit_cost_wins() {
        let record = Tx::new(1, dec!(5000))
            .ingredient("coffee", dec!(8))
            .cost(dec!(700))
            .build();
        assert_eq!(model().cost_of(&record), dec!(700));
    }

    #[test]
    fn test_failed_delivery_costs_nothing() {
        let record = Tx::new(1, dec!(5000))
            .cost(dec!(700))
            .delivery(DeliveryStatus::NotDelivered)
            .build();
        assert_eq!(model().cost_of(&record), Decimal::ZERO);
    }

    #[test]
    fn test_packages_only_with_configured_size() {
        let model = model();
        let coffee = model.line("coffee", dec!(2500));
        assert_eq!(coffee.packages_used, Some(dec!(3)));
        assert_eq!(coffee.cost, dec!(300000));

        let milk = model.line("milk", dec!(2500));
        assert_eq!(milk.packages_used, None);

        let sugar = model.line("sugar", dec!(10));
        assert_eq!(sugar.unit_price, None);
        assert_eq!(sugar.cost, Decimal::ZERO);
    }

    #[test]
    fn test_unpriced_ingredients_reported() {
        let mut usage = Usage::default();
        let record = Tx::new(1, dec!(1))
            .ingredient("coffee", dec!(1))
            .ingredient("sugar", dec!(2))
            .build();
        usage.add(&record);
        assert_eq!(model().unpriced(&usage), vec!["sugar".to_string()]);
    }
}
