//! Financial report data types.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use vendora_shared::types::TransactionId;

use crate::aggregation::{average, exact_percent, percent};
use crate::transaction::{DeliveryStatus, PaymentType, TransactionRecord};

/// Order, revenue and cost accumulator for one dimension value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceBucket {
    /// All orders.
    pub order_count: u64,
    /// Orders with a successful delivery.
    pub successful_count: u64,
    /// Orders without a successful delivery.
    pub failed_count: u64,
    /// Sum of order amounts.
    pub revenue: Decimal,
    /// Cost of goods of successful deliveries.
    pub cost_of_goods: Decimal,
}

impl FinanceBucket {
    /// Adds one order with its already-derived cost.
    ///
    /// Cost only counts when the delivery succeeded.
    pub fn add(&mut self, record: &TransactionRecord, cost: Decimal) {
        self.order_count += 1;
        self.revenue += record.amount;
        if record.is_delivered() {
            self.successful_count += 1;
            self.cost_of_goods += cost;
        } else {
            self.failed_count += 1;
        }
    }

    /// Revenue minus cost of goods.
    #[must_use]
    pub fn profit(&self) -> Decimal {
        self.revenue - self.cost_of_goods
    }

    /// Profit as a percentage of revenue.
    ///
    /// Rounds away from zero so a thin profit or loss keeps its sign.
    #[must_use]
    pub fn margin_percent(&self) -> Decimal {
        exact_percent(self.profit(), self.revenue)
            .round_dp_with_strategy(2, RoundingStrategy::AwayFromZero)
    }

    /// Revenue per order.
    #[must_use]
    pub fn average_check(&self) -> Decimal {
        average(self.revenue, self.order_count)
    }
}

/// One row of a financial breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceRow {
    /// Stable key (month, date or ID).
    pub key: String,
    /// Display label.
    pub label: String,
    /// Secondary label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// All orders.
    pub order_count: u64,
    /// Successful deliveries.
    pub successful_count: u64,
    /// Failed deliveries.
    pub failed_count: u64,
    /// Revenue.
    pub revenue: Decimal,
    /// Cost of goods.
    pub cost_of_goods: Decimal,
    /// Gross profit.
    pub profit: Decimal,
    /// Gross margin.
    pub margin_percent: Decimal,
    /// Revenue per order.
    pub average_check: Decimal,
    /// Share of period revenue. Set on machine and product rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_percent: Option<Decimal>,
}

impl FinanceRow {
    /// Builds a row from a bucket.
    #[must_use]
    pub fn from_bucket(
        key: String,
        label: String,
        detail: Option<String>,
        bucket: &FinanceBucket,
    ) -> Self {
        Self {
            key,
            label,
            detail,
            order_count: bucket.order_count,
            successful_count: bucket.successful_count,
            failed_count: bucket.failed_count,
            revenue: bucket.revenue,
            cost_of_goods: bucket.cost_of_goods,
            profit: bucket.profit(),
            margin_percent: bucket.margin_percent(),
            average_check: bucket.average_check(),
            revenue_percent: None,
        }
    }

    /// Sets the share of the given total revenue.
    #[must_use]
    pub fn with_revenue_share(mut self, total_revenue: Decimal) -> Self {
        self.revenue_percent = Some(percent(self.revenue, total_revenue));
        self
    }
}

/// Ingredient quantities consumed by successful deliveries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage(pub BTreeMap<String, Decimal>);

impl Usage {
    /// Adds a record's ingredient usage. Failed deliveries consume nothing.
    pub fn add(&mut self, record: &TransactionRecord) {
        if !record.is_delivered() {
            return;
        }
        for (ingredient, quantity) in &record.ingredient_usage {
            *self.0.entry(ingredient.clone()).or_default() += *quantity;
        }
    }
}

/// Consumption of one ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    /// Ingredient name.
    pub ingredient: String,
    /// Quantity consumed.
    pub quantity: Decimal,
    /// Configured price per unit, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
    /// Quantity times unit price. Zero for unpriced ingredients.
    pub cost: Decimal,
    /// Whole packages opened, when a package size is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages_used: Option<Decimal>,
}

/// Ingredient consumption for one month, machine or day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientGroup {
    /// Stable key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Lines, ingredient name ascending.
    pub lines: Vec<IngredientLine>,
    /// Sum of line costs.
    pub total_cost: Decimal,
}

/// Ingredient consumption over the period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientConsumption {
    /// Period totals, ingredient name ascending.
    pub lines: Vec<IngredientLine>,
    /// Sum of line costs.
    pub total_cost: Decimal,
    /// Consumed ingredients without a configured price.
    pub unpriced: Vec<String>,
    /// By month, ascending.
    pub by_month: Vec<IngredientGroup>,
    /// By machine, machine label ascending.
    pub by_machine: Vec<IngredientGroup>,
    /// By day, ascending.
    pub by_day: Vec<IngredientGroup>,
}

/// One transaction without a successful delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDelivery {
    /// Transaction ID.
    pub transaction_id: TransactionId,
    /// Machine-local date.
    pub date: NaiveDate,
    /// Machine-local time.
    pub time: NaiveTime,
    /// Machine code.
    pub machine_code: String,
    /// Product name.
    pub product_name: String,
    /// Charged amount.
    pub price: Decimal,
    /// Payment type.
    pub payment_type: PaymentType,
    /// Delivery status.
    pub status: DeliveryStatus,
}

/// Order counts for the period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// All orders.
    pub total: u64,
    /// Successful deliveries.
    pub successful: u64,
    /// Failed deliveries.
    pub failed: u64,
    /// Successful share of all orders.
    pub success_rate: Decimal,
}

/// Money totals for the period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceTotals {
    /// Revenue.
    pub revenue: Decimal,
    /// Cost of goods.
    pub cost_of_goods: Decimal,
    /// Revenue minus cost of goods.
    pub gross_profit: Decimal,
    /// Gross margin.
    pub margin_percent: Decimal,
    /// Revenue per order.
    pub average_check: Decimal,
    /// Orders per calendar day.
    pub orders_per_day: Decimal,
}

/// Financial summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceSummary {
    /// Calendar days in the period, inclusive.
    pub period_days: u64,
    /// Order counts.
    pub orders: OrderTotals,
    /// Money totals.
    pub finance: FinanceTotals,
}

/// Profit/cost-centric report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialReport {
    /// Summary.
    pub summary: FinanceSummary,
    /// By month, ascending.
    pub monthly: Vec<FinanceRow>,
    /// By day, ascending.
    pub daily: Vec<FinanceRow>,
    /// By machine, revenue descending.
    pub machines: Vec<FinanceRow>,
    /// By product, revenue descending.
    pub products: Vec<FinanceRow>,
    /// Ingredient consumption.
    pub ingredients: IngredientConsumption,
    /// Delivery-failure audit, by timestamp then ID.
    pub failed_deliveries: Vec<FailedDelivery>,
}
