//! Financial report builder.

use rust_decimal::Decimal;
use tracing::{debug, warn};
use vendora_shared::config::IngredientCatalog;

use super::cost::CostModel;
use super::types::{
    FailedDelivery, FinanceBucket, FinanceRow, FinanceSummary, FinanceTotals, FinancialReport,
    IngredientConsumption, IngredientGroup, OrderTotals, Usage,
};
use crate::aggregation::{Dimensions, Period, average, count_percent, rank_by_amount};
use crate::transaction::TransactionRecord;

/// Builds the profit/cost-centric report.
pub struct FinancialReportBuilder;

impl FinancialReportBuilder {
    /// Builds the report from filtered transactions.
    ///
    /// Every transaction counts toward orders and revenue. Cost of goods and
    /// ingredient consumption come from successful deliveries only.
    #[must_use]
    pub fn build(
        records: &[TransactionRecord],
        period: &Period,
        catalog: &IngredientCatalog,
    ) -> FinancialReport {
        let model = CostModel::new(catalog);

        let dims: Dimensions<FinanceBucket> = Dimensions::build_with(
            records,
            |record| model.cost_of(record),
            |bucket: &mut FinanceBucket, record: &TransactionRecord, cost: Decimal| {
                bucket.add(record, cost);
            },
        );
        let usage: Dimensions<Usage> =
            Dimensions::build(records.iter().filter(|r| r.is_delivered()), Usage::add);

        debug!(
            orders = dims.total.order_count,
            failed = dims.total.failed_count,
            ingredients = usage.total.0.len(),
            "Built financial dimensions"
        );

        let total_revenue = dims.total.revenue;

        FinancialReport {
            summary: Self::summary(&dims.total, period),
            monthly: dims
                .by_month
                .iter()
                .map(|(month, bucket)| {
                    FinanceRow::from_bucket(month.clone(), month.clone(), None, bucket)
                })
                .collect(),
            daily: dims
                .by_date
                .iter()
                .map(|(date, bucket)| {
                    FinanceRow::from_bucket(date.to_string(), date.to_string(), None, bucket)
                })
                .collect(),
            machines: Self::ranked(
                dims.by_machine
                    .iter()
                    .map(|(id, bucket)| {
                        let (label, detail) = dims.machine_label(id);
                        FinanceRow::from_bucket(id.to_string(), label, detail, bucket)
                            .with_revenue_share(total_revenue)
                    })
                    .collect(),
            ),
            products: Self::ranked(
                dims.by_product
                    .iter()
                    .map(|(id, bucket)| {
                        let (label, detail) = dims.product_label(id);
                        FinanceRow::from_bucket(id.to_string(), label, detail, bucket)
                            .with_revenue_share(total_revenue)
                    })
                    .collect(),
            ),
            ingredients: Self::ingredients(&model, &usage),
            failed_deliveries: Self::failed_deliveries(records),
        }
    }

    fn summary(total: &FinanceBucket, period: &Period) -> FinanceSummary {
        let period_days = period.days();
        FinanceSummary {
            period_days,
            orders: OrderTotals {
                total: total.order_count,
                successful: total.successful_count,
                failed: total.failed_count,
                success_rate: count_percent(total.successful_count, total.order_count),
            },
            finance: FinanceTotals {
                revenue: total.revenue,
                cost_of_goods: total.cost_of_goods,
                gross_profit: total.profit(),
                margin_percent: total.margin_percent(),
                average_check: total.average_check(),
                orders_per_day: average(Decimal::from(total.order_count), period_days),
            },
        }
    }

    fn ranked(mut rows: Vec<FinanceRow>) -> Vec<FinanceRow> {
        rank_by_amount(&mut rows, |r| (r.revenue, r.label.as_str(), r.key.as_str()));
        rows
    }

    fn ingredients(model: &CostModel, usage: &Dimensions<Usage>) -> IngredientConsumption {
        let group = |key: String, label: String, tally: &Usage| {
            let lines = model.lines(tally);
            let total_cost = lines.iter().map(|l| l.cost).sum();
            IngredientGroup {
                key,
                label,
                lines,
                total_cost,
            }
        };

        let unpriced = model.unpriced(&usage.total);
        if !unpriced.is_empty() {
            warn!(ingredients = ?unpriced, "Consumed ingredients have no configured price");
        }

        let lines = model.lines(&usage.total);
        let total_cost = lines.iter().map(|l| l.cost).sum();

        let by_month = usage
            .by_month
            .iter()
            .filter(|(_, tally)| !tally.0.is_empty())
            .map(|(month, tally)| group(month.clone(), month.clone(), tally))
            .collect();

        let mut by_machine: Vec<IngredientGroup> = usage
            .by_machine
            .iter()
            .filter(|(_, tally)| !tally.0.is_empty())
            .map(|(id, tally)| group(id.to_string(), usage.machine_label(id).0, tally))
            .collect();
        by_machine.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.key.cmp(&b.key)));

        let by_day = usage
            .by_date
            .iter()
            .filter(|(_, tally)| !tally.0.is_empty())
            .map(|(date, tally)| group(date.to_string(), date.to_string(), tally))
            .collect();

        IngredientConsumption {
            lines,
            total_cost,
            unpriced,
            by_month,
            by_machine,
            by_day,
        }
    }

    fn failed_deliveries(records: &[TransactionRecord]) -> Vec<FailedDelivery> {
        let mut failed: Vec<&TransactionRecord> =
            records.iter().filter(|r| !r.is_delivered()).collect();
        failed.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

        failed
            .into_iter()
            .map(|record| FailedDelivery {
                transaction_id: record.id,
                date: record.timestamp.date(),
                time: record.timestamp.time(),
                machine_code: record.machine.code.clone(),
                product_name: record.product.name.clone(),
                price: record.amount,
                payment_type: record.payment_type,
                status: record.delivery_status,
            })
            .collect()
    }
}
