//! Payment-type report builder.

use std::collections::BTreeMap;

use tracing::debug;

use super::settlement::SettlementSource;
use super::types::{
    DetailRow, PaidTotals, PaymentSplit, PaymentSummary, PaymentTypeDetail, PaymentTypeSummary,
    PaymentTypesReport, ProviderShare, QrProviderDetail, QrProviderMonth, SplitRow,
};
use crate::aggregation::{
    Bucket, Dimensions, MONDAY_FIRST, WEEKDAY_NAMES, count_percent, percent, rank_by_amount,
};
use crate::transaction::{PaymentType, TransactionRecord};

/// Builds the payment-method-centric report.
pub struct PaymentReportBuilder;

impl PaymentReportBuilder {
    /// Builds the report from filtered transactions.
    ///
    /// Only paid transactions contribute. Test dispenses are counted but
    /// never enter revenue.
    #[must_use]
    pub fn build(
        records: &[TransactionRecord],
        settlement: &dyn SettlementSource,
    ) -> PaymentTypesReport {
        let paid: Vec<&TransactionRecord> = records.iter().filter(|r| r.is_paid()).collect();
        let test_orders = paid
            .iter()
            .filter(|r| r.payment_type == PaymentType::Test)
            .count() as u64;
        let unpaid_orders = (records.len() - paid.len()) as u64;

        let dims = Dimensions::build(
            paid.iter().copied().filter(|r| r.payment_type.is_revenue()),
            PaymentSplit::add,
        );

        debug!(
            paid = paid.len(),
            revenue_orders = dims.total.total.count,
            test_orders,
            unpaid_orders,
            "Built payment-type dimensions"
        );

        PaymentTypesReport {
            summary: Self::summary(&dims.total, test_orders, unpaid_orders),
            monthly: Self::monthly(&dims),
            weekdays: Self::weekdays(&dims),
            machines: Self::machines(&dims),
            products: Self::products(&dims),
            details: PaymentType::REVENUE
                .iter()
                .map(|&payment_type| Self::detail(&dims, payment_type))
                .collect(),
            qr_providers: Self::qr_providers(&dims, settlement),
        }
    }

    fn summary(total: &PaymentSplit, test_orders: u64, unpaid_orders: u64) -> PaymentSummary {
        let by_type = PaymentType::REVENUE
            .iter()
            .map(|&payment_type| {
                let bucket = total.get(payment_type);
                PaymentTypeSummary {
                    payment_type,
                    order_count: bucket.count,
                    total_amount: bucket.amount,
                    percent_by_count: count_percent(bucket.count, total.total.count),
                    percent_by_amount: percent(bucket.amount, total.total.amount),
                    average_check: bucket.average_check(),
                }
            })
            .collect();

        PaymentSummary {
            by_type,
            total_paid: PaidTotals::from(total.total),
            test_orders,
            unpaid_orders,
        }
    }

    fn monthly(dims: &Dimensions<PaymentSplit>) -> Vec<SplitRow> {
        dims.by_month
            .iter()
            .map(|(month, split)| SplitRow {
                key: month.clone(),
                label: month.clone(),
                detail: None,
                split: *split,
            })
            .collect()
    }

    fn weekdays(dims: &Dimensions<PaymentSplit>) -> Vec<SplitRow> {
        MONDAY_FIRST
            .iter()
            .map(|&index| SplitRow {
                key: WEEKDAY_NAMES[index].to_lowercase(),
                label: WEEKDAY_NAMES[index].to_string(),
                detail: None,
                split: dims.by_weekday[index],
            })
            .collect()
    }

    fn machines(dims: &Dimensions<PaymentSplit>) -> Vec<SplitRow> {
        let mut rows: Vec<SplitRow> = dims
            .by_machine
            .iter()
            .map(|(id, split)| {
                let (label, detail) = dims.machine_label(id);
                SplitRow {
                    key: id.to_string(),
                    label,
                    detail,
                    split: *split,
                }
            })
            .collect();
        rank_by_amount(&mut rows, |r| {
            (r.split.total.amount, r.label.as_str(), r.key.as_str())
        });
        rows
    }

    fn products(dims: &Dimensions<PaymentSplit>) -> Vec<SplitRow> {
        let mut rows: Vec<SplitRow> = dims
            .by_product
            .iter()
            .map(|(id, split)| {
                let (label, detail) = dims.product_label(id);
                SplitRow {
                    key: id.to_string(),
                    label,
                    detail,
                    split: *split,
                }
            })
            .collect();
        rank_by_amount(&mut rows, |r| {
            (r.split.total.amount, r.label.as_str(), r.key.as_str())
        });
        rows
    }

    fn detail(dims: &Dimensions<PaymentSplit>, payment_type: PaymentType) -> PaymentTypeDetail {
        let type_total = dims.total.get(payment_type);
        let row = |key: String, label: String, detail: Option<String>, bucket: Bucket| DetailRow {
            key,
            label,
            detail,
            count: bucket.count,
            amount: bucket.amount,
            average_check: bucket.average_check(),
            percent_of_type: percent(bucket.amount, type_total.amount),
        };

        let by_month = dims
            .by_month
            .iter()
            .map(|(month, split)| (month, split.get(payment_type)))
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(month, bucket)| row(month.clone(), month.clone(), None, bucket))
            .collect();

        let mut by_product: Vec<DetailRow> = dims
            .by_product
            .iter()
            .map(|(id, split)| (id, split.get(payment_type)))
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(id, bucket)| {
                let (label, detail) = dims.product_label(id);
                row(id.to_string(), label, detail, bucket)
            })
            .collect();
        rank_by_amount(&mut by_product, |r| (r.amount, r.label.as_str(), r.key.as_str()));

        let mut by_machine: Vec<DetailRow> = dims
            .by_machine
            .iter()
            .map(|(id, split)| (id, split.get(payment_type)))
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(id, bucket)| {
                let (label, detail) = dims.machine_label(id);
                row(id.to_string(), label, detail, bucket)
            })
            .collect();
        rank_by_amount(&mut by_machine, |r| (r.amount, r.label.as_str(), r.key.as_str()));

        PaymentTypeDetail {
            payment_type,
            totals: PaidTotals::from(type_total),
            by_month,
            by_product,
            by_machine,
        }
    }

    fn qr_providers(
        dims: &Dimensions<PaymentSplit>,
        settlement: &dyn SettlementSource,
    ) -> QrProviderDetail {
        let mut per_provider: BTreeMap<String, Bucket> = BTreeMap::new();

        let months: Vec<QrProviderMonth> = dims
            .by_month
            .iter()
            .filter(|(_, split)| !split.qr.is_empty())
            .map(|(month, split)| {
                let providers = settlement.settlements(month, &split.qr);
                for share in &providers {
                    per_provider
                        .entry(share.provider.clone())
                        .or_default()
                        .merge(&Bucket::new(share.count, share.amount));
                }
                QrProviderMonth {
                    month: month.clone(),
                    internal: split.qr,
                    providers,
                }
            })
            .collect();

        let qr_amount = dims.total.qr.amount;
        let totals = per_provider
            .into_iter()
            .map(|(provider, bucket)| ProviderShare {
                provider,
                count: bucket.count,
                amount: bucket.amount,
                percent_of_qr: percent(bucket.amount, qr_amount),
            })
            .collect();

        QrProviderDetail {
            source: settlement.label().to_string(),
            approximated: settlement.is_approximation(),
            months,
            totals,
        }
    }
}
