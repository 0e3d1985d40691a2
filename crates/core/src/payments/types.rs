//! Payment-type report data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::settlement::ProviderSettlement;
use crate::aggregation::Bucket;
use crate::transaction::{PaymentType, TransactionRecord};

/// Count/amount per revenue payment type, plus their total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSplit {
    /// Cash sales.
    pub cash: Bucket,
    /// QR sales.
    pub qr: Bucket,
    /// VIP sales.
    pub vip: Bucket,
    /// Credit sales.
    pub credit: Bucket,
    /// All revenue payment types.
    pub total: Bucket,
}

impl PaymentSplit {
    /// Adds one transaction. Test transactions are ignored.
    pub fn add(&mut self, record: &TransactionRecord) {
        let bucket = match record.payment_type {
            PaymentType::Cash => &mut self.cash,
            PaymentType::Qr => &mut self.qr,
            PaymentType::Vip => &mut self.vip,
            PaymentType::Credit => &mut self.credit,
            PaymentType::Test => return,
        };
        bucket.add(record);
        self.total.add(record);
    }

    /// Bucket for one payment type. Test always reads as empty.
    #[must_use]
    pub fn get(&self, payment_type: PaymentType) -> Bucket {
        match payment_type {
            PaymentType::Cash => self.cash,
            PaymentType::Qr => self.qr,
            PaymentType::Vip => self.vip,
            PaymentType::Credit => self.credit,
            PaymentType::Test => Bucket::default(),
        }
    }
}

/// Count, amount and average check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidTotals {
    /// Number of orders.
    pub order_count: u64,
    /// Total amount.
    pub total_amount: Decimal,
    /// Amount per order.
    pub average_check: Decimal,
}

impl From<Bucket> for PaidTotals {
    fn from(bucket: Bucket) -> Self {
        Self {
            order_count: bucket.count,
            total_amount: bucket.amount,
            average_check: bucket.average_check(),
        }
    }
}

/// Summary line for one payment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTypeSummary {
    /// Payment type.
    pub payment_type: PaymentType,
    /// Number of paid orders.
    pub order_count: u64,
    /// Paid amount.
    pub total_amount: Decimal,
    /// Share of paid order count.
    pub percent_by_count: Decimal,
    /// Share of paid amount.
    pub percent_by_amount: Decimal,
    /// Amount per order.
    pub average_check: Decimal,
}

/// Summary of paid sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSummary {
    /// One line per revenue payment type, in CASH, QR, VIP, CREDIT order.
    pub by_type: Vec<PaymentTypeSummary>,
    /// Totals over all revenue payment types.
    pub total_paid: PaidTotals,
    /// Paid test dispenses, excluded from revenue.
    pub test_orders: u64,
    /// Transactions whose payment did not complete.
    pub unpaid_orders: u64,
}

/// One breakdown row split by payment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRow {
    /// Stable key (month, weekday, or ID).
    pub key: String,
    /// Display label.
    pub label: String,
    /// Secondary label (address, category).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Per payment type totals.
    #[serde(flatten)]
    pub split: PaymentSplit,
}

/// One drill-down row within a single payment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    /// Stable key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Secondary label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Number of orders.
    pub count: u64,
    /// Amount.
    pub amount: Decimal,
    /// Amount per order.
    pub average_check: Decimal,
    /// Share of this payment type's amount.
    pub percent_of_type: Decimal,
}

/// Full drill-down for one payment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTypeDetail {
    /// Payment type.
    pub payment_type: PaymentType,
    /// Totals for this type.
    pub totals: PaidTotals,
    /// By month, ascending.
    pub by_month: Vec<DetailRow>,
    /// By product, amount descending.
    pub by_product: Vec<DetailRow>,
    /// By machine, amount descending.
    pub by_machine: Vec<DetailRow>,
}

/// QR totals apportioned to providers for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrProviderMonth {
    /// Month key.
    pub month: String,
    /// Internally recorded QR totals.
    pub internal: Bucket,
    /// Provider totals.
    pub providers: Vec<ProviderSettlement>,
}

/// One provider's share of all QR sales in the period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderShare {
    /// Provider name.
    pub provider: String,
    /// Number of payments.
    pub count: u64,
    /// Amount.
    pub amount: Decimal,
    /// Share of QR amount.
    pub percent_of_qr: Decimal,
}

/// QR provider sub-detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrProviderDetail {
    /// Settlement source label.
    pub source: String,
    /// Whether provider totals are an approximation.
    pub approximated: bool,
    /// Per month.
    pub months: Vec<QrProviderMonth>,
    /// Per provider over the whole period, name ascending.
    pub totals: Vec<ProviderShare>,
}

/// Payment-method-centric report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTypesReport {
    /// Summary.
    pub summary: PaymentSummary,
    /// By month, ascending.
    pub monthly: Vec<SplitRow>,
    /// Exactly seven rows, Monday first.
    pub weekdays: Vec<SplitRow>,
    /// By machine, amount descending.
    pub machines: Vec<SplitRow>,
    /// By product, amount descending.
    pub products: Vec<SplitRow>,
    /// Drill-downs for CASH, QR, VIP, CREDIT.
    pub details: Vec<PaymentTypeDetail>,
    /// QR provider apportionment.
    pub qr_providers: QrProviderDetail,
}
