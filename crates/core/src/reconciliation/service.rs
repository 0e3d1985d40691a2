//! Monthly QR settlement reconciliation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vendora_shared::config::ReconciliationThresholds;

use super::status::ReconciliationStatus;
use crate::aggregation::{Bucket, exact_percent};
use crate::payments::{ProviderSettlement, SettlementSource};
use crate::transaction::{PaymentType, TransactionRecord};

/// Internal versus external QR totals for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationRow {
    /// `YYYY-MM` month key.
    pub month: String,
    /// Paid QR totals recorded internally.
    pub internal: Bucket,
    /// Totals reported per provider.
    pub providers: Vec<ProviderSettlement>,
    /// Sum of provider amounts.
    pub external_total: Decimal,
    /// Internal amount minus external total.
    pub difference: Decimal,
    /// Absolute difference as a percentage of the internal amount.
    pub difference_percent: Decimal,
    /// Severity.
    pub status: ReconciliationStatus,
}

/// Compares internal QR totals against a settlement source.
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    /// Reconciles paid QR transactions month by month, in month order.
    #[must_use]
    pub fn reconcile(
        records: &[TransactionRecord],
        source: &dyn SettlementSource,
        thresholds: &ReconciliationThresholds,
    ) -> Vec<ReconciliationRow> {
        let mut by_month: BTreeMap<String, Bucket> = BTreeMap::new();
        for record in records
            .iter()
            .filter(|r| r.is_paid() && r.payment_type == PaymentType::Qr)
        {
            by_month.entry(record.month_key()).or_default().add(record);
        }

        let rows: Vec<ReconciliationRow> = by_month
            .into_iter()
            .map(|(month, internal)| {
                let providers = source.settlements(&month, &internal);
                Self::row(month, internal, providers, thresholds)
            })
            .collect();

        debug!(
            months = rows.len(),
            source = source.label(),
            flagged = rows
                .iter()
                .filter(|r| r.status != ReconciliationStatus::Ok)
                .count(),
            "Reconciled QR settlements"
        );

        rows
    }

    /// Builds one row from internal and provider totals.
    #[must_use]
    pub fn row(
        month: String,
        internal: Bucket,
        providers: Vec<ProviderSettlement>,
        thresholds: &ReconciliationThresholds,
    ) -> ReconciliationRow {
        let external_total: Decimal = providers.iter().map(|p| p.amount).sum();
        let difference = internal.amount - external_total;
        let exact = exact_percent(difference.abs(), internal.amount);

        ReconciliationRow {
            month,
            internal,
            providers,
            external_total,
            difference,
            difference_percent: exact.round_dp(2),
            status: ReconciliationStatus::classify(exact, thresholds),
        }
    }
}
