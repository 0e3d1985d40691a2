//! Cross-analysis assembly.

use serde::{Deserialize, Serialize};
use tracing::debug;
use vendora_shared::config::EngineConfig;

use super::alerts::{Alert, AlertRules};
use super::hourly::{HourlyRow, hourly_distribution};
use super::matrix::CrossMatrix;
use super::trends::Trends;
use crate::aggregation::{Aggregator, Period};
use crate::finance::FinancialReport;
use crate::payments::SettlementSource;
use crate::reconciliation::{ReconciliationEngine, ReconciliationRow};
use crate::transaction::TransactionRecord;

/// Reconciliation, cross-analysis, trends and alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossAnalytics {
    /// QR settlement reconciliation by month.
    pub reconciliation: Vec<ReconciliationRow>,
    /// Top products by top machines.
    pub matrix: CrossMatrix,
    /// 24 hour-of-day rows.
    pub hourly: Vec<HourlyRow>,
    /// First-versus-last month trends.
    pub trends: Trends,
    /// Raised alerts, critical first.
    pub alerts: Vec<Alert>,
}

/// Builds cross-cutting analytics on top of the financial report.
pub struct AnalyticsBuilder;

impl AnalyticsBuilder {
    /// Builds analytics from filtered transactions.
    ///
    /// The matrix and hourly distribution cover paid sales. Trends and the
    /// failure-rate rule read the financial report.
    #[must_use]
    pub fn build(
        records: &[TransactionRecord],
        financial: &FinancialReport,
        settlement: &dyn SettlementSource,
        period: &Period,
        config: &EngineConfig,
    ) -> CrossAnalytics {
        let sales: Vec<&TransactionRecord> = records
            .iter()
            .filter(|r| r.is_paid() && r.payment_type.is_revenue())
            .collect();
        let dims = Aggregator::aggregate(sales.iter().copied());

        let reconciliation =
            ReconciliationEngine::reconcile(records, settlement, &config.reconciliation);
        let matrix = CrossMatrix::build(&sales, &dims, config.top_k);
        let hourly = hourly_distribution(&dims);
        let trends = Trends::from_monthly(&financial.monthly);
        let alerts = AlertRules::evaluate(
            &reconciliation,
            &financial.summary.orders,
            &trends,
            period,
            config,
        );

        debug!(
            sales = sales.len(),
            matrix_products = matrix.products.len(),
            matrix_machines = matrix.machines.len(),
            alerts = alerts.len(),
            "Built cross analytics"
        );

        CrossAnalytics {
            reconciliation,
            matrix,
            hourly,
            trends,
            alerts,
        }
    }
}
