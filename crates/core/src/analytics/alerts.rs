//! Rule-based alerts.
//!
//! Alerts are observational. They never change report numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vendora_shared::config::{AlertThresholds, EngineConfig, ReconciliationThresholds};

use super::trends::Trends;
use crate::aggregation::{Period, exact_percent};
use crate::finance::OrderTotals;
use crate::reconciliation::{ReconciliationRow, ReconciliationStatus};

/// Alert severity. Orders critical first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Needs immediate attention.
    Critical,
    /// Worth a look.
    Warning,
}

/// Rule that raised an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// QR settlement discrepancy.
    Reconciliation,
    /// Delivery failure rate.
    DeliveryFailure,
    /// Margin decline between first and last month.
    MarginDecline,
}

/// One raised alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Severity.
    pub severity: Severity,
    /// Rule.
    pub kind: AlertKind,
    /// Month key or period the alert refers to.
    pub period: String,
    /// Observed value.
    pub value: Decimal,
    /// Threshold that was crossed.
    pub threshold: Decimal,
    /// Human-readable description.
    pub message: String,
}

/// Evaluates the alert rules.
pub struct AlertRules;

impl AlertRules {
    /// Evaluates every rule. Critical alerts come first, then by kind, then period.
    #[must_use]
    pub fn evaluate(
        reconciliation: &[ReconciliationRow],
        orders: &OrderTotals,
        trends: &Trends,
        period: &Period,
        config: &EngineConfig,
    ) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = reconciliation
            .iter()
            .filter_map(|row| Self::reconciliation_alert(row, &config.reconciliation))
            .collect();
        alerts.extend(Self::failure_alert(orders, period, &config.alerts));
        alerts.extend(Self::margin_alert(trends, &config.alerts));

        alerts.sort_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then_with(|| a.kind.cmp(&b.kind))
                .then_with(|| a.period.cmp(&b.period))
        });
        alerts
    }

    fn reconciliation_alert(
        row: &ReconciliationRow,
        thresholds: &ReconciliationThresholds,
    ) -> Option<Alert> {
        let (severity, threshold) = match row.status {
            ReconciliationStatus::Critical => (Severity::Critical, thresholds.critical_percent),
            ReconciliationStatus::Warning => (Severity::Warning, thresholds.warning_percent),
            ReconciliationStatus::Ok => return None,
        };
        Some(Alert {
            severity,
            kind: AlertKind::Reconciliation,
            period: row.month.clone(),
            value: row.difference_percent,
            threshold,
            message: format!(
                "QR settlement for {} differs by {} ({}%) from internal records",
                row.month, row.difference, row.difference_percent
            ),
        })
    }

    fn failure_alert(
        orders: &OrderTotals,
        period: &Period,
        thresholds: &AlertThresholds,
    ) -> Option<Alert> {
        let exact = exact_percent(Decimal::from(orders.failed), Decimal::from(orders.total));
        let (severity, threshold) = if exact > thresholds.failure_rate_critical_percent {
            (Severity::Critical, thresholds.failure_rate_critical_percent)
        } else if exact > thresholds.failure_rate_warning_percent {
            (Severity::Warning, thresholds.failure_rate_warning_percent)
        } else {
            return None;
        };
        let rate = exact.round_dp(2);
        Some(Alert {
            severity,
            kind: AlertKind::DeliveryFailure,
            period: format!("{}..{}", period.from, period.to),
            value: rate,
            threshold,
            message: format!(
                "{} of {} orders were not delivered ({rate}%)",
                orders.failed, orders.total
            ),
        })
    }

    fn margin_alert(trends: &Trends, thresholds: &AlertThresholds) -> Option<Alert> {
        if !trends.has_signal {
            return None;
        }
        let decline = -trends.margin_trend_points;
        let (severity, threshold) = if decline > thresholds.margin_decline_critical_points {
            (Severity::Critical, thresholds.margin_decline_critical_points)
        } else if decline > thresholds.margin_decline_warning_points {
            (Severity::Warning, thresholds.margin_decline_warning_points)
        } else {
            return None;
        };
        let first = trends.first_month.as_deref().unwrap_or_default();
        let last = trends.last_month.as_deref().unwrap_or_default();
        Some(Alert {
            severity,
            kind: AlertKind::MarginDecline,
            period: format!("{first}..{last}"),
            value: trends.margin_trend_points,
            threshold: -threshold,
            message: format!("Gross margin fell {decline} points between {first} and {last}"),
        })
    }
}
