//! Tolerance-based reconciliation status.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vendora_shared::config::ReconciliationThresholds;

/// Severity of a settlement discrepancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReconciliationStatus {
    /// Within tolerance.
    Ok,
    /// At or above the warning threshold.
    Warning,
    /// At or above the critical threshold.
    Critical,
}

impl ReconciliationStatus {
    /// Classifies a difference percent, checking the critical threshold first.
    #[must_use]
    pub fn classify(difference_percent: Decimal, thresholds: &ReconciliationThresholds) -> Self {
        if difference_percent >= thresholds.critical_percent {
            Self::Critical
        } else if difference_percent >= thresholds.warning_percent {
            Self::Warning
        } else {
            Self::Ok
        }
    }
}

impl fmt::Display for ReconciliationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Warning => write!(f, "WARNING"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), ReconciliationStatus::Ok)]
    #[case(dec!(1.99), ReconciliationStatus::Ok)]
    #[case(dec!(2), ReconciliationStatus::Warning)]
    #[case(dec!(4.99), ReconciliationStatus::Warning)]
    #[case(dec!(5), ReconciliationStatus::Critical)]
    #[case(dec!(100), ReconciliationStatus::Critical)]
    fn test_classify_default_thresholds(
        #[case] percent: Decimal,
        #[case] expected: ReconciliationStatus,
    ) {
        let thresholds = ReconciliationThresholds::default();
        assert_eq!(ReconciliationStatus::classify(percent, &thresholds), expected);
    }

    #[test]
    fn test_equal_thresholds_skip_warning() {
        let thresholds = ReconciliationThresholds {
            warning_percent: dec!(3),
            critical_percent: dec!(3),
        };
        assert_eq!(
            ReconciliationStatus::classify(dec!(3), &thresholds),
            ReconciliationStatus::Critical
        );
    }
}
