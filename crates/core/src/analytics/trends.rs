//! First-versus-last month trends.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregation::percent;
use crate::finance::FinanceRow;

/// Change between the first and last month of the period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trends {
    /// First month compared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_month: Option<String>,
    /// Last month compared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_month: Option<String>,
    /// Revenue change relative to the first month.
    pub revenue_growth_percent: Decimal,
    /// Order count change relative to the first month.
    pub order_growth_percent: Decimal,
    /// Margin change in percentage points.
    pub margin_trend_points: Decimal,
    /// False when fewer than two months exist.
    pub has_signal: bool,
}

impl Trends {
    /// Compares the first and last rows of an ascending monthly breakdown.
    #[must_use]
    pub fn from_monthly(monthly: &[FinanceRow]) -> Self {
        let (Some(first), Some(last)) = (monthly.first(), monthly.last()) else {
            return Self::default();
        };
        if monthly.len() < 2 {
            return Self::default();
        }

        let first_orders = Decimal::from(first.order_count);
        let last_orders = Decimal::from(last.order_count);

        Self {
            first_month: Some(first.key.clone()),
            last_month: Some(last.key.clone()),
            revenue_growth_percent: percent(last.revenue - first.revenue, first.revenue),
            order_growth_percent: percent(last_orders - first_orders, first_orders),
            margin_trend_points: last.margin_percent - first.margin_percent,
            has_signal: true,
        }
    }
}
