//! Hour-of-day distribution.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregation::{Bucket, Dimensions, count_percent};

/// Sales within one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRow {
    /// Hour, 0 to 23.
    pub hour: u8,
    /// Transactions.
    pub count: u64,
    /// Amount.
    pub amount: Decimal,
    /// Amount per transaction.
    pub average_check: Decimal,
    /// Share of all transactions.
    pub percent_of_count: Decimal,
}

/// Builds exactly 24 rows, hour 0 first, zero-filled.
#[must_use]
pub fn hourly_distribution(dims: &Dimensions<Bucket>) -> Vec<HourlyRow> {
    let total = dims.total.count;
    dims.by_hour
        .iter()
        .zip(0u8..)
        .map(|(bucket, hour)| HourlyRow {
            hour,
            count: bucket.count,
            amount: bucket.amount,
            average_check: bucket.average_check(),
            percent_of_count: count_percent(bucket.count, total),
        })
        .collect()
}
