//! Count/amount buckets and guarded arithmetic.
//!
//! Every ratio in a report goes through `ratio`, `percent` or `average`, which
//! substitute zero for a zero denominator. Decimal never produces NaN, but an
//! unguarded division by zero panics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::TransactionRecord;

/// Accumulator of order count and amount for one dimension value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Number of transactions.
    pub count: u64,
    /// Sum of transaction amounts.
    pub amount: Decimal,
}

impl Bucket {
    /// Creates a bucket with the given totals.
    #[must_use]
    pub const fn new(count: u64, amount: Decimal) -> Self {
        Self { count, amount }
    }

    /// Adds one transaction.
    pub fn add(&mut self, record: &TransactionRecord) {
        self.count += 1;
        self.amount += record.amount;
    }

    /// Adds another bucket's totals.
    pub fn merge(&mut self, other: &Self) {
        self.count += other.count;
        self.amount += other.amount;
    }

    /// Average amount per transaction, rounded to 2 decimals.
    #[must_use]
    pub fn average_check(&self) -> Decimal {
        average(self.amount, self.count)
    }

    /// Returns true if nothing was accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Unrounded `numerator / denominator`, or zero when the denominator is zero.
#[must_use]
pub fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Unrounded `part / whole * 100`, or zero when `whole` is zero.
///
/// Threshold and sign checks compare against this. Only reported values are
/// rounded.
#[must_use]
pub fn exact_percent(part: Decimal, whole: Decimal) -> Decimal {
    ratio(part, whole) * Decimal::ONE_HUNDRED
}

/// `part / whole * 100` rounded to 2 decimals, or zero when `whole` is zero.
#[must_use]
pub fn percent(part: Decimal, whole: Decimal) -> Decimal {
    exact_percent(part, whole).round_dp(2)
}

/// Percentage of two counts.
#[must_use]
pub fn count_percent(part: u64, whole: u64) -> Decimal {
    percent(Decimal::from(part), Decimal::from(whole))
}

/// `amount / count` rounded to 2 decimals, or zero when `count` is zero.
#[must_use]
pub fn average(amount: Decimal, count: u64) -> Decimal {
    ratio(amount, Decimal::from(count)).round_dp(2)
}
