//! Closed reporting period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive date range a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// First day, inclusive.
    pub from: NaiveDate,
    /// Last day, inclusive.
    pub to: NaiveDate,
}

impl Period {
    /// Creates a period. Ordering is checked by the report assembler.
    #[must_use]
    pub const fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Returns true if `from` is not after `to`.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.from <= self.to
    }

    /// Returns true if the date falls within the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Number of calendar days, counting both ends. Zero for an inverted range.
    #[must_use]
    pub fn days(&self) -> u64 {
        u64::try_from((self.to - self.from).num_days() + 1).unwrap_or(0)
    }
}
