//! Report error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that reject a report request before aggregation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Report kind string not recognized.
    #[error("Unknown report kind: {0}")]
    UnknownReportKind(String),

    /// Cross-analysis size of zero.
    #[error("Top-K must be at least 1")]
    InvalidTopK,
}
