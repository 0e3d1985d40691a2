//! Dimensional aggregation.
//!
//! One O(n) pass over the filtered transactions produces buckets for payment
//! type, machine, product, month, weekday, date and hour. Accumulation is
//! purely additive, so the result is independent of input order.

pub mod bucket;
pub mod dimensions;
pub mod period;
pub mod ranking;

#[cfg(test)]
mod tests;

pub use bucket::{Bucket, average, count_percent, exact_percent, percent, ratio};
pub use dimensions::{Aggregator, Dimensions, HOURS, MONDAY_FIRST, WEEKDAY_NAMES, WEEKDAYS};
pub use period::Period;
pub use ranking::rank_by_amount;
