//! Financial and margin report (Structure B).
//!
//! Revenue, cost of goods, gross profit and margin per month, day, machine
//! and product, with ingredient consumption and a delivery-failure audit.

pub mod cost;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use cost::CostModel;
pub use service::FinancialReportBuilder;
pub use types::*;
