//! Payment-type report (Structure A).
//!
//! This module provides:
//! - Paid-sales summary per payment type with count and amount shares
//! - Monthly, weekday, machine and product breakdowns split by payment type
//! - Per-type drill-downs
//! - QR provider apportionment through a pluggable settlement source

pub mod allocation;
pub mod service;
pub mod settlement;
pub mod types;


pub use allocation::Apportion;
pub use service::PaymentReportBuilder;
pub use settlement::{ExternalSettlements, FixedRatioSplit, ProviderSettlement, SettlementSource};
pub use types::*;
