//! Settlement reconciliation.
//!
//! Detects mismatches between internally recorded QR totals and the totals
//! providers settled, per month, and grades them against configured
//! tolerance thresholds.

pub mod service;
pub mod status;


pub use service::{ReconciliationEngine, ReconciliationRow};
pub use status::ReconciliationStatus;
