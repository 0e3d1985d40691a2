//! Core business logic for Vendora.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! It turns a bounded batch of vending-machine sales into report documents.
//!
//! # Modules
//!
//! - `transaction` - Typed transaction records and normalization of raw rows
//! - `aggregation` - Single-pass dimensional aggregation and guarded arithmetic
//! - `payments` - Payment-type report and QR settlement attribution
//! - `finance` - Revenue, cost of goods, margin and ingredient consumption
//! - `reconciliation` - QR settlement reconciliation with severity thresholds
//! - `analytics` - Product by machine matrix, hourly distribution, trends, alerts
//! - `reports` - Request validation, filtering and document assembly

pub mod aggregation;
pub mod analytics;
pub mod finance;
pub mod payments;
pub mod reconciliation;
pub mod reports;
pub mod transaction;

#[cfg(test)]
mod test_support;
