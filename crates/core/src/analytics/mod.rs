//! Cross-cutting analytics.
//!
//! This module provides:
//! - Product by machine matrix for the top sellers
//! - Hour-of-day distribution
//! - First-versus-last month trends
//! - Rule-based alerts over reconciliation, delivery failures and margin

pub mod alerts;
pub mod hourly;
pub mod matrix;
pub mod service;
pub mod trends;


pub use alerts::{Alert, AlertKind, AlertRules, Severity};
pub use hourly::{HourlyRow, hourly_distribution};
pub use matrix::{CrossMatrix, MatrixAxis};
pub use service::{AnalyticsBuilder, CrossAnalytics};
pub use trends::Trends;
