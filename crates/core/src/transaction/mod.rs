//! Transaction model and normalization.
//!
//! This module provides:
//! - Typed transaction records with closed payment and delivery enums
//! - Normalization of raw joined rows from the transaction source

pub mod error;
pub mod normalize;
pub mod types;

pub use error::NormalizeError;
pub use normalize::{NormalizedBatch, Normalizer, RawTransactionRecord, RejectedRecord};
pub use types::{
    DeliveryStatus, MachineRef, PaymentStatus, PaymentType, ProductRef, TransactionRecord,
    month_key,
};
