//! Raw record normalization.
//!
//! The transaction source hands over loosely typed joined rows. This module
//! turns them into `TransactionRecord`s with closed enums and defined
//! defaults, so nothing downstream ever does arithmetic on a missing value.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;
use vendora_shared::types::{LocationId, MachineId, ProductId, TransactionId};

use super::error::NormalizeError;
use super::types::{
    DeliveryStatus, MachineRef, PaymentStatus, PaymentType, ProductRef, TransactionRecord,
};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// A joined transaction × machine × location × product row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTransactionRecord {
    /// Transaction ID.
    pub id: Option<Uuid>,
    /// Creation time, RFC 3339 or `YYYY-MM-DD HH:MM:SS`.
    pub created_at: Option<String>,
    /// Charged amount.
    pub amount: Option<Decimal>,
    /// Payment method discriminant.
    pub payment_method: Option<String>,
    /// Payment completion status.
    pub payment_status: Option<String>,
    /// Dispense status.
    pub delivery_status: Option<String>,
    /// Machine ID.
    pub machine_id: Option<Uuid>,
    /// Machine code.
    pub machine_code: Option<String>,
    /// Machine address.
    pub machine_address: Option<String>,
    /// Location ID.
    pub location_id: Option<Uuid>,
    /// Product ID.
    pub product_id: Option<Uuid>,
    /// Product name.
    pub product_name: Option<String>,
    /// Product category.
    pub product_category: Option<String>,
    /// Ingredient quantities per dispense.
    pub ingredient_usage: Option<BTreeMap<String, Decimal>>,
    /// Explicit cost of goods.
    pub cost_of_goods: Option<Decimal>,
}

/// A record that failed normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Position in the input batch.
    pub index: usize,
    /// Why the record was rejected.
    pub error: NormalizeError,
}

/// Result of normalizing a batch.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Records that normalized cleanly.
    pub records: Vec<TransactionRecord>,
    /// Records that were skipped.
    pub rejected: Vec<RejectedRecord>,
}

/// Maps raw rows into typed transactions.
pub struct Normalizer;

impl Normalizer {
    /// Normalizes one raw record.
    pub fn normalize(raw: &RawTransactionRecord) -> Result<TransactionRecord, NormalizeError> {
        let id = raw.id.ok_or(NormalizeError::MissingField("id"))?;
        let created_at = raw
            .created_at
            .as_deref()
            .ok_or(NormalizeError::MissingField("createdAt"))?;
        let timestamp = parse_timestamp(created_at).ok_or_else(|| NormalizeError::InvalidTimestamp {
            id,
            value: created_at.to_string(),
        })?;
        let amount = raw.amount.ok_or(NormalizeError::MissingField("amount"))?;

        let method = raw
            .payment_method
            .as_deref()
            .ok_or(NormalizeError::MissingField("paymentMethod"))?;
        let payment_type: PaymentType =
            method
                .parse()
                .map_err(|_| NormalizeError::UnknownPaymentMethod {
                    id,
                    method: method.to_string(),
                })?;

        let ingredient_usage = raw.ingredient_usage.clone().unwrap_or_default();
        if let Some((ingredient, _)) = ingredient_usage
            .iter()
            .find(|(_, qty)| qty.is_sign_negative() && !qty.is_zero())
        {
            return Err(NormalizeError::NegativeIngredientQuantity {
                id,
                ingredient: ingredient.clone(),
            });
        }

        Ok(TransactionRecord {
            id: TransactionId::from_uuid(id),
            timestamp,
            amount,
            payment_type,
            payment_status: raw
                .payment_status
                .as_deref()
                .map_or(PaymentStatus::Unknown, PaymentStatus::parse_lenient),
            delivery_status: raw
                .delivery_status
                .as_deref()
                .map_or(DeliveryStatus::Unknown, DeliveryStatus::parse_lenient),
            machine: MachineRef {
                id: raw.machine_id.map(MachineId::from_uuid),
                code: raw.machine_code.clone().unwrap_or_default(),
                address: raw.machine_address.clone().unwrap_or_default(),
                location_id: raw.location_id.map(LocationId::from_uuid),
            },
            product: ProductRef {
                id: raw.product_id.map(ProductId::from_uuid),
                name: raw.product_name.clone().unwrap_or_default(),
                category: raw.product_category.clone().unwrap_or_default(),
            },
            ingredient_usage,
            cost_of_goods: raw.cost_of_goods,
        })
    }

    /// Normalizes a batch, skipping records that cannot be normalized.
    ///
    /// Rejections are logged and returned so the caller can surface them as
    /// data-quality counters; they never abort the batch.
    #[must_use]
    pub fn normalize_batch(raw: &[RawTransactionRecord]) -> NormalizedBatch {
        let mut batch = NormalizedBatch {
            records: Vec::with_capacity(raw.len()),
            rejected: Vec::new(),
        };

        for (index, record) in raw.iter().enumerate() {
            match Self::normalize(record) {
                Ok(normalized) => batch.records.push(normalized),
                Err(error) => {
                    warn!(index, %error, "Skipping transaction record");
                    batch.rejected.push(RejectedRecord { index, error });
                }
            }
        }

        batch
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}
