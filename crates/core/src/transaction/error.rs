//! Normalization error types.

use thiserror::Error;
use uuid::Uuid;

/// Reasons a raw record cannot become a `TransactionRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// A required field is absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Payment method is not one of the known payment types.
    #[error("Unknown payment method on {id}: {method}")]
    UnknownPaymentMethod {
        /// Transaction ID.
        id: Uuid,
        /// Raw payment method.
        method: String,
    },

    /// Timestamp could not be parsed.
    #[error("Invalid timestamp on {id}: {value}")]
    InvalidTimestamp {
        /// Transaction ID.
        id: Uuid,
        /// Raw timestamp.
        value: String,
    },

    /// An ingredient quantity is negative.
    #[error("Negative quantity for ingredient {ingredient} on {id}")]
    NegativeIngredientQuantity {
        /// Transaction ID.
        id: Uuid,
        /// Ingredient name.
        ingredient: String,
    },
}
