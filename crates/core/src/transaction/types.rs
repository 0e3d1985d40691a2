//! Normalized transaction types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vendora_shared::types::{LocationId, MachineId, ProductId, TransactionId};

/// How a transaction was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentType {
    /// Coins or notes inserted into the machine.
    Cash,
    /// QR code payment settled by an external provider.
    Qr,
    /// VIP card or loyalty balance.
    Vip,
    /// Sold on credit.
    Credit,
    /// Service/test dispense. Never revenue.
    Test,
}

impl PaymentType {
    /// Payment types that count toward revenue, in report order.
    pub const REVENUE: [Self; 4] = [Self::Cash, Self::Qr, Self::Vip, Self::Credit];

    /// Returns true if transactions of this type count toward revenue.
    #[must_use]
    pub const fn is_revenue(self) -> bool {
        match self {
            Self::Cash | Self::Qr | Self::Vip | Self::Credit => true,
            Self::Test => false,
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "CASH"),
            Self::Qr => write!(f, "QR"),
            Self::Vip => write!(f, "VIP"),
            Self::Credit => write!(f, "CREDIT"),
            Self::Test => write!(f, "TEST"),
        }
    }
}

impl FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CASH" => Ok(Self::Cash),
            "QR" | "QR_CODE" => Ok(Self::Qr),
            "VIP" => Ok(Self::Vip),
            "CREDIT" => Ok(Self::Credit),
            "TEST" => Ok(Self::Test),
            _ => Err(format!("Unknown payment method: {s}")),
        }
    }
}

/// Completion status of the payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Payment completed.
    Paid,
    /// Payment not yet confirmed.
    Pending,
    /// Payment failed.
    Failed,
    /// Payment returned to the customer.
    Refunded,
    /// Payment cancelled before completion.
    Cancelled,
    /// Status not recognized.
    Unknown,
}

impl PaymentStatus {
    /// Parses a raw status, mapping anything unrecognized to `Unknown`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "PAID" | "COMPLETED" | "SUCCESS" => Self::Paid,
            "PENDING" | "CREATED" => Self::Pending,
            "FAILED" | "ERROR" => Self::Failed,
            "REFUNDED" => Self::Refunded,
            "CANCELLED" | "CANCELED" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }
}

/// Dispense outcome reported by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    /// Product dispensed.
    Delivered,
    /// Order completed end to end.
    Completed,
    /// Dispense still in progress.
    Pending,
    /// Machine reported a dispense error.
    Failed,
    /// Machine reported no dispense.
    NotDelivered,
    /// Dispense cancelled.
    Cancelled,
    /// Status not recognized.
    Unknown,
}

impl DeliveryStatus {
    /// Returns true if the status belongs to the successful delivery set.
    ///
    /// Only successful deliveries consume ingredients and carry cost of goods.
    #[must_use]
    pub const fn is_successful(self) -> bool {
        match self {
            Self::Delivered | Self::Completed => true,
            Self::Pending | Self::Failed | Self::NotDelivered | Self::Cancelled | Self::Unknown => {
                false
            }
        }
    }

    /// Parses a raw status, mapping anything unrecognized to `Unknown`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "DELIVERED" | "SUCCESS" => Self::Delivered,
            "COMPLETED" => Self::Completed,
            "PENDING" | "IN_PROGRESS" => Self::Pending,
            "FAILED" | "ERROR" => Self::Failed,
            "NOT_DELIVERED" => Self::NotDelivered,
            "CANCELLED" | "CANCELED" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Delivered => "DELIVERED",
            Self::Completed => "COMPLETED",
            Self::Pending => "PENDING",
            Self::Failed => "FAILED",
            Self::NotDelivered => "NOT_DELIVERED",
            Self::Cancelled => "CANCELLED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// Machine a transaction happened on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRef {
    /// Machine ID, if the join produced one.
    pub id: Option<MachineId>,
    /// Human-readable machine code.
    pub code: String,
    /// Installation address.
    pub address: String,
    /// Location the machine belongs to.
    pub location_id: Option<LocationId>,
}

/// Product that was sold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    /// Product ID, if the join produced one.
    pub id: Option<ProductId>,
    /// Product name.
    pub name: String,
    /// Product category.
    pub category: String,
}

/// A single normalized sales transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction ID.
    pub id: TransactionId,
    /// Wall-clock time at the machine.
    pub timestamp: NaiveDateTime,
    /// Charged amount.
    pub amount: Decimal,
    /// Payment type.
    pub payment_type: PaymentType,
    /// Payment completion status.
    pub payment_status: PaymentStatus,
    /// Dispense outcome.
    pub delivery_status: DeliveryStatus,
    /// Machine details.
    pub machine: MachineRef,
    /// Product details.
    pub product: ProductRef,
    /// Ingredient quantities consumed by one dispense.
    pub ingredient_usage: BTreeMap<String, Decimal>,
    /// Explicit cost of goods, if the source knows it.
    pub cost_of_goods: Option<Decimal>,
}

impl TransactionRecord {
    /// Calendar date of the transaction.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Month key in `YYYY-MM` form.
    #[must_use]
    pub fn month_key(&self) -> String {
        month_key(self.date())
    }

    /// Weekday index with 0 = Sunday.
    #[must_use]
    pub fn weekday_index(&self) -> usize {
        self.timestamp.weekday().num_days_from_sunday() as usize
    }

    /// Hour of day, 0 to 23.
    #[must_use]
    pub fn hour(&self) -> usize {
        self.timestamp.hour() as usize
    }

    /// Returns true if the payment completed.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Returns true if the product was dispensed.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.delivery_status.is_successful()
    }
}

/// Formats a date as a `YYYY-MM` month key.
#[must_use]
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_type_from_str_is_case_insensitive() {
        assert_eq!("cash".parse::<PaymentType>().unwrap(), PaymentType::Cash);
        assert_eq!(" Qr ".parse::<PaymentType>().unwrap(), PaymentType::Qr);
        assert_eq!("qr_code".parse::<PaymentType>().unwrap(), PaymentType::Qr);
        assert_eq!("VIP".parse::<PaymentType>().unwrap(), PaymentType::Vip);
        assert_eq!("credit".parse::<PaymentType>().unwrap(), PaymentType::Credit);
        assert_eq!("test".parse::<PaymentType>().unwrap(), PaymentType::Test);
        assert!("card".parse::<PaymentType>().is_err());
    }

    #[test]
    fn test_only_test_type_is_not_revenue() {
        assert!(PaymentType::REVENUE.iter().all(|t| t.is_revenue()));
        assert!(!PaymentType::Test.is_revenue());
    }

    #[test]
    fn test_successful_delivery_set() {
        assert!(DeliveryStatus::Delivered.is_successful());
        assert!(DeliveryStatus::Completed.is_successful());
        assert!(!DeliveryStatus::Pending.is_successful());
        assert!(!DeliveryStatus::Failed.is_successful());
        assert!(!DeliveryStatus::NotDelivered.is_successful());
        assert!(!DeliveryStatus::Cancelled.is_successful());
        assert!(!DeliveryStatus::Unknown.is_successful());
    }

    #[test]
    fn test_lenient_status_parsing() {
        assert_eq!(PaymentStatus::parse_lenient("paid"), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::parse_lenient("weird"), PaymentStatus::Unknown);
        assert_eq!(
            DeliveryStatus::parse_lenient("not_delivered"),
            DeliveryStatus::NotDelivered
        );
        assert_eq!(DeliveryStatus::parse_lenient(""), DeliveryStatus::Unknown);
    }

    #[test]
    fn test_month_key_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(month_key(date), "2024-03");
    }
}
