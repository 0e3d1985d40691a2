//! Builders for unit tests.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;
use vendora_shared::types::{MachineId, ProductId, TransactionId};

use crate::transaction::{
    DeliveryStatus, MachineRef, PaymentStatus, PaymentType, ProductRef, TransactionRecord,
};

/// Deterministic machine ID for index `n`.
pub fn machine_id(n: u128) -> MachineId {
    MachineId::from_uuid(Uuid::from_u128(1_000 + n))
}

/// Deterministic product ID for index `n`.
pub fn product_id(n: u128) -> ProductId {
    ProductId::from_uuid(Uuid::from_u128(2_000 + n))
}

/// Timestamp helper.
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// Fluent builder for `TransactionRecord`.
pub struct Tx(TransactionRecord);

impl Tx {
    /// A paid, delivered cash sale on machine 1 / product 1.
    pub fn new(id: u128, amount: Decimal) -> Self {
        Self(TransactionRecord {
            id: TransactionId::from_uuid(Uuid::from_u128(id)),
            timestamp: at(2024, 3, 5, 12),
            amount,
            payment_type: PaymentType::Cash,
            payment_status: PaymentStatus::Paid,
            delivery_status: DeliveryStatus::Delivered,
            machine: MachineRef {
                id: Some(machine_id(1)),
                code: "VM-001".to_string(),
                address: "Main St 1".to_string(),
                location_id: None,
            },
            product: ProductRef {
                id: Some(product_id(1)),
                name: "Espresso".to_string(),
                category: "Coffee".to_string(),
            },
            ingredient_usage: BTreeMap::new(),
            cost_of_goods: None,
        })
    }

    pub fn at(mut self, timestamp: NaiveDateTime) -> Self {
        self.0.timestamp = timestamp;
        self
    }

    pub fn paid_by(mut self, payment_type: PaymentType) -> Self {
        self.0.payment_type = payment_type;
        self
    }

    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.0.payment_status = status;
        self
    }

    pub fn delivery(mut self, status: DeliveryStatus) -> Self {
        self.0.delivery_status = status;
        self
    }

    pub fn machine(mut self, n: u128) -> Self {
        self.0.machine.id = Some(machine_id(n));
        self.0.machine.code = format!("VM-{n:03}");
        self
    }

    pub fn no_machine(mut self) -> Self {
        self.0.machine.id = None;
        self
    }

    pub fn product(mut self, n: u128) -> Self {
        self.0.product.id = Some(product_id(n));
        self.0.product.name = format!("Product {n}");
        self
    }

    pub fn no_product(mut self) -> Self {
        self.0.product.id = None;
        self
    }

    pub fn cost(mut self, cost: Decimal) -> Self {
        self.0.cost_of_goods = Some(cost);
        self
    }

    pub fn ingredient(mut self, name: &str, qty: Decimal) -> Self {
        self.0.ingredient_usage.insert(name.to_string(), qty);
        self
    }

    pub fn build(self) -> TransactionRecord {
        self.0
    }
}
