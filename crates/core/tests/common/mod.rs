//! Shared fixtures for scenario tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;
use vendora_core::transaction::{
    DeliveryStatus, MachineRef, PaymentStatus, PaymentType, ProductRef, TransactionRecord,
};
use vendora_shared::types::{MachineId, ProductId, TransactionId};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(hour, 0, 0).unwrap()
}

/// A paid, delivered sale on machine `machine` of product `product`.
pub fn sale(
    id: u128,
    timestamp: NaiveDateTime,
    amount: Decimal,
    payment_type: PaymentType,
    machine: u128,
    product: u128,
) -> TransactionRecord {
    TransactionRecord {
        id: TransactionId::from_uuid(Uuid::from_u128(id)),
        timestamp,
        amount,
        payment_type,
        payment_status: PaymentStatus::Paid,
        delivery_status: DeliveryStatus::Delivered,
        machine: MachineRef {
            id: Some(MachineId::from_uuid(Uuid::from_u128(10_000 + machine))),
            code: format!("VM-{machine:03}"),
            address: format!("Street {machine}"),
            location_id: None,
        },
        product: ProductRef {
            id: Some(ProductId::from_uuid(Uuid::from_u128(20_000 + product))),
            name: format!("Product {product}"),
            category: "Drinks".to_string(),
        },
        ingredient_usage: BTreeMap::new(),
        cost_of_goods: None,
    }
}

/// 100 March 2024 sales over three machines, the first `failed` of them undelivered.
pub fn hundred_sales(failed: usize) -> Vec<TransactionRecord> {
    const TYPES: [PaymentType; 4] = [
        PaymentType::Cash,
        PaymentType::Qr,
        PaymentType::Vip,
        PaymentType::Credit,
    ];

    (0..100u32)
        .map(|i| {
            let mut record = sale(
                u128::from(i) + 1,
                at(2024, 3, 1 + i % 28, i % 24),
                Decimal::new(i64::from(1_000 + i * 37), 0),
                TYPES[(i % 4) as usize],
                u128::from(i % 3),
                u128::from(i % 7),
            );
            record
                .ingredient_usage
                .insert("coffee".to_string(), Decimal::new(8, 0));
            record.cost_of_goods = (i % 5 == 0).then(|| Decimal::new(400, 0));
            if (i as usize) < failed {
                record.delivery_status = DeliveryStatus::Failed;
            }
            record
        })
        .collect()
}
