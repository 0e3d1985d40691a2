//! Tests for the financial report.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use vendora_shared::config::IngredientCatalog;

use super::{FinanceBucket, FinancialReport, FinancialReportBuilder};
use crate::aggregation::Period;
use crate::test_support::{Tx, at};
use crate::transaction::{DeliveryStatus, PaymentStatus, PaymentType, TransactionRecord};

fn march() -> Period {
    Period::new(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    )
}

fn catalog() -> IngredientCatalog {
    let mut catalog = IngredientCatalog::default();
    catalog.prices.insert("coffee".to_string(), dec!(100));
    catalog.prices.insert("cup".to_string(), dec!(50));
    catalog.package_sizes.insert("cup".to_string(), dec!(100));
    catalog
}

fn build(records: &[TransactionRecord]) -> FinancialReport {
    FinancialReportBuilder::build(records, &march(), &catalog())
}

#[test]
fn test_empty_report_is_zero_filled() {
    let report = build(&[]);

    assert_eq!(report.summary.period_days, 31);
    assert_eq!(report.summary.orders.total, 0);
    assert_eq!(report.summary.orders.success_rate, Decimal::ZERO);
    assert_eq!(report.summary.finance.margin_percent, Decimal::ZERO);
    assert_eq!(report.summary.finance.orders_per_day, Decimal::ZERO);
    assert!(report.monthly.is_empty());
    assert!(report.ingredients.lines.is_empty());
    assert!(report.failed_deliveries.is_empty());
}

#[test]
fn test_order_counts_and_success_rate() {
    let mut records: Vec<TransactionRecord> = (0..100u32)
        .map(|i| {
            Tx::new(u128::from(i), dec!(1000))
                .machine(u128::from(i % 3))
                .at(at(2024, 3, 1 + i % 28, 10))
                .build()
        })
        .collect();
    for record in records.iter_mut().take(8) {
        record.delivery_status = DeliveryStatus::Failed;
    }

    let report = build(&records);
    let orders = report.summary.orders;
    assert_eq!(orders.total, 100);
    assert_eq!(orders.successful, 92);
    assert_eq!(orders.failed, 8);
    assert_eq!(orders.success_rate, dec!(92));
    assert_eq!(report.failed_deliveries.len(), 8);
    assert_eq!(report.machines.len(), 3);
}

#[test]
fn test_revenue_counts_all_orders_cost_only_successful() {
    let records = vec![
        Tx::new(1, dec!(5000)).cost(dec!(2000)).build(),
        Tx::new(2, dec!(3000))
            .cost(dec!(1000))
            .delivery(DeliveryStatus::NotDelivered)
            .build(),
        Tx::new(3, dec!(2000))
            .ingredient("coffee", dec!(5))
            .ingredient("cup", dec!(1))
            .build(),
    ];
    let report = build(&records);
    let finance = report.summary.finance;

    assert_eq!(finance.revenue, dec!(10000));
    assert_eq!(finance.cost_of_goods, dec!(2550));
    assert_eq!(finance.gross_profit, dec!(7450));
    assert_eq!(finance.margin_percent, dec!(74.50));
    assert_eq!(finance.average_check, dec!(3333.33));
    assert_eq!(finance.orders_per_day, dec!(0.10));
}

#[test]
fn test_machine_rows_carry_revenue_share() {
    let records = vec![
        Tx::new(1, dec!(750)).machine(1).build(),
        Tx::new(2, dec!(250)).machine(2).build(),
    ];
    let report = build(&records);

    assert_eq!(report.machines[0].label, "VM-001");
    assert_eq!(report.machines[0].revenue_percent, Some(dec!(75)));
    assert_eq!(report.machines[1].revenue_percent, Some(dec!(25)));
    assert!(report.monthly[0].revenue_percent.is_none());
}

#[test]
fn test_ingredient_consumption_groups() {
    let records = vec![
        Tx::new(1, dec!(100))
            .at(at(2024, 3, 1, 8))
            .ingredient("coffee", dec!(7))
            .ingredient("cup", dec!(1))
            .build(),
        Tx::new(2, dec!(100))
            .at(at(2024, 3, 2, 8))
            .machine(2)
            .ingredient("coffee", dec!(8))
            .ingredient("cup", dec!(1))
            .ingredient("lid", dec!(1))
            .build(),
        Tx::new(3, dec!(100))
            .at(at(2024, 3, 2, 9))
            .ingredient("coffee", dec!(100))
            .delivery(DeliveryStatus::Failed)
            .build(),
    ];
    let report = build(&records);
    let ingredients = &report.ingredients;

    let names: Vec<&str> = ingredients.lines.iter().map(|l| l.ingredient.as_str()).collect();
    assert_eq!(names, vec!["coffee", "cup", "lid"]);
    assert_eq!(ingredients.lines[0].quantity, dec!(15));
    assert_eq!(ingredients.lines[0].cost, dec!(1500));
    assert_eq!(ingredients.lines[1].packages_used, Some(dec!(1)));
    assert_eq!(ingredients.lines[2].unit_price, None);
    assert_eq!(ingredients.total_cost, dec!(1600));
    assert_eq!(ingredients.unpriced, vec!["lid".to_string()]);

    assert_eq!(ingredients.by_month.len(), 1);
    assert_eq!(ingredients.by_day.len(), 2);
    assert_eq!(ingredients.by_machine.len(), 2);
    assert_eq!(ingredients.by_machine[0].label, "VM-001");
    assert_eq!(ingredients.by_machine[0].total_cost, dec!(750));
}

#[test]
fn test_failure_audit_sorted_by_time() {
    let records = vec![
        Tx::new(9, dec!(100))
            .at(at(2024, 3, 2, 8))
            .delivery(DeliveryStatus::Failed)
            .build(),
        Tx::new(3, dec!(100))
            .at(at(2024, 3, 1, 8))
            .delivery(DeliveryStatus::Cancelled)
            .paid_by(PaymentType::Qr)
            .build(),
        Tx::new(2, dec!(100))
            .at(at(2024, 3, 2, 8))
            .delivery(DeliveryStatus::Unknown)
            .status(PaymentStatus::Refunded)
            .build(),
        Tx::new(4, dec!(100)).build(),
    ];
    let report = build(&records);
    let audit = &report.failed_deliveries;

    assert_eq!(audit.len(), 3);
    assert_eq!(audit[0].status, DeliveryStatus::Cancelled);
    assert_eq!(audit[0].payment_type, PaymentType::Qr);
    assert_eq!(audit[1].status, DeliveryStatus::Unknown);
    assert_eq!(audit[2].status, DeliveryStatus::Failed);
    assert_eq!(audit[0].machine_code, "VM-001");
    assert_eq!(audit[0].product_name, "Espresso");
}

#[test]
fn test_negative_margin_when_cost_exceeds_revenue() {
    let mut bucket = FinanceBucket::default();
    bucket.add(&Tx::new(1, dec!(100)).cost(dec!(150)).build(), dec!(150));
    assert_eq!(bucket.profit(), dec!(-50));
    assert_eq!(bucket.margin_percent(), dec!(-50));
}

#[test]
fn test_thin_margin_keeps_sign_of_profit() {
    let mut gain = FinanceBucket::default();
    gain.add(&Tx::new(1, dec!(1000)).build(), dec!(999.99));
    assert_eq!(gain.profit(), dec!(0.01));
    assert_eq!(gain.margin_percent(), dec!(0.01));

    let mut loss = FinanceBucket::default();
    loss.add(&Tx::new(2, dec!(1000)).build(), dec!(1000.01));
    assert_eq!(loss.margin_percent(), dec!(-0.01));
}

proptest! {
    /// Margin has the sign of profit whenever revenue is positive.
    #[test]
    fn test_margin_sign(
        rows in prop::collection::vec((0i64..1_000_000, 0i64..2_000_000, any::<bool>()), 0..30)
    ) {
        let records: Vec<TransactionRecord> = rows
            .iter()
            .enumerate()
            .map(|(i, &(amount, cost, delivered))| {
                let tx = Tx::new(i as u128, Decimal::new(amount, 2)).cost(Decimal::new(cost, 2));
                if delivered { tx.build() } else { tx.delivery(DeliveryStatus::Failed).build() }
            })
            .collect();
        let report = build(&records);

        let rows = report
            .monthly
            .iter()
            .chain(&report.daily)
            .chain(&report.machines)
            .chain(&report.products);
        for row in rows {
            if row.revenue.is_zero() {
                prop_assert_eq!(row.margin_percent, Decimal::ZERO);
            } else {
                prop_assert_eq!(
                    row.margin_percent.cmp(&Decimal::ZERO),
                    row.profit.cmp(&Decimal::ZERO)
                );
            }
            prop_assert_eq!(row.successful_count + row.failed_count, row.order_count);
        }
    }
}
