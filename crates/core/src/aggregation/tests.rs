//! Property-based tests for the aggregation module.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{Aggregator, Bucket, Dimensions};
use crate::test_support::{Tx, at, machine_id, product_id};
use crate::transaction::{PaymentType, TransactionRecord};

const TYPES: [PaymentType; 5] = [
    PaymentType::Cash,
    PaymentType::Qr,
    PaymentType::Vip,
    PaymentType::Credit,
    PaymentType::Test,
];

fn arb_records() -> impl Strategy<Value = Vec<TransactionRecord>> {
    prop::collection::vec(
        (1i64..5_000_000, 0usize..5, 0u128..4, 0u128..6, 1u32..29, 0u32..24, 1u32..13),
        0..60,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (cents, ty, machine, product, day, hour, month))| {
                Tx::new(i as u128, Decimal::new(cents, 2))
                    .paid_by(TYPES[ty])
                    .machine(machine)
                    .product(product)
                    .at(at(2024, month, day, hour))
                    .build()
            })
            .collect()
    })
}

fn sum<'a>(buckets: impl Iterator<Item = &'a Bucket>) -> Bucket {
    let mut total = Bucket::default();
    for bucket in buckets {
        total.merge(bucket);
    }
    total
}

proptest! {
    /// Every complete dimension sums back to the total.
    #[test]
    fn test_conservation_per_dimension(records in arb_records()) {
        let expected_amount: Decimal = records.iter().map(|r| r.amount).sum();
        let expected = Bucket::new(records.len() as u64, expected_amount);
        let dims = Aggregator::aggregate(&records);

        prop_assert_eq!(dims.total, expected);
        prop_assert_eq!(sum(dims.by_payment_type.values()), expected);
        prop_assert_eq!(sum(dims.by_machine.values()), expected);
        prop_assert_eq!(sum(dims.by_product.values()), expected);
        prop_assert_eq!(sum(dims.by_month.values()), expected);
        prop_assert_eq!(sum(dims.by_weekday.iter()), expected);
        prop_assert_eq!(sum(dims.by_date.values()), expected);
        prop_assert_eq!(sum(dims.by_hour.iter()), expected);
    }

    /// Reordering the input never changes any bucket.
    #[test]
    fn test_order_independence(records in arb_records(), rotate in 0usize..60) {
        let forward = Aggregator::aggregate(&records);

        let mut shuffled = records.clone();
        shuffled.reverse();
        if !shuffled.is_empty() {
            let k = rotate % shuffled.len();
            shuffled.rotate_left(k);
        }
        let reordered = Aggregator::aggregate(&shuffled);

        prop_assert_eq!(forward.total, reordered.total);
        prop_assert_eq!(&forward.by_payment_type, &reordered.by_payment_type);
        prop_assert_eq!(&forward.by_machine, &reordered.by_machine);
        prop_assert_eq!(&forward.by_product, &reordered.by_product);
        prop_assert_eq!(&forward.by_month, &reordered.by_month);
        prop_assert_eq!(forward.by_weekday, reordered.by_weekday);
        prop_assert_eq!(&forward.by_date, &reordered.by_date);
        prop_assert_eq!(forward.by_hour, reordered.by_hour);
        prop_assert_eq!(&forward.machines, &reordered.machines);
    }
}

#[test]
fn test_empty_input_is_zero_filled() {
    let records: Vec<TransactionRecord> = Vec::new();
    let dims = Aggregator::aggregate(&records);
    assert_eq!(dims.total, Bucket::default());
    assert!(dims.by_month.is_empty());
    assert!(dims.by_weekday.iter().all(Bucket::is_empty));
    assert!(dims.by_hour.iter().all(Bucket::is_empty));
}

#[test]
fn test_weekday_index_starts_on_sunday() {
    // 2024-03-05 is a Tuesday, 2024-03-03 a Sunday.
    let records = vec![
        Tx::new(1, dec!(10)).at(at(2024, 3, 5, 9)).build(),
        Tx::new(2, dec!(20)).at(at(2024, 3, 3, 9)).build(),
    ];
    let dims = Aggregator::aggregate(&records);
    assert_eq!(dims.by_weekday[2], Bucket::new(1, dec!(10)));
    assert_eq!(dims.by_weekday[0], Bucket::new(1, dec!(20)));
    assert_eq!(dims.by_hour[9], Bucket::new(2, dec!(30)));
}

#[test]
fn test_missing_keys_counted_in_total_only() {
    let records = vec![
        Tx::new(1, dec!(10)).no_product().build(),
        Tx::new(2, dec!(20)).no_machine().build(),
        Tx::new(3, dec!(30)).build(),
    ];
    let dims = Aggregator::aggregate(&records);

    assert_eq!(dims.total, Bucket::new(3, dec!(60)));
    assert_eq!(dims.unkeyed_products, 1);
    assert_eq!(dims.unkeyed_machines, 1);
    assert_eq!(dims.by_product[&product_id(1)], Bucket::new(2, dec!(50)));
    assert_eq!(dims.by_machine[&machine_id(1)], Bucket::new(2, dec!(40)));
}

#[test]
fn test_generic_fold_with_custom_bucket() {
    let records = vec![
        Tx::new(1, dec!(10)).build(),
        Tx::new(2, dec!(20)).build(),
    ];
    let dims: Dimensions<u64> =
        Dimensions::build(&records, |n: &mut u64, _: &TransactionRecord| *n += 1);
    assert_eq!(dims.total, 2);
    assert_eq!(dims.by_month["2024-03"], 2);
}

#[test]
fn test_build_with_derives_once_per_record() {
    let records = vec![
        Tx::new(1, dec!(10)).build(),
        Tx::new(2, dec!(20)).no_machine().build(),
    ];
    let mut derived = 0;
    let dims: Dimensions<Decimal> = Dimensions::build_with(
        &records,
        |record| {
            derived += 1;
            record.amount * dec!(2)
        },
        |sum: &mut Decimal, _: &TransactionRecord, doubled: Decimal| *sum += doubled,
    );
    assert_eq!(derived, 2);
    assert_eq!(dims.total, dec!(60));
    assert_eq!(dims.by_machine[&machine_id(1)], dec!(20));
    assert_eq!(dims.by_hour[12], dec!(60));
}

#[test]
fn test_machine_labels_do_not_depend_on_order() {
    let mut a = Tx::new(1, dec!(1)).build();
    a.machine.code = "B-CODE".to_string();
    let mut b = Tx::new(2, dec!(1)).build();
    b.machine.code = "A-CODE".to_string();

    let forward = Aggregator::aggregate(&[a.clone(), b.clone()]);
    let backward = Aggregator::aggregate(&[b, a]);
    assert_eq!(forward.machines[&machine_id(1)].code, "A-CODE");
    assert_eq!(forward.machines, backward.machines);
}
