//! Explicit ordering for ranked breakdown rows.

use rust_decimal::Decimal;

/// Sorts rows by amount descending, then label ascending, then key ascending.
///
/// Ties are fully broken, so the order never depends on input order.
pub fn rank_by_amount<T, F>(rows: &mut [T], sort_key: F)
where
    F: Fn(&T) -> (Decimal, &str, &str),
{
    rows.sort_by(|a, b| {
        let (amount_a, label_a, key_a) = sort_key(a);
        let (amount_b, label_b, key_b) = sort_key(b);
        amount_b
            .cmp(&amount_a)
            .then_with(|| label_a.cmp(label_b))
            .then_with(|| key_a.cmp(key_b))
    });
}
