//! Ratio apportionment using the Largest Remainder Method.
//!
//! Splitting a total across providers must not lose or invent a single unit:
//! the parts always sum exactly to the (rounded) total when the ratios sum
//! to one.
//!
//! 1. Calculate exact shares
//! 2. Round each share toward zero
//! 3. Hand the leftover units to the shares with the largest fractional parts
//!
//! Ties go to the earlier ratio, so the split is deterministic.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Apportionment utility.
pub struct Apportion;

impl Apportion {
    /// Splits `total` by `ratios`, rounded to `decimal_places`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use vendora_core::payments::Apportion;
    ///
    /// let parts = Apportion::by_ratios(dec!(100), &[dec!(0.5), dec!(0.3), dec!(0.2)], 2);
    /// assert_eq!(parts, vec![dec!(50), dec!(30), dec!(20)]);
    /// ```
    #[must_use]
    pub fn by_ratios(total: Decimal, ratios: &[Decimal], decimal_places: u32) -> Vec<Decimal> {
        if ratios.is_empty() {
            return vec![];
        }
        if total.is_sign_negative() {
            return Self::by_ratios(-total, ratios, decimal_places)
                .into_iter()
                .map(|part| -part)
                .collect();
        }

        let unit = Decimal::new(1, decimal_places);
        let total_rounded =
            total.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven);

        let exact: Vec<Decimal> = ratios.iter().map(|r| total_rounded * *r).collect();
        let mut rounded: Vec<Decimal> = exact
            .iter()
            .map(|a| a.round_dp_with_strategy(decimal_places, RoundingStrategy::ToZero))
            .collect();

        let sum_rounded: Decimal = rounded.iter().copied().sum();
        let remainder = total_rounded - sum_rounded;

        let units_to_distribute = (remainder / unit)
            .round_dp_with_strategy(0, RoundingStrategy::ToZero)
            .to_u64()
            .unwrap_or(0);
        let units_to_distribute = usize::try_from(units_to_distribute).unwrap_or(0);

        if units_to_distribute == 0 {
            return rounded;
        }

        let mut remainders: Vec<(usize, Decimal)> = exact
            .iter()
            .zip(rounded.iter())
            .enumerate()
            .map(|(i, (e, r))| (i, *e - *r))
            .collect();

        // Stable sort keeps ratio order on ties.
        remainders.sort_by(|a, b| b.1.cmp(&a.1));

        for (idx, _) in remainders.iter().take(units_to_distribute) {
            rounded[*idx] += unit;
        }

        rounded
    }

    /// Splits a whole-number count by `ratios`.
    #[must_use]
    pub fn counts(count: u64, ratios: &[Decimal]) -> Vec<u64> {
        Self::by_ratios(Decimal::from(count), ratios, 0)
            .into_iter()
            .map(|part| part.to_u64().unwrap_or(0))
            .collect()
    }
}
