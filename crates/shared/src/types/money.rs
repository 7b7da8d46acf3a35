//! Currency arithmetic helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for currency amounts.
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Rounds an amount to two decimal places, half away from zero.
///
/// This is the usual cash rounding: `2.345` becomes `2.35` and `-2.345`
/// becomes `-2.35`.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Applies a percentage discount and rounds the result to currency precision.
///
/// `amount × (100 − discount_pct) / 100`, rounded with [`round_currency`].
#[must_use]
pub fn apply_discount(amount: Decimal, discount_pct: Decimal) -> Decimal {
    let hundred = Decimal::ONE_HUNDRED;
    round_currency(amount * (hundred - discount_pct) / hundred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(2.345), dec!(2.35))]
    #[case(dec!(2.344), dec!(2.34))]
    #[case(dec!(-2.345), dec!(-2.35))]
    #[case(dec!(0.005), dec!(0.01))]
    #[case(dec!(24), dec!(24.00))]
    fn test_round_currency(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_currency(input), expected);
    }

    #[rstest]
    #[case(dec!(24.00), dec!(0), dec!(24.00))]
    #[case(dec!(100.00), dec!(10), dec!(90.00))]
    #[case(dec!(10.01), dec!(50), dec!(5.01))]
    #[case(dec!(33.33), dec!(12.5), dec!(29.16))]
    #[case(dec!(50.00), dec!(100), dec!(0.00))]
    fn test_apply_discount(
        #[case] amount: Decimal,
        #[case] discount: Decimal,
        #[case] expected: Decimal,
    ) {
        assert_eq!(apply_discount(amount, discount), expected);
    }
}
