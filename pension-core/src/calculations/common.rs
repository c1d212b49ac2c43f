//! Rounding and comparison helpers shared by the projection steps.
//!
//! Amounts are carried at full precision through every step and only rounded
//! when a [`ScenarioResult`](crate::ScenarioResult) is built.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a currency amount to cents, midpoints away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use pension_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(161.995)), dec!(162.00));
/// assert_eq!(round_half_up(dec!(-12.345)), dec!(-12.35));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to one decimal place, used for ages and percentages.
///
/// ```
/// use rust_decimal_macros::dec;
/// use pension_core::calculations::common::round_one_place;
///
/// assert_eq!(round_one_place(dec!(81.45)), dec!(81.5));
/// ```
pub fn round_one_place(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
