//! Social insurance contributions and church tax deducted from the pension.

use rust_decimal::Decimal;

use crate::PensionParameters;

/// Retiree share of statutory health insurance (KV) on `gross`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use pension_core::PensionParameters;
/// use pension_core::calculations::health_contribution;
///
/// let params = PensionParameters::default();
///
/// // (14.6 % + 1.6 %) / 2 = 8.1 %
/// assert_eq!(health_contribution(dec!(1000), &params), dec!(81.000));
/// ```
pub fn health_contribution(
    gross: Decimal,
    params: &PensionParameters,
) -> Decimal {
    gross * params.retiree_health_rate()
}

/// Long-term-care insurance (PV) on `gross`. Pensioners pay the full rate.
pub fn care_contribution(
    gross: Decimal,
    params: &PensionParameters,
    has_children: bool,
) -> Decimal {
    gross * params.care_rate(has_children)
}

/// Church tax levied as a fraction of the income tax.
pub fn church_tax(
    income_tax: Decimal,
    rate: Decimal,
) -> Decimal {
    income_tax * rate
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn health_contribution_on_2000() {
        let params = PensionParameters::default();

        assert_eq!(health_contribution(dec!(2000), &params), dec!(162));
    }

    #[test]
    fn care_contribution_childless() {
        let params = PensionParameters::default();

        assert_eq!(care_contribution(dec!(1000), &params, false), dec!(34));
    }

    #[test]
    fn care_contribution_with_children() {
        let params = PensionParameters::default();

        assert_eq!(care_contribution(dec!(1000), &params, true), dec!(28));
    }

    #[test]
    fn church_tax_is_share_of_income_tax() {
        assert_eq!(church_tax(dec!(125.30), dec!(0.09)), dec!(11.277));
        assert_eq!(church_tax(dec!(125.30), dec!(0.08)), dec!(10.024));
    }

    #[test]
    fn no_church_tax_without_rate() {
        assert_eq!(church_tax(dec!(206.20), dec!(0)), dec!(0));
    }
}
