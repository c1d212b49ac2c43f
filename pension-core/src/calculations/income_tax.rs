//! Progressive income tax on the taxable part of a pension.

use rust_decimal::Decimal;

use crate::IncomeTaxSchedule;
use crate::calculations::common::max;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const ZONE_SCALE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Evaluates an [`IncomeTaxSchedule`].
#[derive(Debug, Clone, Copy)]
pub struct IncomeTax<'a> {
    schedule: &'a IncomeTaxSchedule,
}

impl<'a> IncomeTax<'a> {
    pub fn new(schedule: &'a IncomeTaxSchedule) -> Self {
        Self { schedule }
    }

    /// Annual tax on annual taxable income `x`. Each progression zone works
    /// on its own offset from the zone's lower bound. `None` on overflow.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use pension_core::IncomeTaxSchedule;
    /// use pension_core::calculations::IncomeTax;
    ///
    /// let schedule = IncomeTaxSchedule::default();
    /// let tax = IncomeTax::new(&schedule);
    ///
    /// assert_eq!(tax.annual(dec!(12096)), Some(dec!(0)));
    /// assert_eq!(tax.annual(dec!(100000)), Some(dec!(31088.08)));
    /// ```
    pub fn annual(
        &self,
        x: Decimal,
    ) -> Option<Decimal> {
        let s = self.schedule;
        if x <= s.basic_allowance {
            Some(Decimal::ZERO)
        } else if x <= s.zone1_upper {
            let y = x.checked_sub(s.basic_allowance)? / ZONE_SCALE;
            s.zone1_factor.checked_mul(y)?.checked_add(s.zone1_rate)?.checked_mul(y)
        } else if x <= s.zone2_upper {
            let z = x.checked_sub(s.zone1_upper)? / ZONE_SCALE;
            s.zone2_factor
                .checked_mul(z)?
                .checked_add(s.zone2_rate)?
                .checked_mul(z)?
                .checked_add(s.zone2_offset)
        } else if x <= s.zone3_upper {
            s.zone3_rate.checked_mul(x)?.checked_sub(s.zone3_deduction)
        } else {
            s.top_rate.checked_mul(x)?.checked_sub(s.top_deduction)
        }
    }

    /// Monthly tax on a monthly taxable income: annualised, taxed, spread
    /// back over twelve months and clamped at zero.
    ///
    /// `None` when the annualised income leaves the `Decimal` range.
    pub fn monthly(
        &self,
        monthly_taxable: Decimal,
    ) -> Option<Decimal> {
        let annual_income = max(monthly_taxable.checked_mul(MONTHS_PER_YEAR)?, Decimal::ZERO);
        let annual_tax = self.annual(annual_income)?;
        Some(max(annual_tax / MONTHS_PER_YEAR, Decimal::ZERO))
    }
}
