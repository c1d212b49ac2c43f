use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{IncomeTaxSchedule, TaxablePortionTable};

/// Errors raised by [`PensionParameters::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("regular retirement age must be positive")]
    InvalidRetirementAge,

    #[error("pension point value must be positive, got {0}")]
    InvalidPointValue(Decimal),

    /// A rate fell outside [0, 1]. Carries the field name.
    #[error("{name} must be between 0 and 1, got {value}")]
    RateOutOfRange { name: &'static str, value: Decimal },

    #[error("minimum monthly loss must be non-negative, got {0}")]
    InvalidMinMonthlyLoss(Decimal),

    #[error("months-early scenarios must start at 0 and be strictly increasing")]
    InvalidScenarios,

    #[error("taxable portion table must be non-empty and sorted by strictly increasing year")]
    InvalidTaxablePortionTable,

    #[error("income tax zone bounds must be non-negative and strictly increasing")]
    InvalidTaxZones,
}

/// Every constant the projection depends on.
///
/// The defaults reflect the statutory values used for 2025 projections.
/// Missing fields fall back to their defaults when deserializing, so a
/// configuration file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PensionParameters {
    /// Regelaltersgrenze in whole years.
    pub regular_retirement_age: u32,

    /// EUR value of one pension point (Rentenwert).
    pub pension_point_value: Decimal,

    /// Early-retirement penalty per month brought forward.
    pub deduction_per_month: Decimal,

    /// General health insurance rate for pensioners (KVdR).
    pub health_base_rate: Decimal,

    /// Average supplemental health insurance rate (Zusatzbeitrag).
    pub health_supplemental_rate: Decimal,

    pub care_rate_childless: Decimal,
    pub care_rate_with_children: Decimal,

    /// Monthly net loss at or below which break-even is treated as never
    /// reached.
    pub min_monthly_loss: Decimal,

    pub months_early_scenarios: Vec<u32>,
    pub income_tax: IncomeTaxSchedule,
    pub taxable_portion: TaxablePortionTable,
}

impl Default for PensionParameters {
    fn default() -> Self {
        Self {
            regular_retirement_age: 67,
            pension_point_value: Decimal::new(3_760, 2),
            deduction_per_month: Decimal::new(3, 3),
            health_base_rate: Decimal::new(146, 3),
            health_supplemental_rate: Decimal::new(16, 3),
            care_rate_childless: Decimal::new(34, 3),
            care_rate_with_children: Decimal::new(28, 3),
            min_monthly_loss: Decimal::ONE,
            months_early_scenarios: (0..=48).step_by(6).collect(),
            income_tax: IncomeTaxSchedule::default(),
            taxable_portion: TaxablePortionTable::default(),
        }
    }
}

impl PensionParameters {
    /// Health insurance rate the pensioner pays: half of base plus
    /// supplemental rate, the pension fund carries the other half.
    pub fn retiree_health_rate(&self) -> Decimal {
        (self.health_base_rate + self.health_supplemental_rate) / Decimal::TWO
    }

    pub fn care_rate(
        &self,
        has_children: bool,
    ) -> Decimal {
        if has_children {
            self.care_rate_with_children
        } else {
            self.care_rate_childless
        }
    }

    /// Checks that every value is inside its valid range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParameterError`] found.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use pension_core::{ParameterError, PensionParameters};
    ///
    /// let params = PensionParameters {
    ///     deduction_per_month: dec!(1.5),
    ///     ..PensionParameters::default()
    /// };
    ///
    /// assert_eq!(
    ///     params.validate(),
    ///     Err(ParameterError::RateOutOfRange {
    ///         name: "deduction_per_month",
    ///         value: dec!(1.5),
    ///     })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.regular_retirement_age == 0 {
            return Err(ParameterError::InvalidRetirementAge);
        }
        if self.pension_point_value <= Decimal::ZERO {
            return Err(ParameterError::InvalidPointValue(self.pension_point_value));
        }

        let rates = [
            ("deduction_per_month", self.deduction_per_month),
            ("health_base_rate", self.health_base_rate),
            ("health_supplemental_rate", self.health_supplemental_rate),
            ("care_rate_childless", self.care_rate_childless),
            ("care_rate_with_children", self.care_rate_with_children),
        ];
        for (name, value) in rates {
            check_rate(name, value)?;
        }

        if self.min_monthly_loss < Decimal::ZERO {
            return Err(ParameterError::InvalidMinMonthlyLoss(self.min_monthly_loss));
        }

        let scenarios_ok = self.months_early_scenarios.first() == Some(&0)
            && self.months_early_scenarios.windows(2).all(|w| w[0] < w[1]);
        if !scenarios_ok {
            return Err(ParameterError::InvalidScenarios);
        }

        if self.taxable_portion.entries().is_empty()
            || !self.taxable_portion.is_strictly_increasing()
        {
            return Err(ParameterError::InvalidTaxablePortionTable);
        }
        for entry in self.taxable_portion.entries() {
            check_rate("taxable_portion", entry.portion)?;
        }

        if !self.income_tax.has_increasing_bounds() {
            return Err(ParameterError::InvalidTaxZones);
        }
        check_rate("zone3_rate", self.income_tax.zone3_rate)?;
        check_rate("top_rate", self.income_tax.top_rate)?;

        Ok(())
    }
}

fn check_rate(
    name: &'static str,
    value: Decimal,
) -> Result<(), ParameterError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ParameterError::RateOutOfRange { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{TaxablePortion, TaxablePortionTable};

    #[test]
    fn defaults_are_valid() {
        assert_eq!(PensionParameters::default().validate(), Ok(()));
    }

    #[test]
    fn default_scenarios_step_by_six_months() {
        let params = PensionParameters::default();

        assert_eq!(
            params.months_early_scenarios,
            vec![0, 6, 12, 18, 24, 30, 36, 42, 48]
        );
    }

    #[test]
    fn retiree_pays_half_of_health_rate() {
        let params = PensionParameters::default();

        assert_eq!(params.retiree_health_rate(), dec!(0.081));
    }

    #[test]
    fn care_rate_depends_on_children() {
        let params = PensionParameters::default();

        assert_eq!(params.care_rate(false), dec!(0.034));
        assert_eq!(params.care_rate(true), dec!(0.028));
    }

    #[test]
    fn rejects_zero_retirement_age() {
        let params = PensionParameters {
            regular_retirement_age: 0,
            ..PensionParameters::default()
        };

        assert_eq!(params.validate(), Err(ParameterError::InvalidRetirementAge));
    }

    #[test]
    fn rejects_non_positive_point_value() {
        let params = PensionParameters {
            pension_point_value: dec!(0),
            ..PensionParameters::default()
        };

        assert_eq!(
            params.validate(),
            Err(ParameterError::InvalidPointValue(dec!(0)))
        );
    }

    #[test]
    fn rejects_negative_health_rate() {
        let params = PensionParameters {
            health_base_rate: dec!(-0.01),
            ..PensionParameters::default()
        };

        assert_eq!(
            params.validate(),
            Err(ParameterError::RateOutOfRange {
                name: "health_base_rate",
                value: dec!(-0.01),
            })
        );
    }

    #[test]
    fn rejects_negative_min_monthly_loss() {
        let params = PensionParameters {
            min_monthly_loss: dec!(-1),
            ..PensionParameters::default()
        };

        assert_eq!(
            params.validate(),
            Err(ParameterError::InvalidMinMonthlyLoss(dec!(-1)))
        );
    }

    #[test]
    fn rejects_scenarios_without_standard_case() {
        let params = PensionParameters {
            months_early_scenarios: vec![6, 12],
            ..PensionParameters::default()
        };

        assert_eq!(params.validate(), Err(ParameterError::InvalidScenarios));
    }

    #[test]
    fn rejects_unsorted_scenarios() {
        let params = PensionParameters {
            months_early_scenarios: vec![0, 12, 6],
            ..PensionParameters::default()
        };

        assert_eq!(params.validate(), Err(ParameterError::InvalidScenarios));
    }

    #[test]
    fn rejects_empty_taxable_portion_table() {
        let params = PensionParameters {
            taxable_portion: TaxablePortionTable::new(vec![]),
            ..PensionParameters::default()
        };

        assert_eq!(
            params.validate(),
            Err(ParameterError::InvalidTaxablePortionTable)
        );
    }

    #[test]
    fn rejects_taxable_portion_above_one() {
        let params = PensionParameters {
            taxable_portion: TaxablePortionTable::new(vec![TaxablePortion {
                year: 2040,
                portion: dec!(1.1),
            }]),
            ..PensionParameters::default()
        };

        assert_eq!(
            params.validate(),
            Err(ParameterError::RateOutOfRange {
                name: "taxable_portion",
                value: dec!(1.1),
            })
        );
    }

    #[test]
    fn rejects_overlapping_tax_zones() {
        let mut params = PensionParameters::default();
        params.income_tax.zone2_upper = dec!(10000);

        assert_eq!(params.validate(), Err(ParameterError::InvalidTaxZones));
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let json = r#"{ "regular_retirement_age": 65, "pension_point_value": "39.32" }"#;

        let params: PensionParameters = serde_json::from_str(json).unwrap();

        assert_eq!(params.regular_retirement_age, 65);
        assert_eq!(params.pension_point_value, dec!(39.32));
        assert_eq!(params.deduction_per_month, dec!(0.003));
        assert_eq!(params.taxable_portion, TaxablePortionTable::default());
    }
}
