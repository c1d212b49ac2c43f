//! Early-retirement projection across all "months early" scenarios.
//!
//! # Steps per scenario
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Retirement date: regular date minus months early |
//! | 2    | Taxable portion for the retirement start year |
//! | 3    | Percentage deduction: expected × rate × months early |
//! | 4    | Lost accrual: average future points per month × months early × point value |
//! | 5    | Health (KV) and long-term-care (PV) contributions on gross |
//! | 6    | Income tax on gross × taxable portion, then church tax |
//! | 7    | Net = gross − KV − PV − tax − church tax |
//! | 8    | Break-even age against the standard scenario's net |
//!
//! The standard (zero months early) scenario is computed first and handed
//! to every later scenario as a [`Baseline`].
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use pension_core::{PensionParameters, PensionProjection, UserInput};
//!
//! let input = UserInput {
//!     birthday: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
//!     expected_pension: dec!(2000),
//!     current_pension_entitlement: dec!(0),
//!     statement_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!     has_children: false,
//!     church_tax_rate: dec!(0),
//! };
//!
//! let projection = PensionProjection::new(PensionParameters::default());
//! let results = projection.calculate(&input).unwrap();
//!
//! assert_eq!(results.len(), 9);
//! assert_eq!(results[0].gross_pension, dec!(2000.00));
//! assert_eq!(results[0].kv_contribution, dec!(162.00));
//! assert_eq!(results[4].deduction_early_retirement, dec!(144.00));
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calculations::common::{max, round_half_up, round_one_place};
use crate::calculations::contributions::{care_contribution, church_tax, health_contribution};
use crate::calculations::income_tax::IncomeTax;
use crate::calculations::retirement::{
    early_retirement_date, months_between, regular_retirement_date, retirement_start_year,
};
use crate::{BreakEvenAge, ParameterError, PensionParameters, ScenarioResult, UserInput};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Errors that can occur while projecting a pension.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("expected pension must be positive, got {0}")]
    NonPositivePension(Decimal),

    #[error("current pension entitlement must not be negative, got {0}")]
    NegativeEntitlement(Decimal),

    #[error("church tax rate must be between 0 and 1, got {0}")]
    InvalidChurchTaxRate(Decimal),

    #[error("statement date {statement} lies before birthday {birthday}")]
    StatementBeforeBirth {
        birthday: NaiveDate,
        statement: NaiveDate,
    },

    #[error("invalid parameters: {0}")]
    InvalidParameters(#[from] ParameterError),

    /// Date arithmetic left the supported calendar range.
    #[error("retirement date out of range")]
    DateOutOfRange,

    /// An intermediate amount left the `Decimal` range.
    #[error("calculation failed: amount exceeds the supported range")]
    Overflow,
}

impl ProjectionError {
    /// True for errors caused by the user's figures rather than the
    /// parameters or the computation itself.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::NonPositivePension(_)
                | Self::NegativeEntitlement(_)
                | Self::InvalidChurchTaxRate(_)
                | Self::StatementBeforeBirth { .. }
        )
    }
}

/// Net pension of the standard scenario, which every early scenario is
/// measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    pub net_pension: Decimal,
}

/// Values fixed per input, shared by all scenarios.
#[derive(Debug, Clone, Copy)]
struct Timeline {
    regular_retirement_date: NaiveDate,
    months_to_retirement: u32,
    average_monthly_points: Decimal,
}

/// One scenario at full precision, before rounding.
#[derive(Debug, Clone)]
struct Scenario {
    months_early: u32,
    retirement_date: NaiveDate,
    gross_pension: Decimal,
    deduction_early_retirement: Decimal,
    kv_contribution: Decimal,
    pv_contribution: Decimal,
    taxable_portion: Decimal,
    taxable_income: Decimal,
    tax: Decimal,
    church_tax: Decimal,
    net_pension: Decimal,
}

/// Calculator for the early-retirement projection table.
#[derive(Debug, Clone, Default)]
pub struct PensionProjection {
    params: PensionParameters,
}

impl PensionProjection {
    pub fn new(params: PensionParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PensionParameters {
        &self.params
    }

    /// Projects every configured scenario, ordered by ascending months early.
    ///
    /// The input is never modified and identical input yields identical
    /// output.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] if:
    /// - the parameters fail [`PensionParameters::validate`]
    /// - the expected pension is not positive, the entitlement is negative,
    ///   the church tax rate is outside [0, 1] or the statement predates the
    ///   birthday
    /// - a retirement date cannot be represented
    /// - an intermediate amount overflows ([`ProjectionError::Overflow`])
    pub fn calculate(
        &self,
        input: &UserInput,
    ) -> Result<Vec<ScenarioResult>, ProjectionError> {
        self.params.validate()?;
        validate_input(input)?;

        let timeline = self.timeline(input)?;
        info!(
            regular_retirement_date = %timeline.regular_retirement_date,
            months_to_retirement = timeline.months_to_retirement,
            "starting pension projection"
        );

        let standard = self.scenario(input, &timeline, 0)?;
        let baseline = Baseline {
            net_pension: standard.net_pension,
        };
        let standard_age = Decimal::from(self.params.regular_retirement_age);

        let mut results = Vec::with_capacity(self.params.months_early_scenarios.len());
        results.push(standard.into_result(BreakEvenAge::At(round_one_place(standard_age))));

        for &months_early in self.params.months_early_scenarios.iter().skip(1) {
            let scenario = self.scenario(input, &timeline, months_early)?;
            let break_even = self.break_even_age(&scenario, baseline)?;
            results.push(scenario.into_result(break_even));
        }

        apply_net_differences(&mut results)?;

        info!(scenarios = results.len(), "pension projection finished");
        Ok(results)
    }

    fn timeline(
        &self,
        input: &UserInput,
    ) -> Result<Timeline, ProjectionError> {
        let regular =
            regular_retirement_date(input.birthday, self.params.regular_retirement_age)
                .ok_or(ProjectionError::DateOutOfRange)?;

        let months = months_between(input.statement_date, regular).max(1);
        let months_to_retirement =
            u32::try_from(months).map_err(|_| ProjectionError::DateOutOfRange)?;

        let point_value = self.params.pension_point_value;
        let expected_points = checked(input.expected_pension.checked_div(point_value))?;
        let current_points = checked(input.current_pension_entitlement.checked_div(point_value))?;
        let future_points = max(
            checked(expected_points.checked_sub(current_points))?,
            Decimal::ZERO,
        );

        Ok(Timeline {
            regular_retirement_date: regular,
            months_to_retirement,
            average_monthly_points: future_points / Decimal::from(months_to_retirement),
        })
    }

    fn scenario(
        &self,
        input: &UserInput,
        timeline: &Timeline,
        months_early: u32,
    ) -> Result<Scenario, ProjectionError> {
        let params = &self.params;

        let retirement_date =
            early_retirement_date(timeline.regular_retirement_date, months_early)
                .ok_or(ProjectionError::DateOutOfRange)?;
        let start_year =
            retirement_start_year(input.birthday, params.regular_retirement_age, months_early);
        let taxable_portion = params.taxable_portion.portion_for(start_year);

        let mut gross_pension = input.expected_pension;
        let mut deduction_early_retirement = Decimal::ZERO;
        if months_early > 0 {
            deduction_early_retirement = checked(
                input
                    .expected_pension
                    .checked_mul(params.deduction_per_month)
                    .and_then(|d| d.checked_mul(Decimal::from(months_early))),
            )?;
            let lost_accrual = self.lost_accrual(timeline, months_early)?;
            gross_pension = checked(
                gross_pension
                    .checked_sub(deduction_early_retirement)
                    .and_then(|g| g.checked_sub(lost_accrual)),
            )?;
        }
        if gross_pension < Decimal::ZERO {
            warn!(
                months_early,
                gross_pension = %gross_pension,
                "gross pension below zero, clamping"
            );
            gross_pension = Decimal::ZERO;
        }

        let kv_contribution = health_contribution(gross_pension, params);
        let pv_contribution = care_contribution(gross_pension, params, input.has_children);

        let taxable_income = checked(gross_pension.checked_mul(taxable_portion))?;
        let tax = checked(IncomeTax::new(&params.income_tax).monthly(taxable_income))?;
        let church_tax = church_tax(tax, input.church_tax_rate);

        let net_pension = checked(
            gross_pension
                .checked_sub(kv_contribution)
                .and_then(|n| n.checked_sub(pv_contribution))
                .and_then(|n| n.checked_sub(tax))
                .and_then(|n| n.checked_sub(church_tax)),
        )?;

        debug!(
            months_early,
            start_year,
            gross_pension = %gross_pension,
            tax = %tax,
            net_pension = %net_pension,
            "scenario computed"
        );

        Ok(Scenario {
            months_early,
            retirement_date,
            gross_pension,
            deduction_early_retirement,
            kv_contribution,
            pv_contribution,
            taxable_portion,
            taxable_income,
            tax,
            church_tax,
            net_pension,
        })
    }

    /// Pension from points that would have accrued between the early and
    /// the regular retirement date. Capped at the months actually left until
    /// retirement, so no more than the future points can be forfeited.
    fn lost_accrual(
        &self,
        timeline: &Timeline,
        months_early: u32,
    ) -> Result<Decimal, ProjectionError> {
        let lost_months = months_early.min(timeline.months_to_retirement);
        checked(
            timeline
                .average_monthly_points
                .checked_mul(Decimal::from(lost_months))
                .and_then(|points| points.checked_mul(self.params.pension_point_value)),
        )
    }

    /// Age at which the months drawn early outweigh the permanently lower
    /// net pension.
    fn break_even_age(
        &self,
        scenario: &Scenario,
        baseline: Baseline,
    ) -> Result<BreakEvenAge, ProjectionError> {
        let monthly_loss = checked(baseline.net_pension.checked_sub(scenario.net_pension))?.abs();
        if monthly_loss <= self.params.min_monthly_loss {
            return Ok(BreakEvenAge::Never);
        }

        let months_early = Decimal::from(scenario.months_early);
        let break_even_months = checked(
            scenario
                .net_pension
                .checked_mul(months_early)
                .and_then(|m| m.checked_div(monthly_loss)),
        )?;
        let retirement_age =
            Decimal::from(self.params.regular_retirement_age) - months_early / MONTHS_PER_YEAR;

        let age = checked(retirement_age.checked_add(break_even_months / MONTHS_PER_YEAR))?;
        Ok(BreakEvenAge::At(round_one_place(age)))
    }
}

impl Scenario {
    fn into_result(
        self,
        break_even_age: BreakEvenAge,
    ) -> ScenarioResult {
        ScenarioResult {
            months_early: self.months_early,
            retirement_date: self.retirement_date,
            gross_pension: round_half_up(self.gross_pension),
            deduction_early_retirement: round_half_up(self.deduction_early_retirement),
            pv_contribution: round_half_up(self.pv_contribution),
            kv_contribution: round_half_up(self.kv_contribution),
            tax: round_half_up(self.tax),
            church_tax: round_half_up(self.church_tax),
            net_pension: round_half_up(self.net_pension),
            break_even_age,
            net_difference_to_standard: Decimal::ZERO,
            taxable_income: round_half_up(self.taxable_income),
            taxation_percentage: round_one_place(self.taxable_portion * PERCENT),
        }
    }
}

/// Final pass: difference of each rounded net pension to the standard one.
fn apply_net_differences(results: &mut [ScenarioResult]) -> Result<(), ProjectionError> {
    let Some(standard_net) = results.first().map(|r| r.net_pension) else {
        return Ok(());
    };
    for result in results.iter_mut() {
        let difference = checked(result.net_pension.checked_sub(standard_net))?;
        result.net_difference_to_standard = round_half_up(difference);
    }
    Ok(())
}

fn checked(value: Option<Decimal>) -> Result<Decimal, ProjectionError> {
    value.ok_or(ProjectionError::Overflow)
}

fn validate_input(input: &UserInput) -> Result<(), ProjectionError> {
    if input.expected_pension <= Decimal::ZERO {
        return Err(ProjectionError::NonPositivePension(input.expected_pension));
    }
    if input.current_pension_entitlement < Decimal::ZERO {
        return Err(ProjectionError::NegativeEntitlement(
            input.current_pension_entitlement,
        ));
    }
    if input.church_tax_rate < Decimal::ZERO || input.church_tax_rate > Decimal::ONE {
        return Err(ProjectionError::InvalidChurchTaxRate(input.church_tax_rate));
    }
    if input.statement_date < input.birthday {
        return Err(ProjectionError::StatementBeforeBirth {
            birthday: input.birthday,
            statement: input.statement_date,
        });
    }
    Ok(())
}
