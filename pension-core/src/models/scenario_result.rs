use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Age at which retiring early has paid for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "age", rename_all = "camelCase")]
pub enum BreakEvenAge {
    /// Age in years, rounded to one decimal place.
    At(Decimal),
    /// The monthly difference to the standard scenario is too small to ever
    /// amortise.
    Never,
}

impl BreakEvenAge {
    pub fn age(&self) -> Option<Decimal> {
        match self {
            Self::At(age) => Some(*age),
            Self::Never => None,
        }
    }
}

impl fmt::Display for BreakEvenAge {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::At(age) => write!(f, "{age}"),
            Self::Never => f.write_str("never"),
        }
    }
}

/// One row of the projection table.
///
/// Currency amounts are rounded to two decimal places, `taxation_percentage`
/// to one. Values are final; renderers only format them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub months_early: u32,
    pub retirement_date: NaiveDate,

    /// Gross pension after the percentage deduction and the lost accrual.
    pub gross_pension: Decimal,

    /// Amount removed by the per-month early-retirement penalty.
    pub deduction_early_retirement: Decimal,

    /// Long-term-care insurance (PV).
    pub pv_contribution: Decimal,

    /// Health insurance (KV), retiree share only.
    pub kv_contribution: Decimal,

    pub tax: Decimal,
    pub church_tax: Decimal,
    pub net_pension: Decimal,
    pub break_even_age: BreakEvenAge,

    /// `net_pension` minus the standard scenario's `net_pension`.
    pub net_difference_to_standard: Decimal,

    /// Monthly taxable portion of the gross pension.
    pub taxable_income: Decimal,

    /// Taxable portion in percent, e.g. `97.0`.
    pub taxation_percentage: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn break_even_age_exposes_value() {
        assert_eq!(BreakEvenAge::At(dec!(81.4)).age(), Some(dec!(81.4)));
        assert_eq!(BreakEvenAge::Never.age(), None);
    }

    #[test]
    fn break_even_age_serializes_tagged() {
        let never = serde_json::to_string(&BreakEvenAge::Never).unwrap();
        let at = serde_json::to_string(&BreakEvenAge::At(dec!(80.5))).unwrap();

        assert_eq!(never, r#"{"kind":"never"}"#);
        assert_eq!(at, r#"{"kind":"at","age":"80.5"}"#);
    }
}
