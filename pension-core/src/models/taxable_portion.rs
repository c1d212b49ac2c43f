use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Share of the pension subject to income tax for pensions starting in `year`
/// (Besteuerungsanteil).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxablePortion {
    pub year: i32,
    pub portion: Decimal,
}

/// Step table of taxable portions keyed by the year retirement starts.
///
/// A value holds from its year until a later entry supersedes it. Entries
/// must be sorted by strictly increasing year; see
/// [`PensionParameters::validate`](crate::PensionParameters::validate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxablePortionTable {
    entries: Vec<TaxablePortion>,
}

impl TaxablePortionTable {
    pub fn new(entries: Vec<TaxablePortion>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TaxablePortion] {
        &self.entries
    }

    /// Portion applicable to a pension starting in `year`: the entry with the
    /// greatest year not exceeding `year`, or zero before the first entry.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use pension_core::TaxablePortionTable;
    ///
    /// let table = TaxablePortionTable::default();
    ///
    /// assert_eq!(table.portion_for(2004), dec!(0));
    /// assert_eq!(table.portion_for(2025), dec!(0.85));
    /// assert_eq!(table.portion_for(2058), dec!(1.00));
    /// ```
    pub fn portion_for(
        &self,
        year: i32,
    ) -> Decimal {
        let upper = self.entries.partition_point(|e| e.year <= year);
        match upper.checked_sub(1) {
            Some(idx) => self.entries[idx].portion,
            None => Decimal::ZERO,
        }
    }

    pub(crate) fn is_strictly_increasing(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].year < w[1].year)
    }
}

impl Default for TaxablePortionTable {
    /// Portions under the Alterseinkünftegesetz: 50 % for 2005, plus two
    /// points a year to 80 % in 2020, then one point a year to 100 % in 2040.
    fn default() -> Self {
        let entries = (2005..=2040)
            .map(|year| {
                let points = if year <= 2020 {
                    50 + 2 * (year - 2005)
                } else {
                    80 + (year - 2020)
                };
                TaxablePortion {
                    year,
                    portion: Decimal::new(i64::from(points), 2),
                }
            })
            .collect();
        Self { entries }
    }
}
