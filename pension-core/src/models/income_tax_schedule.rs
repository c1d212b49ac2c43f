use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Coefficients of the German income tax tariff (§32a EStG).
///
/// | zone | annual taxable income `x` | tax                                          |
/// |------|---------------------------|----------------------------------------------|
/// | 0    | `x <= basic_allowance`    | 0                                            |
/// | 1    | `x <= zone1_upper`        | `(zone1_factor * y + zone1_rate) * y`        |
/// | 2    | `x <= zone2_upper`        | `(zone2_factor * z + zone2_rate) * z + zone2_offset` |
/// | 3    | `x <= zone3_upper`        | `zone3_rate * x - zone3_deduction`           |
/// | 4    | above                     | `top_rate * x - top_deduction`               |
///
/// with `y = (x - basic_allowance) / 10 000` and `z = (x - zone1_upper) / 10 000`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeTaxSchedule {
    pub basic_allowance: Decimal,
    pub zone1_upper: Decimal,
    pub zone1_factor: Decimal,
    pub zone1_rate: Decimal,
    pub zone2_upper: Decimal,
    pub zone2_factor: Decimal,
    pub zone2_rate: Decimal,
    pub zone2_offset: Decimal,
    pub zone3_upper: Decimal,
    pub zone3_rate: Decimal,
    pub zone3_deduction: Decimal,
    pub top_rate: Decimal,
    pub top_deduction: Decimal,
}

impl Default for IncomeTaxSchedule {
    /// Tariff for 2025.
    fn default() -> Self {
        Self {
            basic_allowance: Decimal::from(12_096),
            zone1_upper: Decimal::from(17_443),
            zone1_factor: Decimal::new(93_230, 2),
            zone1_rate: Decimal::from(1_400),
            zone2_upper: Decimal::from(68_480),
            zone2_factor: Decimal::new(17_664, 2),
            zone2_rate: Decimal::from(2_397),
            zone2_offset: Decimal::new(101_513, 2),
            zone3_upper: Decimal::from(277_825),
            zone3_rate: Decimal::new(42, 2),
            zone3_deduction: Decimal::new(1_091_192, 2),
            top_rate: Decimal::new(45, 2),
            top_deduction: Decimal::new(1_924_667, 2),
        }
    }
}

impl IncomeTaxSchedule {
    pub(crate) fn has_increasing_bounds(&self) -> bool {
        Decimal::ZERO <= self.basic_allowance
            && self.basic_allowance < self.zone1_upper
            && self.zone1_upper < self.zone2_upper
            && self.zone2_upper < self.zone3_upper
    }
}
