use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The figures a user enters for one projection.
///
/// Field names serialize in camelCase so stored records keep the layout the
/// front end has always written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub birthday: NaiveDate,

    /// Gross monthly pension expected at the regular retirement age.
    pub expected_pension: Decimal,

    /// Entitlement accrued so far, in EUR per month (from the pension statement).
    pub current_pension_entitlement: Decimal,

    /// Date the entitlement figure was valid as of.
    pub statement_date: NaiveDate,

    /// Parents pay the reduced long-term-care rate.
    #[serde(default)]
    pub has_children: bool,

    /// Church tax as a fraction of income tax (0, 0.08 or 0.09 in practice).
    #[serde(default)]
    pub church_tax_rate: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn deserializes_camel_case_record() {
        let json = r#"{
            "birthday": "1970-01-01",
            "expectedPension": "2000",
            "currentPensionEntitlement": "850.50",
            "statementDate": "2025-01-01",
            "hasChildren": true,
            "churchTaxRate": "0.09"
        }"#;

        let input: UserInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.birthday, NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
        assert_eq!(input.expected_pension, dec!(2000));
        assert_eq!(input.current_pension_entitlement, dec!(850.50));
        assert!(input.has_children);
        assert_eq!(input.church_tax_rate, dec!(0.09));
    }

    #[test]
    fn older_records_without_modifiers_use_defaults() {
        let json = r#"{
            "birthday": "1990-01-01",
            "expectedPension": "1000",
            "currentPensionEntitlement": "0",
            "statementDate": "2024-06-30"
        }"#;

        let input: UserInput = serde_json::from_str(json).unwrap();

        assert!(!input.has_children);
        assert_eq!(input.church_tax_rate, Decimal::ZERO);
    }
}
