//! Raw user input as typed on the command line, validated into a
//! [`UserInput`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use pension_core::{FederalState, UserInput};

use crate::utils::{ParseDecimalError, parse_date, parse_decimal};

/// Every problem found in one pass over the form, one message per field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .messages.join(" "))]
pub struct FormError {
    pub messages: Vec<String>,
}

/// Form fields as entered. Amounts and dates stay strings until
/// [`InputForm::validate`] so every field can report its own error.
#[derive(Debug, Clone, Default)]
pub struct InputForm {
    pub birthday: String,
    pub expected_pension: String,
    pub current_pension_entitlement: String,
    pub statement_date: String,
    pub has_children: bool,
    /// Church tax as a fraction of income tax, e.g. `0.09`.
    pub church_tax_rate: Option<String>,
    /// Federal state whose church tax rate applies. Ignored when
    /// `church_tax_rate` is given.
    pub federal_state: Option<String>,
}

impl InputForm {
    /// Parse the form into a [`UserInput`], collecting all field errors.
    pub fn validate(&self) -> Result<UserInput, FormError> {
        let mut errors = Vec::new();

        let birthday = required_date(
            &mut errors,
            &self.birthday,
            "Bitte ein gültiges Geburtsdatum angeben.",
        );
        let statement_date = required_date(
            &mut errors,
            &self.statement_date,
            "Bitte ein gültiges Datum des Rentenbescheids angeben.",
        );
        let expected_pension = self.expected_pension(&mut errors);
        let entitlement = self.entitlement(&mut errors);
        let church_tax_rate = self.church_tax_rate(&mut errors);

        if let (Some(birthday), Some(statement)) = (birthday, statement_date) {
            if statement < birthday {
                errors.push("Das Datum des Rentenbescheids liegt vor dem Geburtstag.".to_string());
            }
        }

        match (birthday, expected_pension, entitlement, statement_date, church_tax_rate) {
            (
                Some(birthday),
                Some(expected_pension),
                Some(entitlement),
                Some(statement_date),
                Some(rate),
            ) if errors.is_empty() => Ok(UserInput {
                birthday,
                expected_pension,
                current_pension_entitlement: entitlement,
                statement_date,
                has_children: self.has_children,
                church_tax_rate: rate,
            }),
            _ => Err(FormError { messages: errors }),
        }
    }

    fn expected_pension(
        &self,
        errors: &mut Vec<String>,
    ) -> Option<Decimal> {
        if self.expected_pension.trim().is_empty() {
            errors.push("Die voraussichtliche Altersrente ist erforderlich.".to_string());
            return None;
        }
        match parse_decimal(&self.expected_pension) {
            Ok(v) if v > Decimal::ZERO => Some(v),
            Ok(_) => {
                errors.push("Die voraussichtliche Altersrente muss positiv sein.".to_string());
                None
            }
            Err(e) => {
                errors.push(number_error("Die voraussichtliche Altersrente", &e));
                None
            }
        }
    }

    /// Empty means nothing accrued yet.
    fn entitlement(
        &self,
        errors: &mut Vec<String>,
    ) -> Option<Decimal> {
        match parse_decimal(&self.current_pension_entitlement) {
            Ok(v) if v >= Decimal::ZERO => Some(v),
            Ok(_) => {
                errors.push(
                    "Die bisherige Rentenanwartschaft darf nicht negativ sein.".to_string(),
                );
                None
            }
            Err(e) => {
                errors.push(number_error("Die bisherige Rentenanwartschaft", &e));
                None
            }
        }
    }

    fn church_tax_rate(
        &self,
        errors: &mut Vec<String>,
    ) -> Option<Decimal> {
        if let Some(raw) = &self.church_tax_rate {
            return match parse_decimal(raw) {
                Ok(v) if (Decimal::ZERO..=Decimal::ONE).contains(&v) => Some(v),
                _ => {
                    errors.push("Der Kirchensteuersatz muss zwischen 0 und 1 liegen.".to_string());
                    None
                }
            };
        }

        match &self.federal_state {
            None => Some(Decimal::ZERO),
            Some(name) => match FederalState::parse(name) {
                Some(state) => Some(state.church_tax_rate()),
                None => {
                    errors.push(format!("Unbekanntes Bundesland: {}", name.trim()));
                    None
                }
            },
        }
    }
}

fn number_error(
    field: &str,
    error: &ParseDecimalError,
) -> String {
    match error {
        ParseDecimalError::GermanSeparators { .. } => {
            format!("{field} bitte mit Punkt als Dezimaltrennzeichen angeben, z. B. 1500.50.")
        }
        ParseDecimalError::Invalid { .. } => format!("{field} muss eine Zahl sein."),
    }
}

fn required_date(
    errors: &mut Vec<String>,
    value: &str,
    message: &str,
) -> Option<NaiveDate> {
    match parse_date(value) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(message.to_string());
            None
        }
    }
}
