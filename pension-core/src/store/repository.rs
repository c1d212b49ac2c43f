use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use crate::models::{ScenarioResult, UserInput};

/// Logical key of the stored input record.
pub const USER_INPUT_KEY: &str = "lastUserInput";

/// Logical key of the stored result list.
pub const RESULTS_KEY: &str = "lastCalculationResults";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// What a store holds after the last successful calculation. Either part may
/// be missing; nothing stored is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LastCalculation {
    pub user_input: Option<UserInput>,
    pub results: Option<Vec<ScenarioResult>>,
}

impl LastCalculation {
    pub fn is_empty(&self) -> bool {
        self.user_input.is_none() && self.results.is_none()
    }
}

/// Single-slot persistence for the last input and its results.
#[async_trait]
pub trait CalculationStore: Send + Sync {
    /// Replaces both stored entries.
    async fn save_last_calculation(
        &self,
        input: &UserInput,
        results: &[ScenarioResult],
    ) -> Result<(), StoreError>;

    async fn load_last_calculation(&self) -> Result<LastCalculation, StoreError>;

    async fn clear_last_calculation(&self) -> Result<(), StoreError>;

    /// When the stored calculation was written. Backends that do not track
    /// this report `None`.
    async fn last_saved_at(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(None)
    }
}

/// Serializes a value for storage under one of the logical keys.
pub fn encode_entry<T: Serialize + ?Sized>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decodes a stored entry. Unreadable records are logged and treated as
/// absent so a damaged slot never blocks the caller.
pub fn decode_entry<T: DeserializeOwned>(
    key: &str,
    raw: Option<&str>,
) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(key, %error, "discarding unreadable stored entry");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_last_calculation() {
        assert!(LastCalculation::default().is_empty());
    }

    #[test]
    fn decode_missing_entry_is_none() {
        let decoded: Option<Vec<ScenarioResult>> = decode_entry(RESULTS_KEY, None);

        assert_eq!(decoded, None);
    }

    #[test]
    fn decode_garbage_is_none() {
        let decoded: Option<UserInput> = decode_entry(USER_INPUT_KEY, Some("{not json"));

        assert_eq!(decoded, None);
    }

    #[test]
    fn encode_then_decode_user_input() {
        let input = UserInput {
            birthday: chrono::NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            expected_pension: dec!(1000),
            current_pension_entitlement: dec!(120.40),
            statement_date: chrono::NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            has_children: false,
            church_tax_rate: dec!(0.08),
        };

        let raw = encode_entry(&input).unwrap();
        let decoded: Option<UserInput> = decode_entry(USER_INPUT_KEY, Some(&raw));

        assert!(raw.contains("\"expectedPension\":\"1000\""));
        assert_eq!(decoded, Some(input));
    }
}
