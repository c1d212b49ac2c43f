use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::factory::{StoreConfig, StoreFactory};
use super::repository::{
    CalculationStore, LastCalculation, RESULTS_KEY, StoreError, USER_INPUT_KEY, decode_entry,
    encode_entry,
};
use crate::models::{ScenarioResult, UserInput};

/// In-process store. Entries are kept as serialized text, the same way a
/// persistent backend holds them, and vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<&'static str, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<&'static str, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CalculationStore for MemoryStore {
    async fn save_last_calculation(
        &self,
        input: &UserInput,
        results: &[ScenarioResult],
    ) -> Result<(), StoreError> {
        let input = encode_entry(input)?;
        let results = encode_entry(results)?;

        let mut entries = self.entries()?;
        entries.insert(USER_INPUT_KEY, input);
        entries.insert(RESULTS_KEY, results);
        Ok(())
    }

    async fn load_last_calculation(&self) -> Result<LastCalculation, StoreError> {
        let entries = self.entries()?;
        Ok(LastCalculation {
            user_input: decode_entry(
                USER_INPUT_KEY,
                entries.get(USER_INPUT_KEY).map(String::as_str),
            ),
            results: decode_entry(RESULTS_KEY, entries.get(RESULTS_KEY).map(String::as_str)),
        })
    }

    async fn clear_last_calculation(&self) -> Result<(), StoreError> {
        let mut entries = self.entries()?;
        entries.remove(USER_INPUT_KEY);
        entries.remove(RESULTS_KEY);
        Ok(())
    }
}

/// [`StoreFactory`] for the `"memory"` backend. The connection string is
/// ignored.
pub struct MemoryStoreFactory;

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(
        &self,
        _config: &StoreConfig,
    ) -> Result<Box<dyn CalculationStore>, StoreError> {
        Ok(Box::new(MemoryStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::PensionProjection;

    fn sample() -> (UserInput, Vec<ScenarioResult>) {
        let input = UserInput {
            birthday: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            expected_pension: dec!(1000),
            current_pension_entitlement: dec!(0),
            statement_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            has_children: true,
            church_tax_rate: dec!(0),
        };
        let results = PensionProjection::default().calculate(&input).unwrap();
        (input, results)
    }

    #[tokio::test]
    async fn load_from_empty_store_returns_nothing() {
        let store = MemoryStore::new();

        let last = store.load_last_calculation().await.unwrap();

        assert!(last.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_returns_same_records() {
        let store = MemoryStore::new();
        let (input, results) = sample();

        store.save_last_calculation(&input, &results).await.unwrap();
        let last = store.load_last_calculation().await.unwrap();

        assert_eq!(last.user_input, Some(input));
        assert_eq!(last.results, Some(results));
    }

    #[tokio::test]
    async fn save_replaces_previous_calculation() {
        let store = MemoryStore::new();
        let (input, results) = sample();
        store.save_last_calculation(&input, &results).await.unwrap();

        let newer = UserInput {
            expected_pension: dec!(1500),
            ..input
        };
        store.save_last_calculation(&newer, &results[..1]).await.unwrap();
        let last = store.load_last_calculation().await.unwrap();

        assert_eq!(last.user_input.unwrap().expected_pension, dec!(1500));
        assert_eq!(last.results.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clear_removes_both_entries() {
        let store = MemoryStore::new();
        let (input, results) = sample();
        store.save_last_calculation(&input, &results).await.unwrap();

        store.clear_last_calculation().await.unwrap();

        assert!(store.load_last_calculation().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn factory_creates_empty_store() {
        let store = MemoryStoreFactory
            .create(&StoreConfig::in_memory())
            .await
            .unwrap();

        assert!(store.load_last_calculation().await.unwrap().is_empty());
    }
}
