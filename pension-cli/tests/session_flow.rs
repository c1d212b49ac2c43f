//! Session behaviour with substitute calculators.

use std::cell::Cell;
use std::rc::Rc;

use chrono::NaiveDate;
use pension_cli::app;
use pension_cli::form::InputForm;
use pension_cli::session::{CalculationSession, Calculator, StatusKind};
use pension_core::store::MemoryStore;
use pension_core::{CalculationStore, ProjectionError, ScenarioResult, UserInput};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

/// Always fails the way a date overflow would.
struct FailingCalculator;

impl Calculator for FailingCalculator {
    fn calculate(
        &self,
        _input: &UserInput,
    ) -> Result<Vec<ScenarioResult>, ProjectionError> {
        Err(ProjectionError::DateOutOfRange)
    }
}

/// Returns no rows and counts how often it was asked. Clones share the
/// counter.
#[derive(Clone, Default)]
struct EmptyCalculator {
    calls: Rc<Cell<u32>>,
}

impl Calculator for EmptyCalculator {
    fn calculate(
        &self,
        _input: &UserInput,
    ) -> Result<Vec<ScenarioResult>, ProjectionError> {
        self.calls.set(self.calls.get() + 1);
        Ok(Vec::new())
    }
}

fn input() -> UserInput {
    UserInput {
        birthday: NaiveDate::from_ymd_opt(1965, 6, 15).unwrap(),
        expected_pension: dec!(1750),
        current_pension_entitlement: dec!(1600),
        statement_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        has_children: true,
        church_tax_rate: dec!(0.08),
    }
}

fn form() -> InputForm {
    InputForm {
        birthday: "15.06.1965".to_string(),
        expected_pension: "1,750".to_string(),
        current_pension_entitlement: "1600".to_string(),
        statement_date: "2025-02-01".to_string(),
        has_children: true,
        federal_state: Some("Baden-Württemberg".to_string()),
        ..Default::default()
    }
}

#[test]
fn failure_sets_both_messages_and_clears_results() {
    let mut session = CalculationSession::new(FailingCalculator);
    session.results = Some(Vec::new());

    session.set_user_input(input());

    assert_eq!(
        session.error.as_deref(),
        Some("Bei der Berechnung ist ein Fehler aufgetreten: retirement date out of range")
    );
    assert_eq!(
        session.status_message.as_deref(),
        Some("Fehler bei der Berechnung: retirement date out of range")
    );
    assert_eq!(session.status_kind, StatusKind::Error);
    assert_eq!(session.results, None);
    assert!(!session.is_loading);
}

#[test]
fn successful_recalculation_clears_previous_error() {
    let calculator = EmptyCalculator::default();
    let mut session = CalculationSession::new(calculator.clone());
    session.calculate_results();
    assert_eq!(session.status_kind, StatusKind::Error);

    session.set_user_input(input());

    assert_eq!(session.error, None);
    assert_eq!(session.status_kind, StatusKind::Success);
    assert_eq!(calculator.calls.get(), 1);
}

#[test]
fn empty_results_do_not_count_as_results() {
    let mut session = CalculationSession::new(EmptyCalculator::default());

    session.set_user_input(input());

    assert_eq!(session.results, Some(Vec::new()));
    assert!(!session.has_results());
}

#[test]
fn form_feeds_the_session() {
    let mut session = CalculationSession::new(EmptyCalculator::default());

    session.set_user_input(form().validate().unwrap());

    assert_eq!(session.user_input, Some(input()));
}

#[tokio::test]
async fn failing_calculation_is_not_saved() {
    let store = MemoryStore::new();

    let result = app::calculate_with(
        CalculationSession::new(FailingCalculator),
        &form(),
        Some(&store),
    )
    .await;

    assert_eq!(
        result.unwrap_err().to_string(),
        "Bei der Berechnung ist ein Fehler aufgetreten: retirement date out of range"
    );
    assert!(store.load_last_calculation().await.unwrap().is_empty());
}

#[tokio::test]
async fn saved_projection_round_trips_through_sqlite() {
    let store = app::build_registry()
        .create(&pension_core::store::StoreConfig::in_memory())
        .await
        .unwrap();

    app::calculate(&form(), Default::default(), Some(&*store))
        .await
        .unwrap();
    let last = store.load_last_calculation().await.unwrap();

    assert_eq!(last.user_input, Some(input()));
    assert_eq!(last.results.map(|r| r.len()), Some(9));
}
