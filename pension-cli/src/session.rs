//! In-memory state of one calculator session.
//!
//! Holds the current input, the last results and the status line shown to
//! the user. Nothing here is persisted until explicitly saved to a
//! [`pension_core::CalculationStore`].

use tracing::{error, info};

use pension_core::{
    LastCalculation, PensionProjection, ProjectionError, ScenarioResult, UserInput,
};

pub const MISSING_INPUT: &str = "Eingabedaten fehlen.";
pub const CALCULATION_SUCCEEDED: &str = "Berechnung erfolgreich abgeschlossen.";

/// Anything that turns a [`UserInput`] into a projection table.
pub trait Calculator {
    fn calculate(
        &self,
        input: &UserInput,
    ) -> Result<Vec<ScenarioResult>, ProjectionError>;
}

impl Calculator for PensionProjection {
    fn calculate(
        &self,
        input: &UserInput,
    ) -> Result<Vec<ScenarioResult>, ProjectionError> {
        PensionProjection::calculate(self, input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

#[derive(Debug, Clone, Default)]
pub struct CalculationSession<C = PensionProjection> {
    calculator: C,
    pub user_input: Option<UserInput>,
    pub results: Option<Vec<ScenarioResult>>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub status_message: Option<String>,
    pub status_kind: StatusKind,
}

impl<C: Calculator> CalculationSession<C> {
    pub fn new(calculator: C) -> Self {
        Self {
            calculator,
            user_input: None,
            results: None,
            is_loading: false,
            error: None,
            status_message: None,
            status_kind: StatusKind::Info,
        }
    }

    /// Replace the input and recalculate immediately.
    pub fn set_user_input(
        &mut self,
        input: UserInput,
    ) {
        self.user_input = Some(input);
        self.calculate_results();
    }

    pub fn calculate_results(&mut self) {
        let Some(input) = &self.user_input else {
            self.error = Some(MISSING_INPUT.to_string());
            self.set_status(MISSING_INPUT, StatusKind::Error);
            return;
        };

        self.is_loading = true;
        self.error = None;
        self.status_message = None;

        match self.calculator.calculate(input) {
            Ok(results) => {
                info!(scenarios = results.len(), "calculation finished");
                self.results = Some(results);
                self.set_status(CALCULATION_SUCCEEDED, StatusKind::Success);
            }
            Err(e) => {
                error!(error = %e, "calculation failed");
                self.error = Some(format!("Bei der Berechnung ist ein Fehler aufgetreten: {e}"));
                self.set_status(format!("Fehler bei der Berechnung: {e}"), StatusKind::Error);
                self.results = None;
            }
        }

        self.is_loading = false;
    }

    /// Drop results, error and status. The input is kept.
    pub fn clear_results(&mut self) {
        self.results = None;
        self.error = None;
        self.status_message = None;
        self.status_kind = StatusKind::Info;
    }

    pub fn set_status(
        &mut self,
        message: impl Into<String>,
        kind: StatusKind,
    ) {
        self.status_message = Some(message.into());
        self.status_kind = kind;
    }

    /// True only when there is at least one result row.
    pub fn has_results(&self) -> bool {
        self.results.as_ref().is_some_and(|r| !r.is_empty())
    }

    /// Take over a stored calculation as-is, without recalculating.
    pub fn restore(
        &mut self,
        last: LastCalculation,
    ) {
        self.user_input = last.user_input;
        self.results = last.results;
    }
}
