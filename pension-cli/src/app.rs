//! Command handlers shared by the binary and its tests. Each returns the
//! text to print on stdout.

use anyhow::{Result, anyhow};
use chrono::Local;
use tracing::{debug, info};

use pension_core::store::{MemoryStoreFactory, StoreRegistry};
use pension_core::{CalculationStore, PensionParameters, PensionProjection};
use pension_store_sqlite::SqliteStoreFactory;

use crate::form::InputForm;
use crate::session::{CalculationSession, Calculator};
use crate::format::format_timestamp;
use crate::table::{render_input, render_results};

pub const APP_TITLE: &str = "Renten-Nettorechner";
pub const DISCLAIMER: &str = "Wichtiger Hinweis: Alle Werte sind unverbindliche Schätzungen auf \
     Basis der Rechengrößen 2025 und ersetzen keine Rentenauskunft oder Steuerberatung.";
pub const NOTHING_STORED: &str = "Keine gespeicherte Berechnung vorhanden.";
pub const STORE_CLEARED: &str = "Gespeicherte Berechnung gelöscht.";
pub const SAVED: &str = "Berechnung gespeichert.";
pub const SAVED_AT_LABEL: &str = "Gespeichert am:";

/// Registry with every backend this binary ships.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(SqliteStoreFactory));
    registry.register(Box::new(MemoryStoreFactory));
    registry
}

/// Validates the form, projects every scenario and optionally stores the
/// result as the last calculation.
pub async fn calculate(
    form: &InputForm,
    params: PensionParameters,
    store: Option<&dyn CalculationStore>,
) -> Result<String> {
    calculate_with(CalculationSession::new(PensionProjection::new(params)), form, store).await
}

/// [`calculate`] with a caller-supplied session, so any [`Calculator`] can
/// stand in for the projection.
pub async fn calculate_with<C: Calculator>(
    mut session: CalculationSession<C>,
    form: &InputForm,
    store: Option<&dyn CalculationStore>,
) -> Result<String> {
    let input = form.validate()?;
    session.set_user_input(input);

    if let Some(error) = session.error.take() {
        return Err(anyhow!(error));
    }
    let (Some(input), Some(results)) = (&session.user_input, &session.results) else {
        return Err(anyhow!("calculation produced no results"));
    };

    let mut out = format!("{APP_TITLE}\n\n{}\n{}\n", render_input(input), render_results(results));
    if let Some(status) = &session.status_message {
        out.push_str(status);
        out.push('\n');
    }

    if let Some(store) = store {
        store.save_last_calculation(input, results).await?;
        info!("stored calculation");
        out.push_str(SAVED);
        out.push('\n');
    }

    out.push('\n');
    out.push_str(DISCLAIMER);
    out.push('\n');
    Ok(out)
}

/// Renders the stored calculation, or a notice when nothing is stored.
pub async fn show_last(store: &dyn CalculationStore) -> Result<String> {
    let last = store.load_last_calculation().await?;
    if last.is_empty() {
        debug!("no stored calculation");
        return Ok(format!("{NOTHING_STORED}\n"));
    }

    let saved_at = store.last_saved_at().await?;
    let mut session = CalculationSession::new(PensionProjection::default());
    session.restore(last);

    let mut out = format!("{APP_TITLE}\n\n");
    if let Some(at) = saved_at {
        out.push_str(&format!(
            "{SAVED_AT_LABEL} {}\n\n",
            format_timestamp(at.with_timezone(&Local))
        ));
    }
    if let Some(input) = &session.user_input {
        out.push_str(&render_input(input));
        out.push('\n');
    }
    match &session.results {
        Some(results) => out.push_str(&render_results(results)),
        None => {
            out.push_str("Keine gespeicherten Ergebnisse.\n");
        }
    }
    Ok(out)
}

pub async fn clear(store: &dyn CalculationStore) -> Result<String> {
    store.clear_last_calculation().await?;
    info!("cleared stored calculation");
    Ok(format!("{STORE_CLEARED}\n"))
}

#[cfg(test)]
mod tests {
    use pension_core::store::{MemoryStore, StoreConfig};
    use pretty_assertions::assert_eq;

    use super::*;

    fn form() -> InputForm {
        InputForm {
            birthday: "1970-01-01".to_string(),
            expected_pension: "2000".to_string(),
            current_pension_entitlement: "0".to_string(),
            statement_date: "2025-01-01".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn registry_ships_sqlite_and_memory() {
        assert_eq!(build_registry().backend_names(), vec!["sqlite", "memory"]);
    }

    #[tokio::test]
    async fn registry_opens_in_memory_sqlite() {
        let store = build_registry()
            .create(&StoreConfig::in_memory())
            .await
            .expect("in-memory sqlite should open");

        assert!(store.load_last_calculation().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn calculate_renders_table_and_status() {
        let out = calculate(&form(), PensionParameters::default(), None)
            .await
            .unwrap();

        assert!(out.starts_with(APP_TITLE));
        assert!(out.contains("Ihre Rentenberechnung"));
        assert!(out.contains("1.563,80 €"));
        assert!(out.contains("Berechnung erfolgreich abgeschlossen."));
        assert!(out.contains("Wichtiger Hinweis:"));
        assert!(!out.contains(SAVED));
    }

    #[tokio::test]
    async fn calculate_rejects_invalid_form() {
        let form = InputForm {
            expected_pension: "-1".to_string(),
            ..form()
        };

        let err = calculate(&form, PensionParameters::default(), None)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Die voraussichtliche Altersrente muss positiv sein.");
    }

    #[tokio::test]
    async fn pension_beyond_decimal_range_is_reported_not_panicked() {
        let form = InputForm {
            expected_pension: "39614081257132168796771975167".to_string(),
            ..form()
        };

        let err = calculate(&form, PensionParameters::default(), None)
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Bei der Berechnung ist ein Fehler aufgetreten: \
             calculation failed: amount exceeds the supported range"
        );
    }

    #[tokio::test]
    async fn sqlite_last_shows_when_it_was_saved() {
        let store = build_registry()
            .create(&StoreConfig::in_memory())
            .await
            .unwrap();

        calculate(&form(), PensionParameters::default(), Some(&*store))
            .await
            .unwrap();
        let last = show_last(&*store).await.unwrap();

        assert!(last.contains(SAVED_AT_LABEL), "{last}");
        assert!(last.contains("1.563,80 €"));
    }

    #[tokio::test]
    async fn saved_calculation_can_be_shown_and_cleared() {
        let store = MemoryStore::new();

        let out = calculate(&form(), PensionParameters::default(), Some(&store))
            .await
            .unwrap();
        assert!(out.contains(SAVED));

        let last = show_last(&store).await.unwrap();
        assert!(last.contains("Geburtstag:"));
        assert!(last.contains("01.01.1970"));
        assert!(last.contains("1.563,80 €"));
        assert!(!last.contains(SAVED_AT_LABEL));

        assert_eq!(clear(&store).await.unwrap(), format!("{STORE_CLEARED}\n"));
        assert_eq!(show_last(&store).await.unwrap(), format!("{NOTHING_STORED}\n"));
    }
}
