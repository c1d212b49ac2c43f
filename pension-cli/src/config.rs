//! TOML configuration file.
//!
//! Every section is optional. Missing values fall back to the built-in
//! parameters and to the command-line defaults:
//!
//! ```toml
//! [parameters]
//! pension_point_value = "40.79"
//! months_early_scenarios = [0, 12, 24, 36, 48]
//!
//! [store]
//! backend = "sqlite"
//! connection_string = "pension.db"
//!
//! [logging]
//! level = "debug"
//! file = "pension.log"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use pension_core::PensionParameters;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub parameters: PensionParameters,
    pub store: StoreSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    pub backend: Option<String>,
    pub connection_string: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Parse and validate a configuration document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(s).context("invalid configuration file")?;
        config
            .parameters
            .validate()
            .context("invalid pension parameters")?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file '{}'", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("in config file '{}'", path.display()))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// `load` when a path is given, defaults otherwise.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn parameters_can_be_partially_overridden() {
        let config = AppConfig::from_toml_str(
            r#"
            [parameters]
            pension_point_value = "40.79"
            months_early_scenarios = [0, 12, 24]

            [parameters.income_tax]
            basic_allowance = "12348"
            "#,
        )
        .unwrap();

        assert_eq!(config.parameters.pension_point_value, dec!(40.79));
        assert_eq!(config.parameters.months_early_scenarios, vec![0, 12, 24]);
        assert_eq!(config.parameters.income_tax.basic_allowance, dec!(12348));
        assert_eq!(config.parameters.deduction_per_month, dec!(0.003));
    }

    #[test]
    fn store_and_logging_sections_are_read() {
        let config = AppConfig::from_toml_str(
            r#"
            [store]
            backend = "memory"

            [logging]
            level = "debug"
            file = "pension.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.store.backend.as_deref(), Some("memory"));
        assert_eq!(config.store.connection_string, None);
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.file, Some(PathBuf::from("pension.log")));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let result = AppConfig::from_toml_str(
            r#"
            [parameters]
            care_rate_childless = "1.5"
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(AppConfig::from_toml_str("[colours]\ntheme = \"dark\"").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = AppConfig::load(Path::new("/definitely/not/here.toml"));

        assert!(result.is_err());
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(AppConfig::load_optional(None).unwrap(), AppConfig::default());
    }
}
