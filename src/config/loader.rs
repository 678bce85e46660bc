//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! settings from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::Amount;

use super::types::EngineSettings;

/// Loads and provides access to engine settings.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// └── engine.yaml   # Engine metadata, currency, tolerances
/// ```
///
/// # Example
///
/// ```no_run
/// use trip_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Split tolerance: {}", loader.split_tolerance());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    settings: EngineSettings,
}

impl ConfigLoader {
    /// Loads settings from `engine.yaml` in the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `engine.yaml` is missing
    /// - the file contains invalid YAML
    /// - a setting is out of range
    ///
    /// # Example
    ///
    /// ```no_run
    /// use trip_ledger::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// # Ok::<(), trip_ledger::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let settings = Self::load_yaml::<EngineSettings>(&path.as_ref().join("engine.yaml"))?;
        Self::from_settings(settings)
    }

    /// Wraps already-built settings after validating them.
    pub fn from_settings(settings: EngineSettings) -> EngineResult<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the tolerance for percentage and exact-amount totals.
    pub fn split_tolerance(&self) -> Decimal {
        self.settings.splits.tolerance
    }

    /// Returns the balance dead zone.
    pub fn dead_zone(&self) -> Amount {
        self.settings.balances.dead_zone
    }

    /// Returns the settlement threshold.
    pub fn settlement_threshold(&self) -> Amount {
        self.settings.settlements.threshold
    }

    /// Returns the currency used when an expense names none.
    pub fn default_currency(&self) -> &str {
        &self.settings.currency.default
    }

    /// Returns the symbol used in settlement summary lines.
    pub fn currency_symbol(&self) -> &str {
        &self.settings.currency.symbol
    }

    /// Returns the engine version reported in settlement plans.
    pub fn engine_version(&self) -> &str {
        &self.settings.engine.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default"
    }

    #[test]
    fn test_load_shipped_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.settings().engine.name, "trip-ledger");
        assert_eq!(loader.default_currency(), "USD");
        assert_eq!(loader.currency_symbol(), "$");
    }

    #[test]
    fn test_shipped_configuration_matches_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let defaults = ConfigLoader::default();

        assert_eq!(loader.split_tolerance(), defaults.split_tolerance());
        assert_eq!(loader.dead_zone(), defaults.dead_zone());
        assert_eq!(loader.settlement_threshold(), defaults.settlement_threshold());
        assert_eq!(loader.split_tolerance(), Decimal::from_str("0.01").unwrap());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("engine.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_settings_rejects_invalid_values() {
        let mut settings = EngineSettings::default();
        settings.settlements.threshold = -Amount::CENT;

        match ConfigLoader::from_settings(settings) {
            Err(EngineError::InvalidSetting { field, .. }) => {
                assert_eq!(field, "settlements.threshold");
            }
            other => panic!("Expected InvalidSetting error, got {:?}", other),
        }
    }
}
