//! Configuration types for the trip ledger.
//!
//! This module contains the strongly-typed settings structures that are
//! deserialized from `engine.yaml`.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calculation::{
    DEFAULT_BALANCE_DEAD_ZONE, DEFAULT_SETTLEMENT_THRESHOLD, DEFAULT_SPLIT_TOLERANCE,
};
use crate::error::{EngineError, EngineResult};
use crate::models::Amount;

/// Identifying information about the engine build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineMetadata {
    /// The engine name reported in settlement plans.
    pub name: String,
    /// The engine version reported in settlement plans.
    pub version: String,
}

impl Default for EngineMetadata {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Currency used when an expense does not name one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrencySettings {
    /// ISO 4217 code, e.g. "USD".
    pub default: String,
    /// Symbol used in settlement summary lines.
    pub symbol: String,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            default: "USD".to_string(),
            symbol: "$".to_string(),
        }
    }
}

/// Split calculator settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SplitSettings {
    /// How far percentages may sum from 100, and exact amounts from the total.
    pub tolerance: Decimal,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_SPLIT_TOLERANCE,
        }
    }
}

/// Balance aggregator settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BalanceSettings {
    /// Balances smaller than this are dropped as rounding noise.
    pub dead_zone: Amount,
}

impl Default for BalanceSettings {
    fn default() -> Self {
        Self {
            dead_zone: DEFAULT_BALANCE_DEAD_ZONE,
        }
    }
}

/// Settlement optimizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SettlementSettings {
    /// Balances at or below this magnitude are treated as settled.
    pub threshold: Amount,
}

impl Default for SettlementSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SETTLEMENT_THRESHOLD,
        }
    }
}

/// The complete engine settings file.
///
/// Every section is optional in YAML; a missing section takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct EngineSettings {
    /// Engine metadata.
    #[serde(default)]
    pub engine: EngineMetadata,
    /// Currency defaults.
    #[serde(default)]
    pub currency: CurrencySettings,
    /// Split calculator settings.
    #[serde(default)]
    pub splits: SplitSettings,
    /// Balance aggregator settings.
    #[serde(default)]
    pub balances: BalanceSettings,
    /// Settlement optimizer settings.
    #[serde(default)]
    pub settlements: SettlementSettings,
}

impl EngineSettings {
    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSetting` for a negative tolerance, dead zone or
    /// threshold, or an empty currency code.
    pub fn validate(&self) -> EngineResult<()> {
        if self.splits.tolerance < Decimal::ZERO {
            return Err(invalid("splits.tolerance", "must not be negative"));
        }
        if self.balances.dead_zone.is_negative() {
            return Err(invalid("balances.dead_zone", "must not be negative"));
        }
        if self.settlements.threshold.is_negative() {
            return Err(invalid("settlements.threshold", "must not be negative"));
        }
        if self.currency.default.trim().is_empty() {
            return Err(invalid("currency.default", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidSetting {
        field: field.to_string(),
        message: message.to_string(),
    }
}
