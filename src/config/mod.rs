//! Configuration loading and management for the trip ledger.
//!
//! Settings cover the default currency, the split tolerance, the balance
//! dead zone and the settlement threshold.
//!
//! # Example
//!
//! ```no_run
//! use trip_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Default currency: {}", config.default_currency());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BalanceSettings, CurrencySettings, EngineMetadata, EngineSettings, SettlementSettings,
    SplitSettings,
};
