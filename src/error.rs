//! Error types for the expense settlement engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while splitting expenses,
//! aggregating balances and planning settlements.

use thiserror::Error;

/// The main error type for the expense settlement engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use trip_ledger::error::EngineError;
///
/// let error = EngineError::ValidationError {
///     subject: "percentage total".to_string(),
///     expected: "100".to_string(),
///     actual: "99".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid percentage total: expected 100, got 99");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Settings file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Settings file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A setting was parsed but holds an unusable value.
    #[error("Invalid setting '{field}': {message}")]
    InvalidSetting {
        /// The offending settings field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A non-equal split policy was invoked without its per-member configuration.
    #[error("Configuration error for {policy} split: {message}")]
    ConfigurationError {
        /// The split policy that was requested.
        policy: String,
        /// What configuration was missing.
        message: String,
    },

    /// Configured split values do not reconcile with the expense total.
    #[error("Invalid {subject}: expected {expected}, got {actual}")]
    ValidationError {
        /// What was being validated (e.g. "percentage total").
        subject: String,
        /// The expected aggregate.
        expected: String,
        /// The aggregate that was actually supplied.
        actual: String,
    },

    /// A post-condition of the engine failed.
    ///
    /// This indicates a defect upstream or in the engine and must not be
    /// shown verbatim to end users.
    #[error("Internal invariant violated: {message}")]
    InternalInvariantError {
        /// A description of the violated invariant.
        message: String,
    },

    /// A split id did not match any split of the expense.
    #[error("Split '{split_id}' not found on expense '{expense_id}'")]
    SplitNotFound {
        /// The expense that was searched.
        expense_id: String,
        /// The split id that was not found.
        split_id: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
