//! Response types for the trip ledger service.
//!
//! This module defines the result bodies and the error structure handed
//! back to the surrounding application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{
    Amount, AuditTrace, Balance, CalculatedSplit, Expense, NamedSettlement, SplitType,
};

/// API error response structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Returns the HTTP status a transport layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self.code.as_str() {
            "VALIDATION_ERROR" | "CONFIGURATION_ERROR" => 400,
            "SPLIT_NOT_FOUND" => 404,
            _ => 500,
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiError::with_details(
                "CONFIG_ERROR",
                "Configuration error",
                format!("Configuration file not found: {}", path),
            ),
            EngineError::ConfigParseError { path, message } => ApiError::with_details(
                "CONFIG_ERROR",
                "Configuration parse error",
                format!("Failed to parse {}: {}", path, message),
            ),
            EngineError::InvalidSetting { field, message } => ApiError::with_details(
                "CONFIG_ERROR",
                "Configuration error",
                format!("Setting '{}' {}", field, message),
            ),
            error @ EngineError::ConfigurationError { .. } => ApiError::with_details(
                "CONFIGURATION_ERROR",
                error.to_string(),
                "Percentage, shares and exact splits need a split_configs entry per member",
            ),
            EngineError::ValidationError {
                subject,
                expected,
                actual,
            } => ApiError::with_details(
                "VALIDATION_ERROR",
                format!("Invalid {}", subject),
                format!("expected {}, got {}", expected, actual),
            ),
            EngineError::InternalInvariantError { .. } => ApiError::new(
                "INTERNAL_ERROR",
                "The ledger could not be balanced; please contact support",
            ),
            error @ EngineError::SplitNotFound { .. } => {
                ApiError::new("SPLIT_NOT_FOUND", error.to_string())
            }
        }
    }
}

/// Result of dividing an amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResponse {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// The policy that was applied.
    pub split_type: SplitType,
    /// The amount that was divided.
    pub total: Amount,
    /// Per-member amounts in configuration order.
    pub splits: Vec<CalculatedSplit>,
    /// Audit trace of the calculation.
    pub audit_trace: AuditTrace,
}

/// A created or edited expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseResponse {
    /// The expense with its current splits.
    pub expense: Expense,
    /// Whether the splits were computed by this call.
    pub splits_recalculated: bool,
    /// Audit trace of the split calculation, empty if none ran.
    pub audit_trace: AuditTrace,
}

/// A settlement plan for a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlanResponse {
    /// Unique identifier for this plan.
    pub plan_id: Uuid,
    /// When the plan was generated.
    pub generated_at: DateTime<Utc>,
    /// The version of the engine that generated the plan.
    pub engine_version: String,
    /// Currency the amounts are in.
    pub currency: String,
    /// Net balances the plan settles.
    pub balances: Vec<Balance>,
    /// Payments to make, with display names.
    pub settlements: Vec<NamedSettlement>,
    /// Number of payments.
    pub total_transactions: usize,
    /// One line per payment, e.g. "Alice owes Bob $25.00".
    pub summary_lines: Vec<String>,
    /// Audit trace of the aggregation and optimization.
    pub audit_trace: AuditTrace,
}
