//! Core data models for the expense settlement engine.
//!
//! This module contains all the domain models used throughout the engine.

mod amount;
mod audit;
mod balance;
mod expense;
mod settlement;
mod split_plan;

pub use amount::{Amount, round_half_up};
pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use balance::{Balance, ExpenseSummary, TripMember, UserBalance};
pub use expense::{Expense, ExpenseCategory, Split};
pub use settlement::{NamedSettlement, Settlement};
pub use split_plan::{
    CalculatedSplit, ExactConfig, PercentageConfig, SharesConfig, SplitPlan, SplitType,
};
