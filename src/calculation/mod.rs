//! Calculation logic for the trip ledger.
//!
//! This module turns an expense total and a split policy into per-member
//! amounts, folds a trip's expense history into net balances and reduces
//! those balances to a short list of payments.

mod balances;
mod equal_split;
mod exact_split;
mod expense_summary;
mod percentage_split;
mod settlement_optimizer;
mod settlement_summary;
mod shares_split;
mod split_calculator;

pub use balances::{
    BALANCE_SUM_TOLERANCE, BalanceCalculation, DEFAULT_BALANCE_DEAD_ZONE, calculate_balances,
};
pub use equal_split::calculate_equal_split;
pub use exact_split::calculate_exact_split;
pub use expense_summary::calculate_expense_summary;
pub use percentage_split::calculate_percentage_split;
pub use settlement_optimizer::{
    DEFAULT_SETTLEMENT_THRESHOLD, SettlementOptimization, optimize_settlements,
};
pub use settlement_summary::{format_settlement_summary, name_settlements, verify_settlements};
pub use shares_split::calculate_shares_split;
pub use split_calculator::{DEFAULT_SPLIT_TOLERANCE, SplitCalculation, calculate_splits};
