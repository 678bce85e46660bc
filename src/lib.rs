//! Expense Splitting and Debt Settlement Engine
//!
//! This crate divides shared trip expenses among participants under several
//! split policies, folds the expense history into net balances, and reduces
//! those balances to a small set of peer-to-peer payments.
//!
//! The three calculations compose strictly in order: split calculator,
//! then (after external storage) balance aggregator, then settlement optimizer.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
