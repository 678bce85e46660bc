//! Service layer for the trip ledger.
//!
//! This module provides the request and response shapes and the
//! [`ExpenseService`] facade the surrounding application calls. It has no
//! transport of its own.

mod request;
mod response;
mod service;

pub use request::{
    BalanceRequest, CalculateSplitRequest, CreateExpenseRequest, SplitConfigRequest,
    SplitRequest, UpdateExpenseRequest,
};
pub use response::{ApiError, ExpenseResponse, SettlementPlanResponse, SplitResponse};
pub use service::ExpenseService;
