//! Service entry points for the trip ledger.
//!
//! The surrounding application owns persistence and transport. It hands
//! expense history in and stores what comes back; nothing here keeps state
//! between calls apart from the loaded settings.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{
    calculate_balances, calculate_expense_summary, calculate_splits, format_settlement_summary,
    name_settlements, optimize_settlements, verify_settlements,
};
use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{AuditTrace, Expense, ExpenseSummary, TripMember};

use super::request::{
    BalanceRequest, CalculateSplitRequest, CreateExpenseRequest, UpdateExpenseRequest,
};
use super::response::{ApiError, ExpenseResponse, SettlementPlanResponse, SplitResponse};

/// Transport-agnostic facade over the calculation engine.
///
/// Cloning is cheap; clones share the loaded settings.
///
/// # Example
///
/// ```
/// use trip_ledger::api::ExpenseService;
/// use trip_ledger::config::ConfigLoader;
///
/// let service = ExpenseService::new(ConfigLoader::default());
/// assert_eq!(service.config().default_currency(), "USD");
/// ```
#[derive(Debug, Clone)]
pub struct ExpenseService {
    config: Arc<ConfigLoader>,
}

impl ExpenseService {
    /// Creates a service around loaded settings.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the settings in use.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Divides an amount without recording an expense.
    pub fn split(&self, request: &CalculateSplitRequest) -> Result<SplitResponse, ApiError> {
        let correlation_id = Uuid::new_v4();
        info!(
            correlation_id = %correlation_id,
            split_type = %request.split.split_type,
            "Processing split request"
        );

        let start_time = Instant::now();
        let result = request
            .split
            .split_plan(&member_ids(&request.trip_members))
            .and_then(|plan| {
                calculate_splits(request.amount, &plan, self.config.split_tolerance(), 1)
            });

        match result {
            Ok(calculation) => {
                let duration_us = start_time.elapsed().as_micros() as u64;
                info!(
                    correlation_id = %correlation_id,
                    members = calculation.splits.len(),
                    total = %request.amount,
                    duration_us,
                    "Split completed successfully"
                );
                Ok(SplitResponse {
                    calculation_id: correlation_id,
                    split_type: request.split.split_type,
                    total: request.amount,
                    splits: calculation.splits,
                    audit_trace: AuditTrace {
                        steps: vec![calculation.audit_step],
                        warnings: vec![],
                        duration_us,
                    },
                })
            }
            Err(err) => Err(reject(correlation_id, "Split", err.into())),
        }
    }

    /// Records a new expense with freshly computed splits.
    pub fn create_expense(
        &self,
        request: CreateExpenseRequest,
        trip_members: &[TripMember],
    ) -> Result<ExpenseResponse, ApiError> {
        let correlation_id = Uuid::new_v4();
        info!(
            correlation_id = %correlation_id,
            paid_by = %request.paid_by_id,
            amount = %request.amount,
            "Processing create expense request"
        );

        let start_time = Instant::now();
        let result = request.validate().and_then(|()| {
            let plan = request.split.split_plan(&member_ids(trip_members))?;
            calculate_splits(request.amount, &plan, self.config.split_tolerance(), 1)
        });

        let calculation = match result {
            Ok(calculation) => calculation,
            Err(err) => return Err(reject(correlation_id, "Create expense", err.into())),
        };

        let mut expense = Expense {
            id: Uuid::new_v4().to_string(),
            description: request.description,
            amount: request.amount,
            currency: request
                .currency
                .unwrap_or_else(|| self.config.default_currency().to_string()),
            category: request.category,
            paid_by_id: request.paid_by_id,
            split_type: request.split.split_type,
            expense_date: request.expense_date,
            notes: request.notes,
            splits: Vec::new(),
        };
        expense.replace_splits(request.split.split_type, calculation.splits);

        let duration_us = start_time.elapsed().as_micros() as u64;
        info!(
            correlation_id = %correlation_id,
            expense_id = %expense.id,
            splits = expense.splits.len(),
            duration_us,
            "Expense created"
        );

        Ok(ExpenseResponse {
            expense,
            splits_recalculated: true,
            audit_trace: AuditTrace {
                steps: vec![calculation.audit_step],
                warnings: vec![],
                duration_us,
            },
        })
    }

    /// Applies an edit to an expense.
    ///
    /// Splits are recomputed only when the amount, the policy or the member
    /// configuration changes, and then replaced as a whole set. On error
    /// `expense` is untouched.
    pub fn update_expense(
        &self,
        expense: &Expense,
        request: UpdateExpenseRequest,
        trip_members: &[TripMember],
    ) -> Result<ExpenseResponse, ApiError> {
        let correlation_id = Uuid::new_v4();
        info!(
            correlation_id = %correlation_id,
            expense_id = %expense.id,
            changes_splits = request.changes_splits(),
            "Processing update expense request"
        );

        let start_time = Instant::now();
        let result = request.validate().and_then(|()| {
            let mut updated = expense.clone();
            request.apply_details(&mut updated);
            if !request.changes_splits() {
                return Ok((updated, None));
            }

            let split = request.split_request(expense);
            let plan = split.split_plan(&member_ids(trip_members))?;
            let calculation =
                calculate_splits(updated.amount, &plan, self.config.split_tolerance(), 1)?;
            updated.replace_splits(split.split_type, calculation.splits);
            Ok((updated, Some(calculation.audit_step)))
        });

        match result {
            Ok((updated, audit_step)) => {
                let duration_us = start_time.elapsed().as_micros() as u64;
                info!(
                    correlation_id = %correlation_id,
                    expense_id = %updated.id,
                    splits_recalculated = audit_step.is_some(),
                    duration_us,
                    "Expense updated"
                );
                Ok(ExpenseResponse {
                    expense: updated,
                    splits_recalculated: audit_step.is_some(),
                    audit_trace: AuditTrace {
                        steps: audit_step.into_iter().collect(),
                        warnings: vec![],
                        duration_us,
                    },
                })
            }
            Err(err) => Err(reject(correlation_id, "Update expense", err.into())),
        }
    }

    /// Marks one split of an expense as repaid.
    pub fn settle_split(&self, expense: &Expense, split_id: &str) -> Result<Expense, ApiError> {
        let correlation_id = Uuid::new_v4();
        let mut updated = expense.clone();

        match updated.settle_split(split_id) {
            Ok(split) => {
                info!(
                    correlation_id = %correlation_id,
                    expense_id = %expense.id,
                    split_id,
                    user_id = %split.user_id,
                    amount = %split.amount,
                    "Split settled"
                );
            }
            Err(err) => return Err(reject(correlation_id, "Settle split", err.into())),
        }

        Ok(updated)
    }

    /// Summarises what each member paid, owes and has been repaid.
    pub fn summary(&self, request: &BalanceRequest) -> ExpenseSummary {
        let summary = calculate_expense_summary(&request.expenses, &request.members);
        debug!(
            expenses = summary.expense_count,
            total = %summary.total_expenses,
            members = summary.balances.len(),
            "Expense summary calculated"
        );
        summary
    }

    /// Computes balances and the payments that clear them.
    pub fn settlement_plan(
        &self,
        request: &BalanceRequest,
    ) -> Result<SettlementPlanResponse, ApiError> {
        let plan_id = Uuid::new_v4();
        info!(
            correlation_id = %plan_id,
            expenses = request.expenses.len(),
            members = request.members.len(),
            "Processing settlement plan request"
        );

        let start_time = Instant::now();
        match self.build_settlement_plan(plan_id, request, start_time) {
            Ok(plan) => {
                info!(
                    correlation_id = %plan_id,
                    balances = plan.balances.len(),
                    total_transactions = plan.total_transactions,
                    warnings = plan.audit_trace.warnings.len(),
                    duration_us = plan.audit_trace.duration_us,
                    "Settlement plan completed successfully"
                );
                Ok(plan)
            }
            Err(err) => Err(reject(plan_id, "Settlement plan", err.into())),
        }
    }

    fn build_settlement_plan(
        &self,
        plan_id: Uuid,
        request: &BalanceRequest,
        start_time: Instant,
    ) -> EngineResult<SettlementPlanResponse> {
        let mut step_number: u32 = 1;

        let balances = calculate_balances(&request.expenses, self.config.dead_zone(), step_number)?;
        step_number += 1;

        let threshold = self.config.settlement_threshold();
        let optimization = optimize_settlements(&balances.balances, threshold, step_number)?;
        verify_settlements(&balances.balances, &optimization.settlements, threshold)?;

        let names: HashMap<String, String> = request
            .members
            .iter()
            .map(|m| (m.user_id.clone(), m.name.clone()))
            .collect();
        let summary_lines = format_settlement_summary(
            &optimization.settlements,
            &names,
            self.config.currency_symbol(),
        );
        let settlements = name_settlements(&optimization.settlements, &names);

        let mut warnings = balances.warnings;
        warnings.extend(optimization.warnings);

        Ok(SettlementPlanResponse {
            plan_id,
            generated_at: Utc::now(),
            engine_version: self.config.engine_version().to_string(),
            currency: request
                .currency
                .clone()
                .unwrap_or_else(|| self.config.default_currency().to_string()),
            total_transactions: settlements.len(),
            balances: balances.balances,
            settlements,
            summary_lines,
            audit_trace: AuditTrace {
                steps: vec![balances.audit_step, optimization.audit_step],
                warnings,
                duration_us: start_time.elapsed().as_micros() as u64,
            },
        })
    }
}

fn member_ids(members: &[TripMember]) -> Vec<String> {
    members.iter().map(|m| m.user_id.clone()).collect()
}

fn reject(correlation_id: Uuid, operation: &str, error: ApiError) -> ApiError {
    warn!(
        correlation_id = %correlation_id,
        code = %error.code,
        error = %error.message,
        "{} failed",
        operation
    );
    error
}
