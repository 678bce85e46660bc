//! Balance aggregation.
//!
//! Folds a trip's expense history into one signed net balance per member:
//! positive means the member is owed money, negative means they owe money.

use std::collections::HashMap;

use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{Amount, AuditStep, AuditWarning, Balance, Expense};

/// Default dead zone below which a balance is treated as zero.
pub const DEFAULT_BALANCE_DEAD_ZONE: Amount = Amount::CENT;

/// How far the sum of all balances may stray from zero.
pub const BALANCE_SUM_TOLERANCE: Amount = Amount::CENT;

/// The result of aggregating balances, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceCalculation {
    /// Net balances in first-seen member order, dead-zone entries dropped.
    pub balances: Vec<Balance>,
    /// The audit step recording this aggregation.
    pub audit_step: AuditStep,
    /// Expenses that were skipped, and why.
    pub warnings: Vec<AuditWarning>,
}

/// Running per-member totals that remember first-seen order.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    order: Vec<String>,
    totals: HashMap<String, Amount>,
}

impl Ledger {
    /// Registers a member with a zero balance if not seen yet.
    pub(crate) fn touch(&mut self, user_id: &str) {
        if !self.totals.contains_key(user_id) {
            self.order.push(user_id.to_string());
            self.totals.insert(user_id.to_string(), Amount::ZERO);
        }
    }

    /// Adds `delta` to a member's running total.
    pub(crate) fn post(&mut self, user_id: &str, delta: Amount) {
        self.touch(user_id);
        if let Some(total) = self.totals.get_mut(user_id) {
            *total += delta;
        }
    }

    /// Returns a member's running total.
    pub(crate) fn get(&self, user_id: &str) -> Amount {
        self.totals.get(user_id).copied().unwrap_or(Amount::ZERO)
    }

    /// Returns the members in first-seen order.
    pub(crate) fn members(&self) -> &[String] {
        &self.order
    }
}

/// Aggregates an expense history into net balances.
///
/// For every expense the payer is credited with the total and every owner
/// of an unsettled split is debited with the split amount. A settled split
/// has already been repaid outside the system: its owner is not debited and
/// the payer's credit shrinks by the same amount, so the balances keep
/// summing to zero. Expenses without any splits are not shared and are
/// skipped with a warning.
///
/// Entries whose magnitude is below `dead_zone` are dropped from the output.
///
/// # Arguments
///
/// * `expenses` - The trip's expenses with their splits
/// * `dead_zone` - Balances smaller than this are treated as zero
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// Returns `InternalInvariantError` if the balances do not sum to zero
/// within one cent, which means some expense's splits do not reconstruct
/// its total.
///
/// # Examples
///
/// ```
/// use trip_ledger::calculation::{calculate_balances, DEFAULT_BALANCE_DEAD_ZONE};
///
/// let result = calculate_balances(&[], DEFAULT_BALANCE_DEAD_ZONE, 1).unwrap();
/// assert!(result.balances.is_empty());
/// ```
pub fn calculate_balances(
    expenses: &[Expense],
    dead_zone: Amount,
    step_number: u32,
) -> EngineResult<BalanceCalculation> {
    let mut ledger = Ledger::default();
    let mut warnings = Vec::new();
    let mut settled_splits = 0usize;

    for expense in expenses {
        if expense.splits.is_empty() {
            warnings.push(AuditWarning {
                code: "UNSPLIT_EXPENSE".to_string(),
                message: format!(
                    "Expense '{}' has no splits and was left out of balances",
                    expense.id
                ),
                severity: "medium".to_string(),
            });
            continue;
        }

        ledger.post(&expense.paid_by_id, expense.amount);

        for split in &expense.splits {
            if split.is_settled {
                ledger.touch(&split.user_id);
                ledger.post(&expense.paid_by_id, -split.amount);
                settled_splits += 1;
                continue;
            }
            ledger.post(&split.user_id, -split.amount);
        }
    }

    let sum: Amount = ledger.members().iter().map(|id| ledger.get(id)).sum();
    if sum.abs() > BALANCE_SUM_TOLERANCE {
        warn!(sum = %sum, expenses = expenses.len(), "Balances do not sum to zero");
        return Err(EngineError::InternalInvariantError {
            message: format!(
                "balances sum to {} instead of zero; an expense's splits do not match its total",
                sum
            ),
        });
    }

    let balances: Vec<Balance> = ledger
        .members()
        .iter()
        .map(|id| Balance::new(id.clone(), ledger.get(id)))
        .filter(|b| b.amount.abs() >= dead_zone)
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "balance_aggregation".to_string(),
        rule_name: "Balance Aggregation".to_string(),
        input: serde_json::json!({
            "expenses": expenses.len(),
            "settled_splits_skipped": settled_splits,
            "dead_zone": dead_zone.to_string()
        }),
        output: serde_json::json!({
            "members_seen": ledger.members().len(),
            "non_zero_balances": balances.len()
        }),
        reasoning: format!(
            "Folded {} expenses into {} non-zero balances across {} members",
            expenses.len(),
            balances.len(),
            ledger.members().len()
        ),
    };

    Ok(BalanceCalculation {
        balances,
        audit_step,
        warnings,
    })
}
