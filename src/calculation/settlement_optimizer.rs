//! Settlement optimization.
//!
//! Greedy largest-creditor / largest-debtor matching. The result is small
//! but not guaranteed minimal; exact minimum netting is NP-hard and is not
//! attempted.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{Amount, AuditStep, AuditWarning, Balance, Settlement};

/// Default magnitude at or below which a balance is considered settled.
pub const DEFAULT_SETTLEMENT_THRESHOLD: Amount = Amount::CENT;

/// The result of optimizing settlements, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementOptimization {
    /// Payments in the order they were matched.
    pub settlements: Vec<Settlement>,
    /// The audit step recording this optimization.
    pub audit_step: AuditStep,
    /// Residue left unsettled by the threshold, if any.
    pub warnings: Vec<AuditWarning>,
}

impl SettlementOptimization {
    /// Returns the total amount moved by all settlements.
    pub fn total_transferred(&self) -> Amount {
        self.settlements.iter().map(|s| s.amount).sum()
    }
}

/// A creditor or debtor waiting to be matched.
///
/// Orders by remaining magnitude, then by lower sequence, so the heap
/// always yields the largest party and the one queued earliest on ties.
/// A party going back after a partial payment takes a fresh sequence and
/// queues behind anyone already waiting at the same magnitude.
#[derive(Debug, PartialEq, Eq)]
struct Party {
    remaining: Amount,
    sequence: usize,
    user_id: String,
}

impl Ord for Party {
    fn cmp(&self, other: &Self) -> Ordering {
        self.remaining
            .cmp(&other.remaining)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Party {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reduces net balances to a short list of peer-to-peer payments.
///
/// Balances above `threshold` are creditors, balances below `-threshold`
/// are debtors. Each round the largest debtor pays the largest creditor
/// `min(creditor, debtor)`; a party whose remainder is at or below
/// `threshold` drops out, anyone else goes back into contention. When both
/// parties are equal they are cleared by a single payment.
///
/// At most `non_zero_balances - 1` settlements are produced.
///
/// # Errors
///
/// Returns `InternalInvariantError` if total credit and total debt differ
/// by more than `threshold`. Balances from
/// [`calculate_balances`](super::calculate_balances) never do.
///
/// # Examples
///
/// ```
/// use trip_ledger::calculation::{optimize_settlements, DEFAULT_SETTLEMENT_THRESHOLD};
/// use trip_ledger::models::{Amount, Balance};
/// use std::str::FromStr;
///
/// let balances = vec![
///     Balance::new("alice", Amount::from_str("60.00").unwrap()),
///     Balance::new("bob", Amount::from_str("-20.00").unwrap()),
///     Balance::new("carol", Amount::from_str("-40.00").unwrap()),
/// ];
/// let result = optimize_settlements(&balances, DEFAULT_SETTLEMENT_THRESHOLD, 1).unwrap();
///
/// assert_eq!(result.settlements.len(), 2);
/// assert_eq!(result.settlements[0].from_user_id, "carol");
/// assert_eq!(result.settlements[0].amount.to_string(), "40.00");
/// ```
pub fn optimize_settlements(
    balances: &[Balance],
    threshold: Amount,
    step_number: u32,
) -> EngineResult<SettlementOptimization> {
    let total_credit: Amount = balances
        .iter()
        .filter(|b| b.amount.is_positive())
        .map(|b| b.amount)
        .sum();
    let total_debt: Amount = balances
        .iter()
        .filter(|b| b.amount.is_negative())
        .map(|b| b.amount.abs())
        .sum();

    if (total_credit - total_debt).abs() > threshold {
        warn!(
            total_credit = %total_credit,
            total_debt = %total_debt,
            "Credit and debt do not match"
        );
        return Err(EngineError::InternalInvariantError {
            message: format!(
                "creditors are owed {} but debtors owe {}",
                total_credit, total_debt
            ),
        });
    }

    let mut creditors = BinaryHeap::new();
    let mut debtors = BinaryHeap::new();
    let mut residue = Amount::ZERO;

    for (sequence, balance) in balances.iter().enumerate() {
        let party = Party {
            remaining: balance.amount.abs(),
            sequence,
            user_id: balance.user_id.clone(),
        };
        if balance.amount > threshold {
            creditors.push(party);
        } else if balance.amount < -threshold {
            debtors.push(party);
        } else {
            residue += party.remaining;
        }
    }

    let creditor_count = creditors.len();
    let debtor_count = debtors.len();
    let mut settlements = Vec::new();
    let mut next_sequence = balances.len();

    while let (Some(mut creditor), Some(mut debtor)) = (creditors.pop(), debtors.pop()) {
        let transfer = creditor.remaining.min(debtor.remaining);
        settlements.push(Settlement::new(
            debtor.user_id.clone(),
            creditor.user_id.clone(),
            transfer,
        ));

        creditor.remaining -= transfer;
        debtor.remaining -= transfer;

        for (mut party, heap) in [(creditor, &mut creditors), (debtor, &mut debtors)] {
            if party.remaining > threshold {
                party.sequence = next_sequence;
                next_sequence += 1;
                heap.push(party);
            } else {
                residue += party.remaining;
            }
        }
    }

    residue += creditors
        .iter()
        .chain(debtors.iter())
        .map(|p| p.remaining)
        .sum::<Amount>();

    let mut warnings = Vec::new();
    if !residue.is_zero() {
        debug!(residue = %residue, "Residual balance left below settlement threshold");
        warnings.push(AuditWarning {
            code: "RESIDUAL_BALANCE".to_string(),
            message: format!(
                "${} of balances fell at or below the ${} threshold and was left unsettled",
                residue, threshold
            ),
            severity: "low".to_string(),
        });
    }

    let transferred: Amount = settlements.iter().map(|s| s.amount).sum();
    let audit_step = AuditStep {
        step_number,
        rule_id: "settlement_optimization".to_string(),
        rule_name: "Greedy Settlement Optimization".to_string(),
        input: serde_json::json!({
            "creditors": creditor_count,
            "debtors": debtor_count,
            "total_credit": total_credit.to_string(),
            "threshold": threshold.to_string()
        }),
        output: serde_json::json!({
            "settlements": settlements.len(),
            "total_transferred": transferred.to_string(),
            "residue": residue.to_string()
        }),
        reasoning: format!(
            "Matched {} creditors with {} debtors in {} payments totalling ${}",
            creditor_count,
            debtor_count,
            settlements.len(),
            transferred
        ),
    };

    Ok(SettlementOptimization {
        settlements,
        audit_step,
        warnings,
    })
}
