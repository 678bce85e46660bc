//! Trip expense summary.
//!
//! Breaks each member's net balance down into what they paid, what they
//! still owe and what has already been repaid to them.

use std::collections::HashMap;

use crate::models::{Amount, Expense, ExpenseSummary, TripMember, UserBalance};

use super::balances::Ledger;

/// Builds the expense summary for a trip.
///
/// Every trip member gets an entry, in member order, even with no activity.
/// Anyone who appears in the history without being a member is appended in
/// first-seen order with the name "Unknown". Expenses without splits count
/// towards `total_expenses` but not towards anyone's balance, matching
/// [`calculate_balances`](super::calculate_balances).
///
/// # Examples
///
/// ```
/// use trip_ledger::calculation::calculate_expense_summary;
/// use trip_ledger::models::TripMember;
///
/// let members = vec![TripMember { user_id: "a".to_string(), name: "Alice".to_string() }];
/// let summary = calculate_expense_summary(&[], &members);
///
/// assert_eq!(summary.expense_count, 0);
/// assert_eq!(summary.balances[0].user_name, "Alice");
/// ```
pub fn calculate_expense_summary(expenses: &[Expense], members: &[TripMember]) -> ExpenseSummary {
    let mut paid = Ledger::default();
    let mut owed = Ledger::default();
    let mut settled = Ledger::default();

    for member in members {
        paid.touch(&member.user_id);
    }

    for expense in expenses.iter().filter(|e| !e.splits.is_empty()) {
        paid.post(&expense.paid_by_id, expense.amount);
        for split in &expense.splits {
            paid.touch(&split.user_id);
            if split.is_settled {
                settled.post(&expense.paid_by_id, split.amount);
            } else {
                owed.post(&split.user_id, split.amount);
            }
        }
    }

    let names: HashMap<&str, &str> = members
        .iter()
        .map(|m| (m.user_id.as_str(), m.name.as_str()))
        .collect();

    let balances = paid
        .members()
        .iter()
        .map(|user_id| {
            let total_paid = paid.get(user_id);
            let total_owed = owed.get(user_id);
            let total_settled = settled.get(user_id);
            UserBalance {
                user_id: user_id.clone(),
                user_name: names
                    .get(user_id.as_str())
                    .copied()
                    .unwrap_or("Unknown")
                    .to_string(),
                total_paid,
                total_owed,
                total_settled,
                net_balance: total_paid - total_settled - total_owed,
            }
        })
        .collect();

    ExpenseSummary {
        total_expenses: expenses.iter().map(|e| e.amount).sum::<Amount>(),
        expense_count: expenses.len(),
        balances,
    }
}
