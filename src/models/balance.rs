//! Balance and summary models.

use serde::{Deserialize, Serialize};

use super::Amount;

/// A member's net position across the trip's unsettled splits.
///
/// Positive means the member is owed money, negative means they owe money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// The member.
    pub user_id: String,
    /// Signed net amount.
    pub amount: Amount,
}

impl Balance {
    /// Creates a balance entry.
    pub fn new(user_id: impl Into<String>, amount: Amount) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
        }
    }
}

/// A trip member as known to the surrounding system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripMember {
    /// The member's user id.
    pub user_id: String,
    /// The member's display name.
    pub name: String,
}

/// Per-member breakdown of what was paid and what is owed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalance {
    /// The member's user id.
    pub user_id: String,
    /// The member's display name, or "Unknown".
    pub user_name: String,
    /// Sum of expense totals this member paid.
    pub total_paid: Amount,
    /// Sum of this member's unsettled split amounts.
    pub total_owed: Amount,
    /// Sum of settled splits on expenses this member paid, their own included.
    pub total_settled: Amount,
    /// `total_paid - total_settled - total_owed`.
    pub net_balance: Amount,
}

/// Trip-wide expense totals with per-member balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    /// Sum of all expense totals.
    pub total_expenses: Amount,
    /// Number of expenses.
    pub expense_count: usize,
    /// One entry per member.
    pub balances: Vec<UserBalance>,
}
