//! Expense and split models.
//!
//! An [`Expense`] owns its [`Split`]s. Splits are only ever replaced as a
//! whole set, never edited one amount at a time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::{Amount, CalculatedSplit, SplitType};

/// The category an expense is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    /// Meals and groceries.
    Food,
    /// Flights, trains, taxis, fuel.
    Transport,
    /// Hotels and rentals.
    Lodging,
    /// Tours, tickets, entrance fees.
    Activity,
    /// Souvenirs and other purchases.
    Shopping,
    /// Anything else.
    #[default]
    Other,
}

/// One member's stored share of an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// Unique identifier for the split.
    pub id: String,
    /// The member owing this amount.
    pub user_id: String,
    /// The amount owed.
    pub amount: Amount,
    /// Display percentage recorded at calculation time.
    #[serde(default)]
    pub percentage: Option<rust_decimal::Decimal>,
    /// Share count recorded at calculation time.
    #[serde(default)]
    pub shares: Option<u32>,
    /// Whether the member already paid this share outside the system.
    #[serde(default)]
    pub is_settled: bool,
}

impl Split {
    /// Creates an unsettled split with a fresh id from a calculated split.
    pub fn from_calculated(calculated: CalculatedSplit) -> Self {
        Split {
            id: Uuid::new_v4().to_string(),
            user_id: calculated.user_id,
            amount: calculated.amount,
            percentage: calculated.percentage,
            shares: calculated.shares,
            is_settled: false,
        }
    }
}

/// A shared cost paid by one trip member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier for the expense.
    pub id: String,
    /// What the money was spent on.
    pub description: String,
    /// The total amount paid.
    pub amount: Amount,
    /// ISO currency code. Opaque to the engine.
    pub currency: String,
    /// The category the expense is filed under.
    #[serde(default)]
    pub category: ExpenseCategory,
    /// The member who paid.
    pub paid_by_id: String,
    /// The split policy used to compute `splits`.
    pub split_type: SplitType,
    /// The date the expense was incurred.
    pub expense_date: NaiveDate,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// The per-member shares of `amount`.
    #[serde(default)]
    pub splits: Vec<Split>,
}

impl Expense {
    /// Returns the sum of all split amounts, settled or not.
    pub fn splits_total(&self) -> Amount {
        self.splits.iter().map(|s| s.amount).sum()
    }

    /// Returns `true` if the splits reconstruct the total exactly.
    pub fn is_balanced(&self) -> bool {
        self.splits.is_empty() || self.splits_total() == self.amount
    }

    /// Replaces the whole split set.
    ///
    /// The new set must be computed in full before calling this; the old
    /// splits are dropped, settled flags included.
    pub fn replace_splits(&mut self, split_type: SplitType, splits: Vec<CalculatedSplit>) {
        self.split_type = split_type;
        self.splits = splits.into_iter().map(Split::from_calculated).collect();
    }

    /// Marks a single split as settled.
    ///
    /// # Errors
    ///
    /// Returns `SplitNotFound` if no split has the given id.
    pub fn settle_split(&mut self, split_id: &str) -> EngineResult<&Split> {
        let expense_id = self.id.clone();
        let split = self
            .splits
            .iter_mut()
            .find(|s| s.id == split_id)
            .ok_or_else(|| EngineError::SplitNotFound {
                expense_id,
                split_id: split_id.to_string(),
            })?;
        split.is_settled = true;
        Ok(&*split)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn calculated(user_id: &str, amount: &str) -> CalculatedSplit {
        CalculatedSplit {
            user_id: user_id.to_string(),
            amount: amt(amount),
            percentage: None,
            shares: None,
        }
    }

    fn create_test_expense() -> Expense {
        let mut expense = Expense {
            id: "exp_001".to_string(),
            description: "Dinner".to_string(),
            amount: amt("90.00"),
            currency: "USD".to_string(),
            category: ExpenseCategory::Food,
            paid_by_id: "alice".to_string(),
            split_type: SplitType::Equal,
            expense_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            notes: None,
            splits: vec![],
        };
        expense.replace_splits(
            SplitType::Equal,
            vec![
                calculated("alice", "30.00"),
                calculated("bob", "30.00"),
                calculated("carol", "30.00"),
            ],
        );
        expense
    }

    #[test]
    fn test_replace_splits_assigns_fresh_ids() {
        let expense = create_test_expense();

        assert_eq!(expense.splits.len(), 3);
        assert!(expense.splits.iter().all(|s| !s.is_settled));
        assert_ne!(expense.splits[0].id, expense.splits[1].id);
        assert!(Uuid::parse_str(&expense.splits[0].id).is_ok());
    }

    #[test]
    fn test_replace_splits_discards_settled_state() {
        let mut expense = create_test_expense();
        let split_id = expense.splits[1].id.clone();
        expense.settle_split(&split_id).unwrap();

        expense.replace_splits(
            SplitType::Exact,
            vec![calculated("alice", "40.00"), calculated("bob", "50.00")],
        );

        assert_eq!(expense.split_type, SplitType::Exact);
        assert_eq!(expense.splits.len(), 2);
        assert!(expense.splits.iter().all(|s| !s.is_settled));
    }

    #[test]
    fn test_is_balanced() {
        let mut expense = create_test_expense();
        assert!(expense.is_balanced());

        expense.splits[0].amount = amt("29.99");
        assert!(!expense.is_balanced());
        assert_eq!(expense.splits_total(), amt("89.99"));
    }

    #[test]
    fn test_settle_split_marks_only_that_split() {
        let mut expense = create_test_expense();
        let split_id = expense.splits[2].id.clone();

        let settled = expense.settle_split(&split_id).unwrap();
        assert_eq!(settled.user_id, "carol");

        assert!(expense.splits[2].is_settled);
        assert!(!expense.splits[0].is_settled);
        assert!(!expense.splits[1].is_settled);
    }

    #[test]
    fn test_settle_unknown_split_returns_error() {
        let mut expense = create_test_expense();

        match expense.settle_split("missing") {
            Err(EngineError::SplitNotFound {
                expense_id,
                split_id,
            }) => {
                assert_eq!(expense_id, "exp_001");
                assert_eq!(split_id, "missing");
            }
            other => panic!("Expected SplitNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_expense_with_defaults() {
        let json = r#"{
            "id": "exp_002",
            "description": "Taxi",
            "amount": "24.50",
            "currency": "EUR",
            "paid_by_id": "bob",
            "split_type": "equal",
            "expense_date": "2026-03-15"
        }"#;

        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.category, ExpenseCategory::Other);
        assert_eq!(expense.amount, amt("24.50"));
        assert!(expense.splits.is_empty());
        assert!(expense.is_balanced());
    }
}
