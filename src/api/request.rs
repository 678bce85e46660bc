//! Request types for the trip ledger service.
//!
//! These are the loosely-typed shapes the surrounding application hands
//! over. Conversion into [`SplitPlan`] is where missing per-member
//! configuration is caught.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Amount, ExactConfig, Expense, ExpenseCategory, PercentageConfig, SharesConfig, SplitPlan,
    SplitType, TripMember,
};

/// One member's entry in a non-equal split configuration.
///
/// Only the field matching the split type is read; the others are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfigRequest {
    /// The member this entry configures.
    pub user_id: String,
    /// Percentage of the total, for percentage splits.
    #[serde(default)]
    pub percentage: Option<Decimal>,
    /// Share count, for share splits.
    #[serde(default)]
    pub shares: Option<u32>,
    /// Fixed amount, for exact splits.
    #[serde(default)]
    pub amount: Option<Amount>,
}

/// How an amount should be divided.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SplitRequest {
    /// The split policy.
    #[serde(default)]
    pub split_type: SplitType,
    /// Members sharing an equal split. Falls back to the trip members.
    #[serde(default)]
    pub member_ids: Option<Vec<String>>,
    /// Per-member configuration for the other policies.
    #[serde(default)]
    pub split_configs: Option<Vec<SplitConfigRequest>>,
}

impl SplitRequest {
    /// Converts the request into a typed split plan.
    ///
    /// An equal split without `member_ids` (or with an empty list) uses
    /// `trip_members` in their given order.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if a non-equal policy has no
    /// `split_configs`, or an entry lacks the field its policy needs.
    ///
    /// # Example
    ///
    /// ```
    /// use trip_ledger::api::SplitRequest;
    /// use trip_ledger::models::{SplitPlan, SplitType};
    ///
    /// let request = SplitRequest {
    ///     split_type: SplitType::Equal,
    ///     member_ids: None,
    ///     split_configs: None,
    /// };
    /// let plan = request.split_plan(&["a".to_string(), "b".to_string()]).unwrap();
    /// assert_eq!(plan, SplitPlan::Equal(vec!["a".to_string(), "b".to_string()]));
    /// ```
    pub fn split_plan(&self, trip_members: &[String]) -> EngineResult<SplitPlan> {
        match self.split_type {
            SplitType::Equal => {
                let members = match &self.member_ids {
                    Some(ids) if !ids.is_empty() => ids.clone(),
                    _ => trip_members.to_vec(),
                };
                Ok(SplitPlan::Equal(members))
            }
            SplitType::Percentage => self
                .configs()?
                .iter()
                .map(|c| {
                    Ok(PercentageConfig {
                        user_id: c.user_id.clone(),
                        percentage: require_field(self.split_type, c, "percentage", c.percentage)?,
                    })
                })
                .collect::<EngineResult<Vec<_>>>()
                .map(SplitPlan::Percentage),
            SplitType::Shares => self
                .configs()?
                .iter()
                .map(|c| {
                    Ok(SharesConfig {
                        user_id: c.user_id.clone(),
                        shares: require_field(self.split_type, c, "shares", c.shares)?,
                    })
                })
                .collect::<EngineResult<Vec<_>>>()
                .map(SplitPlan::Shares),
            SplitType::Exact => self
                .configs()?
                .iter()
                .map(|c| {
                    Ok(ExactConfig {
                        user_id: c.user_id.clone(),
                        amount: require_field(self.split_type, c, "amount", c.amount)?,
                    })
                })
                .collect::<EngineResult<Vec<_>>>()
                .map(SplitPlan::Exact),
        }
    }

    /// Per-member configuration for the non-equal policies.
    fn configs(&self) -> EngineResult<&[SplitConfigRequest]> {
        match self.split_configs.as_deref() {
            Some(configs) if !configs.is_empty() => Ok(configs),
            _ => Err(EngineError::ConfigurationError {
                policy: self.split_type.to_string(),
                message: "split_configs must list at least one member".to_string(),
            }),
        }
    }
}

fn require_field<T>(
    split_type: SplitType,
    config: &SplitConfigRequest,
    field: &str,
    value: Option<T>,
) -> EngineResult<T> {
    value.ok_or_else(|| EngineError::ConfigurationError {
        policy: split_type.to_string(),
        message: format!("missing {} for member '{}'", field, config.user_id),
    })
}

/// Request to compute splits for an amount without creating an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculateSplitRequest {
    /// The amount to divide.
    pub amount: Amount,
    /// How to divide it.
    #[serde(flatten)]
    pub split: SplitRequest,
    /// Trip members used when an equal split names nobody.
    #[serde(default)]
    pub trip_members: Vec<TripMember>,
}

/// Request to record a new expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateExpenseRequest {
    /// What the money was spent on.
    pub description: String,
    /// The total paid.
    pub amount: Amount,
    /// ISO currency code. Defaults to the configured currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// Expense category.
    #[serde(default)]
    pub category: ExpenseCategory,
    /// The member who paid.
    pub paid_by_id: String,
    /// The date the expense was incurred.
    pub expense_date: NaiveDate,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// How to divide the total.
    #[serde(flatten)]
    pub split: SplitRequest,
}

impl CreateExpenseRequest {
    /// Checks the fields the split calculator does not.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a blank description, a blank payer or
    /// a non-positive amount.
    pub fn validate(&self) -> EngineResult<()> {
        require_text("description", &self.description)?;
        require_text("paid_by_id", &self.paid_by_id)?;
        require_positive_amount(self.amount)
    }
}

/// Request to edit an existing expense. Absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateExpenseRequest {
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New total.
    #[serde(default)]
    pub amount: Option<Amount>,
    /// New currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// New category.
    #[serde(default)]
    pub category: Option<ExpenseCategory>,
    /// New split policy.
    #[serde(default)]
    pub split_type: Option<SplitType>,
    /// New expense date.
    #[serde(default)]
    pub expense_date: Option<NaiveDate>,
    /// New notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// New equal-split members.
    #[serde(default)]
    pub member_ids: Option<Vec<String>>,
    /// New per-member configuration.
    #[serde(default)]
    pub split_configs: Option<Vec<SplitConfigRequest>>,
}

impl UpdateExpenseRequest {
    /// Returns `true` if the edit touches the amount or how it is divided.
    pub fn changes_splits(&self) -> bool {
        self.amount.is_some()
            || self.split_type.is_some()
            || self.member_ids.is_some()
            || self.split_configs.is_some()
    }

    /// Checks the fields being changed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a blank description or a non-positive
    /// amount.
    pub fn validate(&self) -> EngineResult<()> {
        if let Some(description) = &self.description {
            require_text("description", description)?;
        }
        if let Some(amount) = self.amount {
            require_positive_amount(amount)?;
        }
        Ok(())
    }

    /// Applies the non-split fields to `expense`.
    pub fn apply_details(&self, expense: &mut Expense) {
        if let Some(description) = &self.description {
            expense.description = description.clone();
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(currency) = &self.currency {
            expense.currency = currency.clone();
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(expense_date) = self.expense_date {
            expense.expense_date = expense_date;
        }
        if self.notes.is_some() {
            expense.notes = self.notes.clone();
        }
    }

    /// Builds the split request for recomputing `expense`'s splits.
    ///
    /// The policy defaults to the expense's current one.
    pub fn split_request(&self, expense: &Expense) -> SplitRequest {
        SplitRequest {
            split_type: self.split_type.unwrap_or(expense.split_type),
            member_ids: self.member_ids.clone(),
            split_configs: self.split_configs.clone(),
        }
    }
}

/// Request for balances, a summary or a settlement plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRequest {
    /// The trip's expenses with their current splits.
    pub expenses: Vec<Expense>,
    /// Trip members, for display names.
    #[serde(default)]
    pub members: Vec<TripMember>,
    /// Currency reported on the plan. Defaults to the configured currency.
    #[serde(default)]
    pub currency: Option<String>,
}

fn require_text(field: &str, value: &str) -> EngineResult<()> {
    if value.trim().is_empty() {
        return Err(EngineError::ValidationError {
            subject: field.to_string(),
            expected: "non-empty text".to_string(),
            actual: "empty".to_string(),
        });
    }
    Ok(())
}

fn require_positive_amount(amount: Amount) -> EngineResult<()> {
    if !amount.is_positive() {
        return Err(EngineError::ValidationError {
            subject: "amount".to_string(),
            expected: "> 0".to_string(),
            actual: amount.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn config(user_id: &str) -> SplitConfigRequest {
        SplitConfigRequest {
            user_id: user_id.to_string(),
            percentage: None,
            shares: None,
            amount: None,
        }
    }

    #[test]
    fn test_equal_uses_explicit_members() {
        let request = SplitRequest {
            split_type: SplitType::Equal,
            member_ids: Some(ids(&["b", "a"])),
            split_configs: None,
        };

        let plan = request.split_plan(&ids(&["a", "b", "c"])).unwrap();
        assert_eq!(plan, SplitPlan::Equal(ids(&["b", "a"])));
    }

    #[test]
    fn test_equal_empty_members_falls_back_to_trip() {
        let request = SplitRequest {
            split_type: SplitType::Equal,
            member_ids: Some(vec![]),
            split_configs: None,
        };

        let plan = request.split_plan(&ids(&["a", "b"])).unwrap();
        assert_eq!(plan, SplitPlan::Equal(ids(&["a", "b"])));
    }

    #[test]
    fn test_missing_configs_is_configuration_error() {
        let request = SplitRequest {
            split_type: SplitType::Percentage,
            member_ids: Some(ids(&["a"])),
            split_configs: None,
        };

        match request.split_plan(&[]) {
            Err(EngineError::ConfigurationError { policy, .. }) => {
                assert_eq!(policy, "percentage");
            }
            other => panic!("Expected ConfigurationError, got {:?}", other),
        }
    }

    #[test]
    fn test_equal_ignores_split_configs() {
        let request = SplitRequest {
            split_type: SplitType::Equal,
            member_ids: None,
            split_configs: Some(vec![config("z")]),
        };

        let plan = request.split_plan(&ids(&["a", "b"])).unwrap();
        assert_eq!(plan, SplitPlan::Equal(ids(&["a", "b"])));
    }

    #[test]
    fn test_empty_configs_is_configuration_error_for_each_policy() {
        for split_type in [SplitType::Percentage, SplitType::Shares, SplitType::Exact] {
            let request = SplitRequest {
                split_type,
                member_ids: None,
                split_configs: Some(vec![]),
            };

            match request.split_plan(&ids(&["a"])) {
                Err(EngineError::ConfigurationError { policy, .. }) => {
                    assert_eq!(policy, split_type.to_string());
                }
                other => panic!("Expected ConfigurationError, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_missing_field_is_configuration_error() {
        let mut with_shares = config("a");
        with_shares.shares = Some(2);
        let request = SplitRequest {
            split_type: SplitType::Shares,
            member_ids: None,
            split_configs: Some(vec![with_shares, config("b")]),
        };

        match request.split_plan(&[]) {
            Err(EngineError::ConfigurationError { message, .. }) => {
                assert!(message.contains("shares"));
                assert!(message.contains("'b'"));
            }
            other => panic!("Expected ConfigurationError, got {:?}", other),
        }
    }

    #[test]
    fn test_other_policy_fields_are_ignored() {
        let mut entry = config("a");
        entry.amount = Some(Amount::from_str("10.00").unwrap());
        entry.percentage = Some(Decimal::from(100));
        let request = SplitRequest {
            split_type: SplitType::Exact,
            member_ids: None,
            split_configs: Some(vec![entry]),
        };

        match request.split_plan(&[]).unwrap() {
            SplitPlan::Exact(configs) => {
                assert_eq!(configs[0].amount, Amount::from_str("10.00").unwrap());
            }
            other => panic!("Expected exact plan, got {:?}", other),
        }
    }

    #[test]
    fn test_create_request_from_json() {
        let json = r#"{
            "description": "Dinner",
            "amount": "100.00",
            "paid_by_id": "alice",
            "expense_date": "2026-03-14",
            "category": "food",
            "split_type": "percentage",
            "split_configs": [
                {"user_id": "alice", "percentage": "60"},
                {"user_id": "bob", "percentage": "40"}
            ]
        }"#;

        let request: CreateExpenseRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.category, ExpenseCategory::Food);
        assert_eq!(request.split.split_type, SplitType::Percentage);
        assert!(request.currency.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_zero_amount() {
        let request = CreateExpenseRequest {
            description: "Snacks".to_string(),
            amount: Amount::ZERO,
            currency: None,
            category: ExpenseCategory::Food,
            paid_by_id: "alice".to_string(),
            expense_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            notes: None,
            split: SplitRequest::default(),
        };

        match request.validate() {
            Err(EngineError::ValidationError { subject, .. }) => assert_eq!(subject, "amount"),
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_update_detects_split_changes() {
        let cosmetic = UpdateExpenseRequest {
            description: Some("Lunch".to_string()),
            ..Default::default()
        };
        assert!(!cosmetic.changes_splits());

        let amount = UpdateExpenseRequest {
            amount: Some(Amount::from_str("12.00").unwrap()),
            ..Default::default()
        };
        assert!(amount.changes_splits());
    }
}
