//! Split policy models.
//!
//! A [`SplitPlan`] carries exactly the per-member configuration its policy
//! needs, so the calculator never has to look up optional keys at runtime.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Amount;

/// The rule governing how an expense total divides among members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    /// Everyone pays the same, leftover cents go to the first members.
    #[default]
    Equal,
    /// Each member pays a configured percentage of the total.
    Percentage,
    /// Each member pays in proportion to an integer share count.
    Shares,
    /// Each member pays an explicitly configured amount.
    Exact,
}

impl SplitType {
    /// Returns the snake_case name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitType::Equal => "equal",
            SplitType::Percentage => "percentage",
            SplitType::Shares => "shares",
            SplitType::Exact => "exact",
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member's configured percentage of the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentageConfig {
    /// The member paying this share.
    pub user_id: String,
    /// Percentage of the total, e.g. `25.5` for 25.5%.
    pub percentage: Decimal,
}

/// A member's integer share count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharesConfig {
    /// The member paying this share.
    pub user_id: String,
    /// Number of shares (e.g. 2 for an adult, 1 for a child).
    pub shares: u32,
}

/// A member's explicitly configured amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactConfig {
    /// The member paying this share.
    pub user_id: String,
    /// The amount this member owes.
    pub amount: Amount,
}

/// A split policy together with its ordered member configuration.
///
/// Member order matters: equal splits hand leftover cents to the first
/// members, proportional splits let the last member absorb rounding residue.
///
/// # Example
///
/// ```
/// use trip_ledger::models::{SplitPlan, SplitType};
///
/// let plan = SplitPlan::Equal(vec!["alice".to_string(), "bob".to_string()]);
/// assert_eq!(plan.split_type(), SplitType::Equal);
/// assert_eq!(plan.member_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "split_type", content = "members", rename_all = "snake_case")]
pub enum SplitPlan {
    /// Equal split among the listed member ids.
    Equal(Vec<String>),
    /// Percentage split.
    Percentage(Vec<PercentageConfig>),
    /// Share-count split.
    Shares(Vec<SharesConfig>),
    /// Exact amounts.
    Exact(Vec<ExactConfig>),
}

impl SplitPlan {
    /// Returns the policy tag of this plan.
    pub fn split_type(&self) -> SplitType {
        match self {
            SplitPlan::Equal(_) => SplitType::Equal,
            SplitPlan::Percentage(_) => SplitType::Percentage,
            SplitPlan::Shares(_) => SplitType::Shares,
            SplitPlan::Exact(_) => SplitType::Exact,
        }
    }

    /// Returns the number of configured members.
    pub fn member_count(&self) -> usize {
        match self {
            SplitPlan::Equal(ids) => ids.len(),
            SplitPlan::Percentage(configs) => configs.len(),
            SplitPlan::Shares(configs) => configs.len(),
            SplitPlan::Exact(configs) => configs.len(),
        }
    }

    /// Returns the member ids in configuration order.
    pub fn member_ids(&self) -> Vec<&str> {
        match self {
            SplitPlan::Equal(ids) => ids.iter().map(String::as_str).collect(),
            SplitPlan::Percentage(configs) => configs.iter().map(|c| c.user_id.as_str()).collect(),
            SplitPlan::Shares(configs) => configs.iter().map(|c| c.user_id.as_str()).collect(),
            SplitPlan::Exact(configs) => configs.iter().map(|c| c.user_id.as_str()).collect(),
        }
    }
}

/// One member's computed share of a single expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedSplit {
    /// The member owing this amount.
    pub user_id: String,
    /// The computed amount.
    pub amount: Amount,
    /// Display percentage of the total, rounded to 2 places.
    pub percentage: Option<Decimal>,
    /// Share count, for share-based splits.
    pub shares: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_split_type_serialization() {
        assert_eq!(
            serde_json::to_string(&SplitType::Percentage).unwrap(),
            "\"percentage\""
        );
        let parsed: SplitType = serde_json::from_str("\"shares\"").unwrap();
        assert_eq!(parsed, SplitType::Shares);
        assert_eq!(SplitType::default(), SplitType::Equal);
    }

    #[test]
    fn test_split_type_display() {
        assert_eq!(SplitType::Exact.to_string(), "exact");
    }

    #[test]
    fn test_member_ids_preserve_order() {
        let plan = SplitPlan::Shares(vec![
            SharesConfig {
                user_id: "carol".to_string(),
                shares: 2,
            },
            SharesConfig {
                user_id: "alice".to_string(),
                shares: 1,
            },
        ]);

        assert_eq!(plan.member_ids(), vec!["carol", "alice"]);
        assert_eq!(plan.split_type(), SplitType::Shares);
    }

    #[test]
    fn test_split_plan_tagged_serialization() {
        let plan = SplitPlan::Exact(vec![ExactConfig {
            user_id: "alice".to_string(),
            amount: Amount::from_str("12.50").unwrap(),
        }]);

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["split_type"], "exact");
        assert_eq!(json["members"][0]["amount"], "12.50");
    }
}
