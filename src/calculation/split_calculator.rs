//! Split calculation entry point.
//!
//! This module dispatches a [`SplitPlan`] to the policy-specific calculators
//! and holds the checks and residue handling they share.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Amount, AuditStep, CalculatedSplit, SplitPlan, SplitType};

use super::equal_split::calculate_equal_split;
use super::exact_split::calculate_exact_split;
use super::percentage_split::calculate_percentage_split;
use super::shares_split::calculate_shares_split;

/// Default tolerance when reconciling configured percentages or amounts.
pub const DEFAULT_SPLIT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// The result of splitting one expense, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitCalculation {
    /// One entry per member, in configuration order.
    pub splits: Vec<CalculatedSplit>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

impl SplitCalculation {
    /// Returns the sum of all split amounts.
    pub fn total(&self) -> Amount {
        self.splits.iter().map(|s| s.amount).sum()
    }
}

/// Splits an expense total according to a split plan.
///
/// An equal plan with no members yields an empty result. Every other plan
/// must carry at least one member configuration.
///
/// # Arguments
///
/// * `total` - The expense total, must be positive
/// * `plan` - The split policy with its ordered member configuration
/// * `tolerance` - Allowed mismatch when reconciling percentages or exact amounts
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// - `ConfigurationError` if a non-equal plan has no member configuration
/// - `ValidationError` if the total is not positive or the configured values
///   do not reconcile with the total
///
/// # Examples
///
/// ```
/// use trip_ledger::calculation::{calculate_splits, DEFAULT_SPLIT_TOLERANCE};
/// use trip_ledger::models::{Amount, SplitPlan};
/// use std::str::FromStr;
///
/// let plan = SplitPlan::Equal(vec!["a".to_string(), "b".to_string(), "c".to_string()]);
/// let total = Amount::from_str("100.00").unwrap();
/// let result = calculate_splits(total, &plan, DEFAULT_SPLIT_TOLERANCE, 1).unwrap();
///
/// let amounts: Vec<String> = result.splits.iter().map(|s| s.amount.to_string()).collect();
/// assert_eq!(amounts, vec!["33.34", "33.33", "33.33"]);
/// assert_eq!(result.total(), total);
/// ```
pub fn calculate_splits(
    total: Amount,
    plan: &SplitPlan,
    tolerance: Decimal,
    step_number: u32,
) -> EngineResult<SplitCalculation> {
    if matches!(plan, SplitPlan::Equal(member_ids) if member_ids.is_empty()) {
        return Ok(calculate_equal_split(total, &[], step_number));
    }

    require_configuration(plan.split_type(), plan.member_count())?;
    require_positive_total(total)?;

    match plan {
        SplitPlan::Equal(member_ids) => Ok(calculate_equal_split(total, member_ids, step_number)),
        SplitPlan::Percentage(configs) => {
            calculate_percentage_split(total, configs, tolerance, step_number)
        }
        SplitPlan::Shares(configs) => calculate_shares_split(total, configs, step_number),
        SplitPlan::Exact(configs) => calculate_exact_split(total, configs, tolerance, step_number),
    }
}

/// Fails with `ConfigurationError` when a non-equal policy has no members configured.
pub(crate) fn require_configuration(split_type: SplitType, member_count: usize) -> EngineResult<()> {
    if split_type != SplitType::Equal && member_count == 0 {
        return Err(EngineError::ConfigurationError {
            policy: split_type.to_string(),
            message: "per-member split configuration is required".to_string(),
        });
    }
    Ok(())
}

/// Fails with `ValidationError` unless `0 < total <= Amount::MAX`.
pub(crate) fn require_positive_total(total: Amount) -> EngineResult<()> {
    if !total.is_positive() {
        return Err(EngineError::ValidationError {
            subject: "expense total".to_string(),
            expected: "> 0".to_string(),
            actual: total.to_string(),
        });
    }
    if total > Amount::MAX {
        return Err(EngineError::ValidationError {
            subject: "expense total".to_string(),
            expected: format!("<= {}", Amount::MAX),
            actual: total.to_string(),
        });
    }
    Ok(())
}

/// Replaces the last member's amount with whatever the others leave of the total.
///
/// This is what makes proportional splits reconstruct the total exactly.
/// Shares are not clamped or redistributed: when half-up rounding of the
/// other members overshoots the total, the split is rejected. Four equal
/// shares of $0.02 round to $0.01 each and leave the last member -$0.01.
pub(crate) fn absorb_residue(total: Amount, mut amounts: Vec<Amount>) -> EngineResult<Vec<Amount>> {
    let Some(last) = amounts.len().checked_sub(1) else {
        return Ok(amounts);
    };

    let others_total: Amount = amounts[..last].iter().sum();
    let remainder = total - others_total;
    if remainder.is_negative() {
        return Err(EngineError::ValidationError {
            subject: "share left for the last member".to_string(),
            expected: ">= 0".to_string(),
            actual: remainder.to_string(),
        });
    }
    amounts[last] = remainder;

    Ok(amounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExactConfig, PercentageConfig, SharesConfig};
    use std::str::FromStr;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_empty_equal_plan_yields_empty_result() {
        let plan = SplitPlan::Equal(vec![]);
        let result = calculate_splits(amt("100.00"), &plan, DEFAULT_SPLIT_TOLERANCE, 1).unwrap();

        assert!(result.splits.is_empty());
    }

    #[test]
    fn test_empty_equal_plan_ignores_total() {
        let plan = SplitPlan::Equal(vec![]);
        let result = calculate_splits(Amount::ZERO, &plan, DEFAULT_SPLIT_TOLERANCE, 1);

        assert!(result.is_ok());
    }

    #[test]
    fn test_percentage_without_configuration_is_configuration_error() {
        let plan = SplitPlan::Percentage(vec![]);
        let result = calculate_splits(amt("50.00"), &plan, DEFAULT_SPLIT_TOLERANCE, 1);

        match result {
            Err(EngineError::ConfigurationError { policy, .. }) => assert_eq!(policy, "percentage"),
            other => panic!("Expected ConfigurationError, got {:?}", other),
        }
    }

    #[test]
    fn test_shares_and_exact_without_configuration_are_configuration_errors() {
        for plan in [SplitPlan::Shares(vec![]), SplitPlan::Exact(vec![])] {
            let result = calculate_splits(amt("50.00"), &plan, DEFAULT_SPLIT_TOLERANCE, 1);
            assert!(matches!(
                result,
                Err(EngineError::ConfigurationError { .. })
            ));
        }
    }

    #[test]
    fn test_non_positive_total_is_validation_error() {
        let plan = SplitPlan::Equal(ids(&["a", "b"]));

        for total in ["0.00", "-10.00"] {
            match calculate_splits(amt(total), &plan, DEFAULT_SPLIT_TOLERANCE, 1) {
                Err(EngineError::ValidationError {
                    subject, actual, ..
                }) => {
                    assert_eq!(subject, "expense total");
                    assert_eq!(actual, total);
                }
                other => panic!("Expected ValidationError, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_total_above_max_is_validation_error() {
        let plan = SplitPlan::Percentage(vec![PercentageConfig {
            user_id: "a".to_string(),
            percentage: dec("100"),
        }]);
        let total = Amount::new(dec("1000000000000000000000000000"));

        match calculate_splits(total, &plan, DEFAULT_SPLIT_TOLERANCE, 1) {
            Err(EngineError::ValidationError { subject, expected, .. }) => {
                assert_eq!(subject, "expense total");
                assert_eq!(expected, "<= 1000000000000.00");
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_total_at_max_splits() {
        let plan = SplitPlan::Equal(ids(&["a", "b", "c"]));
        let result = calculate_splits(Amount::MAX, &plan, DEFAULT_SPLIT_TOLERANCE, 1).unwrap();

        assert_eq!(result.total(), Amount::MAX);
    }

    #[test]
    fn test_dispatches_each_policy() {
        let total = amt("60.00");

        let equal = SplitPlan::Equal(ids(&["a", "b"]));
        let percentage = SplitPlan::Percentage(vec![
            PercentageConfig {
                user_id: "a".to_string(),
                percentage: dec("25"),
            },
            PercentageConfig {
                user_id: "b".to_string(),
                percentage: dec("75"),
            },
        ]);
        let shares = SplitPlan::Shares(vec![
            SharesConfig {
                user_id: "a".to_string(),
                shares: 1,
            },
            SharesConfig {
                user_id: "b".to_string(),
                shares: 2,
            },
        ]);
        let exact = SplitPlan::Exact(vec![
            ExactConfig {
                user_id: "a".to_string(),
                amount: amt("10.00"),
            },
            ExactConfig {
                user_id: "b".to_string(),
                amount: amt("50.00"),
            },
        ]);

        let expectations = [
            (equal, "equal_split", ["30.00", "30.00"]),
            (percentage, "percentage_split", ["15.00", "45.00"]),
            (shares, "shares_split", ["20.00", "40.00"]),
            (exact, "exact_split", ["10.00", "50.00"]),
        ];

        for (plan, rule_id, amounts) in expectations {
            let result = calculate_splits(total, &plan, DEFAULT_SPLIT_TOLERANCE, 3).unwrap();
            assert_eq!(result.audit_step.rule_id, rule_id);
            assert_eq!(result.audit_step.step_number, 3);
            assert_eq!(result.splits[0].amount, amt(amounts[0]));
            assert_eq!(result.splits[1].amount, amt(amounts[1]));
            assert_eq!(result.total(), total);
        }
    }

    #[test]
    fn test_absorb_residue_gives_last_member_the_remainder() {
        let amounts = vec![amt("33.33"), amt("33.33"), amt("33.33")];
        let absorbed = absorb_residue(amt("100.00"), amounts).unwrap();

        assert_eq!(absorbed, vec![amt("33.33"), amt("33.33"), amt("33.34")]);
    }

    #[test]
    fn test_absorb_residue_rejects_negative_remainder() {
        let amounts = vec![amt("60.00"), amt("50.00"), amt("0.00")];
        let result = absorb_residue(amt("100.00"), amounts);

        assert!(matches!(result, Err(EngineError::ValidationError { .. })));
    }

    #[test]
    fn test_tiny_total_split_four_ways_by_shares_is_rejected() {
        let plan = SplitPlan::Shares(
            ["a", "b", "c", "d"]
                .iter()
                .map(|id| SharesConfig {
                    user_id: id.to_string(),
                    shares: 1,
                })
                .collect(),
        );

        match calculate_splits(amt("0.02"), &plan, DEFAULT_SPLIT_TOLERANCE, 1) {
            Err(EngineError::ValidationError {
                subject, actual, ..
            }) => {
                assert_eq!(subject, "share left for the last member");
                assert_eq!(actual, "-0.01");
            }
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_tiny_total_split_four_ways_equally_succeeds() {
        let plan = SplitPlan::Equal(ids(&["a", "b", "c", "d"]));
        let result = calculate_splits(amt("0.02"), &plan, DEFAULT_SPLIT_TOLERANCE, 1).unwrap();

        let amounts: Vec<String> = result.splits.iter().map(|s| s.amount.to_string()).collect();
        assert_eq!(amounts, vec!["0.01", "0.01", "0.00", "0.00"]);
    }

    #[test]
    fn test_absorb_residue_on_empty_list() {
        let absorbed = absorb_residue(amt("10.00"), vec![]).unwrap();
        assert!(absorbed.is_empty());
    }
}
