//! Percentage split calculation.
//!
//! Every member but the last pays `round_half_up(total * pct / 100)`.
//! The last member pays what is left, absorbing rounding residue.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Amount, AuditStep, CalculatedSplit, PercentageConfig, SplitType};

use super::SplitCalculation;
use super::split_calculator::{absorb_residue, require_configuration, require_positive_total};

/// Splits a total by configured percentages.
///
/// # Arguments
///
/// * `total` - The expense total, must be positive
/// * `configs` - Per-member percentages, in request order
/// * `tolerance` - How far the percentages may sum away from 100
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// - `ConfigurationError` if `configs` is empty
/// - `ValidationError` if a percentage is negative or above 100, or the
///   percentages do not sum to 100 within `tolerance`
/// - `ValidationError` if rounding the other members leaves the last member
///   a negative share, which only happens for totals of a few cents
///
/// # Examples
///
/// ```
/// use trip_ledger::calculation::{calculate_percentage_split, DEFAULT_SPLIT_TOLERANCE};
/// use trip_ledger::models::{Amount, PercentageConfig};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let configs = vec![
///     PercentageConfig { user_id: "a".to_string(), percentage: Decimal::from(50) },
///     PercentageConfig { user_id: "b".to_string(), percentage: Decimal::from(30) },
///     PercentageConfig { user_id: "c".to_string(), percentage: Decimal::from(20) },
/// ];
/// let total = Amount::from_str("50.00").unwrap();
/// let result = calculate_percentage_split(total, &configs, DEFAULT_SPLIT_TOLERANCE, 1).unwrap();
///
/// assert_eq!(result.splits[0].amount.to_string(), "25.00");
/// assert_eq!(result.splits[1].amount.to_string(), "15.00");
/// assert_eq!(result.splits[2].amount.to_string(), "10.00");
/// ```
pub fn calculate_percentage_split(
    total: Amount,
    configs: &[PercentageConfig],
    tolerance: Decimal,
    step_number: u32,
) -> EngineResult<SplitCalculation> {
    require_configuration(SplitType::Percentage, configs.len())?;
    require_positive_total(total)?;

    if let Some(negative) = configs.iter().find(|c| c.percentage < Decimal::ZERO) {
        return Err(EngineError::ValidationError {
            subject: format!("percentage for '{}'", negative.user_id),
            expected: ">= 0".to_string(),
            actual: negative.percentage.normalize().to_string(),
        });
    }

    if let Some(oversized) = configs
        .iter()
        .find(|c| c.percentage - Decimal::ONE_HUNDRED > tolerance)
    {
        return Err(EngineError::ValidationError {
            subject: format!("percentage for '{}'", oversized.user_id),
            expected: "<= 100".to_string(),
            actual: oversized.percentage.normalize().to_string(),
        });
    }

    let total_percentage: Decimal = configs.iter().map(|c| c.percentage).sum();
    if (total_percentage - Decimal::ONE_HUNDRED).abs() > tolerance {
        return Err(EngineError::ValidationError {
            subject: "percentage total".to_string(),
            expected: "100".to_string(),
            actual: total_percentage.normalize().to_string(),
        });
    }

    let proportional: Vec<Amount> = configs
        .iter()
        .map(|c| Amount::new(total.as_decimal() * c.percentage / Decimal::ONE_HUNDRED))
        .collect();
    let amounts = absorb_residue(total, proportional)?;

    let splits: Vec<CalculatedSplit> = configs
        .iter()
        .zip(amounts)
        .map(|(config, amount)| CalculatedSplit {
            user_id: config.user_id.clone(),
            amount,
            percentage: Some(config.percentage),
            shares: None,
        })
        .collect();

    let last = &splits[splits.len() - 1];
    let audit_step = AuditStep {
        step_number,
        rule_id: "percentage_split".to_string(),
        rule_name: "Percentage Split".to_string(),
        input: serde_json::json!({
            "total": total.to_string(),
            "percentages": configs
                .iter()
                .map(|c| c.percentage.normalize().to_string())
                .collect::<Vec<_>>()
        }),
        output: serde_json::json!({
            "amounts": splits.iter().map(|s| s.amount.to_string()).collect::<Vec<_>>(),
            "residue_absorbed_by": last.user_id
        }),
        reasoning: format!(
            "Percentages sum to {}; '{}' pays the remaining ${}",
            total_percentage.normalize(),
            last.user_id,
            last.amount
        ),
    };

    Ok(SplitCalculation { splits, audit_step })
}
