//! Exact-amount split calculation.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Amount, AuditStep, CalculatedSplit, ExactConfig, SplitType, round_half_up};

use super::SplitCalculation;
use super::split_calculator::{absorb_residue, require_configuration, require_positive_total};

/// Splits a total by explicitly configured amounts.
///
/// The configured amounts must sum to the total within `tolerance`. A
/// mismatch inside the tolerance is absorbed by the last member so the
/// splits still reconstruct the total exactly. The display percentage is
/// `amount / total * 100` rounded to 2 places.
///
/// # Errors
///
/// - `ConfigurationError` if `configs` is empty
/// - `ValidationError` if an amount is negative or exceeds the total by more
///   than `tolerance`, or the amounts do not sum to the total within `tolerance`
///
/// # Examples
///
/// ```
/// use trip_ledger::calculation::{calculate_exact_split, DEFAULT_SPLIT_TOLERANCE};
/// use trip_ledger::models::{Amount, ExactConfig};
/// use std::str::FromStr;
///
/// let configs = vec![
///     ExactConfig { user_id: "a".to_string(), amount: Amount::from_str("12.00").unwrap() },
///     ExactConfig { user_id: "b".to_string(), amount: Amount::from_str("8.00").unwrap() },
/// ];
/// let total = Amount::from_str("20.00").unwrap();
/// let result = calculate_exact_split(total, &configs, DEFAULT_SPLIT_TOLERANCE, 1).unwrap();
///
/// assert_eq!(result.splits[0].percentage, Some(rust_decimal::Decimal::from(60)));
/// ```
pub fn calculate_exact_split(
    total: Amount,
    configs: &[ExactConfig],
    tolerance: Decimal,
    step_number: u32,
) -> EngineResult<SplitCalculation> {
    require_configuration(SplitType::Exact, configs.len())?;
    require_positive_total(total)?;

    if let Some(negative) = configs.iter().find(|c| c.amount.is_negative()) {
        return Err(EngineError::ValidationError {
            subject: format!("amount for '{}'", negative.user_id),
            expected: ">= 0".to_string(),
            actual: negative.amount.to_string(),
        });
    }

    if let Some(oversized) = configs
        .iter()
        .find(|c| c.amount.as_decimal() - total.as_decimal() > tolerance)
    {
        return Err(EngineError::ValidationError {
            subject: format!("amount for '{}'", oversized.user_id),
            expected: format!("<= {}", total),
            actual: oversized.amount.to_string(),
        });
    }

    let specified: Amount = configs.iter().map(|c| c.amount).sum();
    if (specified - total).abs().as_decimal() > tolerance {
        return Err(EngineError::ValidationError {
            subject: "exact amount total".to_string(),
            expected: total.to_string(),
            actual: specified.to_string(),
        });
    }

    let amounts = absorb_residue(total, configs.iter().map(|c| c.amount).collect())?;

    let splits: Vec<CalculatedSplit> = configs
        .iter()
        .zip(amounts)
        .map(|(config, amount)| CalculatedSplit {
            user_id: config.user_id.clone(),
            amount,
            percentage: Some(round_half_up(
                amount.as_decimal() / total.as_decimal() * Decimal::ONE_HUNDRED,
                2,
            )),
            shares: None,
        })
        .collect();

    let residue = total - specified;
    let audit_step = AuditStep {
        step_number,
        rule_id: "exact_split".to_string(),
        rule_name: "Exact Split".to_string(),
        input: serde_json::json!({
            "total": total.to_string(),
            "amounts": configs.iter().map(|c| c.amount.to_string()).collect::<Vec<_>>()
        }),
        output: serde_json::json!({
            "specified_total": specified.to_string(),
            "residue": residue.to_string()
        }),
        reasoning: if residue.is_zero() {
            format!("Configured amounts sum to the total ${}", total)
        } else {
            format!(
                "Configured amounts sum to ${}, last member absorbs ${} to reach ${}",
                specified, residue, total
            )
        },
    };

    Ok(SplitCalculation { splits, audit_step })
}
