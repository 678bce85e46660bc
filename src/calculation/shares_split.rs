//! Share-count split calculation.
//!
//! Works like the percentage split, keyed by integer share counts
//! (e.g. 2 shares for an adult, 1 for a child).

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Amount, AuditStep, CalculatedSplit, SharesConfig, SplitType, round_half_up};

use super::SplitCalculation;
use super::split_calculator::{absorb_residue, require_configuration, require_positive_total};

/// Splits a total in proportion to integer share counts.
///
/// Every member but the last pays `round_half_up(total * shares / total_shares)`;
/// the last member pays the remainder. The display percentage is
/// `shares * 100 / total_shares` rounded to 2 places.
///
/// # Errors
///
/// - `ConfigurationError` if `configs` is empty
/// - `ValidationError` if the share counts sum to zero
/// - `ValidationError` if rounding the other members leaves the last member
///   a negative share, which only happens for totals of a few cents
///
/// # Examples
///
/// ```
/// use trip_ledger::calculation::calculate_shares_split;
/// use trip_ledger::models::{Amount, SharesConfig};
/// use std::str::FromStr;
///
/// let configs = vec![
///     SharesConfig { user_id: "adult".to_string(), shares: 2 },
///     SharesConfig { user_id: "child".to_string(), shares: 1 },
/// ];
/// let result = calculate_shares_split(Amount::from_str("90.00").unwrap(), &configs, 1).unwrap();
///
/// assert_eq!(result.splits[0].amount.to_string(), "60.00");
/// assert_eq!(result.splits[1].amount.to_string(), "30.00");
/// ```
pub fn calculate_shares_split(
    total: Amount,
    configs: &[SharesConfig],
    step_number: u32,
) -> EngineResult<SplitCalculation> {
    require_configuration(SplitType::Shares, configs.len())?;
    require_positive_total(total)?;

    let total_shares: u64 = configs.iter().map(|c| u64::from(c.shares)).sum();
    if total_shares == 0 {
        return Err(EngineError::ValidationError {
            subject: "share total".to_string(),
            expected: "> 0".to_string(),
            actual: "0".to_string(),
        });
    }
    let share_divisor = Decimal::from(total_shares);

    let proportional: Vec<Amount> = configs
        .iter()
        .map(|c| Amount::new(total.as_decimal() * Decimal::from(c.shares) / share_divisor))
        .collect();
    let amounts = absorb_residue(total, proportional)?;

    let splits: Vec<CalculatedSplit> = configs
        .iter()
        .zip(amounts)
        .map(|(config, amount)| CalculatedSplit {
            user_id: config.user_id.clone(),
            amount,
            percentage: Some(round_half_up(
                Decimal::from(config.shares) * Decimal::ONE_HUNDRED / share_divisor,
                2,
            )),
            shares: Some(config.shares),
        })
        .collect();

    let audit_step = AuditStep {
        step_number,
        rule_id: "shares_split".to_string(),
        rule_name: "Shares Split".to_string(),
        input: serde_json::json!({
            "total": total.to_string(),
            "shares": configs.iter().map(|c| c.shares).collect::<Vec<_>>()
        }),
        output: serde_json::json!({
            "total_shares": total_shares,
            "amounts": splits.iter().map(|s| s.amount.to_string()).collect::<Vec<_>>()
        }),
        reasoning: format!(
            "${} divided into {} shares of ${}",
            total,
            total_shares,
            round_half_up(total.as_decimal() / share_divisor, 4).normalize()
        ),
    };

    Ok(SplitCalculation { splits, audit_step })
}
