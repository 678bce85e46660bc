//! Settlement verification and presentation.

use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::models::{Amount, Balance, NamedSettlement, Settlement};

/// Checks that a settlement plan reproduces every balance.
///
/// Each member's incoming payments minus outgoing payments must equal
/// their balance within `tolerance`. A member who appears in the plan but
/// not in `balances` is treated as having a zero balance.
///
/// # Errors
///
/// Returns `InternalInvariantError` naming the first member whose payments
/// do not add up.
///
/// # Examples
///
/// ```
/// use trip_ledger::calculation::verify_settlements;
/// use trip_ledger::models::{Amount, Balance, Settlement};
/// use std::str::FromStr;
///
/// let balances = vec![
///     Balance::new("alice", Amount::from_str("25.00").unwrap()),
///     Balance::new("bob", Amount::from_str("-25.00").unwrap()),
/// ];
/// let plan = vec![Settlement::new("bob", "alice", Amount::from_str("25.00").unwrap())];
///
/// assert!(verify_settlements(&balances, &plan, Amount::CENT).is_ok());
/// ```
pub fn verify_settlements(
    balances: &[Balance],
    settlements: &[Settlement],
    tolerance: Amount,
) -> EngineResult<()> {
    let mut expected: Vec<(&str, Amount)> = balances
        .iter()
        .map(|b| (b.user_id.as_str(), b.amount))
        .collect();
    for settlement in settlements {
        for user_id in [&settlement.from_user_id, &settlement.to_user_id] {
            if !expected.iter().any(|(id, _)| *id == user_id.as_str()) {
                expected.push((user_id.as_str(), Amount::ZERO));
            }
        }
    }

    let mut net: HashMap<&str, Amount> = HashMap::new();
    for settlement in settlements {
        *net.entry(settlement.to_user_id.as_str()).or_default() += settlement.amount;
        *net.entry(settlement.from_user_id.as_str()).or_default() -= settlement.amount;
    }

    for (user_id, balance) in expected {
        let settled = net.get(user_id).copied().unwrap_or(Amount::ZERO);
        if (settled - balance).abs() > tolerance {
            return Err(EngineError::InternalInvariantError {
                message: format!(
                    "settlements move {} for '{}' whose balance is {}",
                    settled, user_id, balance
                ),
            });
        }
    }

    Ok(())
}

/// Attaches display names to settlements.
///
/// Members missing from `names` are shown as "Unknown".
pub fn name_settlements(
    settlements: &[Settlement],
    names: &HashMap<String, String>,
) -> Vec<NamedSettlement> {
    let lookup = |user_id: &str| {
        names
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string())
    };

    settlements
        .iter()
        .map(|s| NamedSettlement {
            from_user_id: s.from_user_id.clone(),
            from_user_name: lookup(&s.from_user_id),
            to_user_id: s.to_user_id.clone(),
            to_user_name: lookup(&s.to_user_id),
            amount: s.amount,
        })
        .collect()
}

/// Renders settlements as lines such as "Alice owes Bob $25.00".
///
/// Members missing from `names` are shown by their user id.
///
/// # Examples
///
/// ```
/// use trip_ledger::calculation::format_settlement_summary;
/// use trip_ledger::models::{Amount, Settlement};
/// use std::collections::HashMap;
/// use std::str::FromStr;
///
/// let names = HashMap::from([("a".to_string(), "Alice".to_string())]);
/// let plan = vec![Settlement::new("b", "a", Amount::from_str("25").unwrap())];
///
/// assert_eq!(format_settlement_summary(&plan, &names, "$"), vec!["b owes Alice $25.00"]);
/// ```
pub fn format_settlement_summary(
    settlements: &[Settlement],
    names: &HashMap<String, String>,
    currency_symbol: &str,
) -> Vec<String> {
    let display = |user_id: &str| -> String {
        names
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| user_id.to_string())
    };

    settlements
        .iter()
        .map(|s| {
            format!(
                "{} owes {} {}{}",
                display(&s.from_user_id),
                display(&s.to_user_id),
                currency_symbol,
                s.amount
            )
        })
        .collect()
}
