//! Settlement models.

use serde::{Deserialize, Serialize};

use super::Amount;

/// A single directed payment instruction.
///
/// # Example
///
/// ```
/// use trip_ledger::models::{Amount, Settlement};
/// use std::str::FromStr;
///
/// let settlement = Settlement::new("carol", "alice", Amount::from_str("40.00").unwrap());
/// assert_eq!(settlement.from_user_id, "carol");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// The member paying.
    pub from_user_id: String,
    /// The member being paid.
    pub to_user_id: String,
    /// The amount to pay, always above the settlement threshold.
    pub amount: Amount,
}

impl Settlement {
    /// Creates a settlement.
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: Amount) -> Self {
        Self {
            from_user_id: from.into(),
            to_user_id: to.into(),
            amount,
        }
    }
}

/// A settlement with both parties' display names attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedSettlement {
    /// The member paying.
    pub from_user_id: String,
    /// Display name of the payer.
    pub from_user_name: String,
    /// The member being paid.
    pub to_user_id: String,
    /// Display name of the payee.
    pub to_user_name: String,
    /// The amount to pay.
    pub amount: Amount,
}
