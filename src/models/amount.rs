//! Fixed-point monetary amount with 2 decimal places.
//!
//! Uses `rust_decimal` internally with scale enforcement so that every sum of
//! splits reconstructs its expense total exactly, to the cent.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Rounds a decimal half-up (midpoint away from zero) to `dp` places.
///
/// Used for display percentages, which are not amounts but share the same
/// rounding rule.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// A monetary amount that maintains exactly 2 decimal places (cents).
///
/// Every construction from an arbitrary [`Decimal`] rounds half-up to the
/// cent, so arithmetic between amounts never drifts off the cent grid.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use trip_ledger::models::Amount;
///
/// let amount = Amount::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
///
/// let rounded = Amount::from_str("33.335").unwrap();
/// assert_eq!(rounded.to_string(), "33.34");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// The number of decimal places every amount carries.
    pub const SCALE: u32 = 2;

    /// Zero, at scale 2.
    pub const ZERO: Self = Amount(Decimal::from_parts(0, 0, 0, false, 2));

    /// One cent.
    pub const CENT: Self = Amount(Decimal::from_parts(1, 0, 0, false, 2));

    /// The largest magnitude accepted from input, one trillion.
    ///
    /// Amounts within this bound can be multiplied by a percentage or share
    /// ratio and summed across any realistic history without overflowing
    /// the underlying decimal.
    pub const MAX: Self = Amount(Decimal::from_parts(276_447_232, 23_283, 0, false, 2));

    /// Creates an amount from a `Decimal`, rounding half-up to the cent.
    pub fn new(value: Decimal) -> Self {
        let mut rounded = round_half_up(value, Self::SCALE);
        rounded.rescale(Self::SCALE);
        Amount(rounded)
    }

    /// Creates an amount from a whole number of cents.
    pub fn from_cents(cents: i128) -> Self {
        Amount(Decimal::from_i128_with_scale(cents, Self::SCALE))
    }

    /// Returns the amount as an exact number of cents.
    pub fn cents(&self) -> i128 {
        self.0.mantissa()
    }

    /// Returns the underlying decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> Self {
        Amount(self.0.abs())
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns `true` if this value is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Amount::new(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::new(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount::new(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, amount| acc + amount)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, amount| acc + *amount)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = <Decimal as Deserialize>::deserialize(deserializer).map(Amount::new)?;
        if amount.abs() > Amount::MAX {
            return Err(D::Error::custom(format!(
                "amount {} exceeds the limit of {}",
                amount,
                Amount::MAX
            )));
        }
        Ok(amount)
    }
}
