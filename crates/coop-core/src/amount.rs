//! # Amount Module
//!
//! Provides the `Amount` type for denomination values and remittance amounts.
//!
//! ## Why Decimal?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Denominations span many magnitudes:                                    │
//! │    ¥10,000 banknote        10000                                        │
//! │    5 fils coin (KWD)       0.005   ← three decimal places               │
//! │                                                                         │
//! │  f64 cannot hold 0.005 exactly, and integer cents cannot hold it at     │
//! │  all. A base-10 decimal keeps every value exactly as written.           │
//! │                                                                         │
//! │  Storage: TEXT column ("0.005"), parsed back into a Decimal.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use coop_core::amount::Amount;
//!
//! let fils: Amount = "0.005".parse().unwrap();
//! let total = fils + "1.000".parse::<Amount>().unwrap();
//! assert_eq!(total.to_string(), "1.005");
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use crate::error::CoreError;

// =============================================================================
// Amount Type
// =============================================================================

/// An exact monetary value in major currency units.
///
/// Serialized as a decimal string (`"1000.00"`) so no precision is lost on
/// the way through JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Wraps a decimal value.
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Amount(value)
    }

    /// Parses an amount from its decimal text form.
    ///
    /// ## Example
    /// ```rust
    /// use coop_core::amount::Amount;
    ///
    /// assert!(Amount::parse("0.25").is_ok());
    /// assert!(Amount::parse("one peso").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Decimal::from_str(value.trim())
            .map(Amount)
            .map_err(|e| CoreError::InvalidAmount {
                value: value.to_string(),
                reason: e.to_string(),
            })
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn decimal(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Adds two amounts, returning `None` on overflow (`+` panics).
    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Amount)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Amount {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse(s)
    }
}

/// Used by the `FromRow` derive to decode the TEXT column.
impl TryFrom<String> for Amount {
    type Error = rust_decimal::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Decimal::from_str(value.trim()).map(Amount)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl Add for Amount {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Amount(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Amount(self.0 - other.0)
    }
}

impl SubAssign for Amount {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_keeps_scale() {
        let amount = Amount::parse("1000.00").unwrap();
        assert_eq!(amount.decimal(), dec!(1000.00));
        assert_eq!(amount.to_string(), "1000.00");

        let fils = Amount::parse(" 0.005 ").unwrap();
        assert_eq!(fils.decimal(), dec!(0.005));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = Amount::parse("ten").unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount { .. }));
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Amount::new(Decimal::MAX);
        assert_eq!(max.checked_add(max), None);
        assert_eq!(
            Amount::new(dec!(0.005)).checked_add(Amount::new(dec!(1.000))),
            Some(Amount::new(dec!(1.005)))
        );
    }

    #[test]
    fn test_sign_checks() {
        assert!(Amount::new(dec!(0.01)).is_positive());
        assert!(!Amount::ZERO.is_positive());
        assert!(Amount::ZERO.is_zero());
        assert!(Amount::new(dec!(-5)).is_negative());
        assert!(!Amount::ZERO.is_negative());
    }

    #[test]
    fn test_arithmetic_is_exact() {
        let total: Amount = [dec!(0.1), dec!(0.2), dec!(0.005)]
            .into_iter()
            .map(Amount::new)
            .sum();
        assert_eq!(total.decimal(), dec!(0.305));

        let mut running = Amount::new(dec!(10));
        running -= Amount::new(dec!(2.5));
        running += Amount::new(dec!(0.25));
        assert_eq!(running.decimal(), dec!(7.75));
    }

    #[test]
    fn test_json_is_string() {
        let json = serde_json::to_string(&Amount::new(dec!(0.25))).unwrap();
        assert_eq!(json, "\"0.25\"");

        let back: Amount = serde_json::from_str("\"0.025\"").unwrap();
        assert_eq!(back.decimal(), dec!(0.025));
    }
}
