//! # Money Module
//!
//! Provides the `Money` type for prices, discounts and the monthly cap.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Monthly cap 10.00, three discounts of 0.10 + 0.20 + ...               │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ cap check drifts                │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    10 + 20 = 30 cents, remaining = 1000 - 30 = 970 cents exactly       │
//! │    "discount equals exactly the remaining budget" is a real equality   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use courier_core::money::Money;
//!
//! let price: Money = "6.90".parse().unwrap();
//! assert_eq!(price.cents(), 690);
//! assert_eq!(price.to_string(), "6.90");
//!
//! let discounted = price - Money::from_cents(150);
//! assert_eq!(discounted.to_string(), "5.40");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: catalogs are not trusted to be non-negative, so the
///   engine must be able to represent (and then clamp) negative results
/// - **Serde as a decimal string**: `"6.90"` in TOML and JSON, never a float
///
/// ## Where Money Flows
/// ```text
/// PriceCatalog.price(size) ──► Quote.price ──┬──► output column "6.90"
///                                            │
/// monthly cap ──► Ledger.remaining ──► Quote.discount ──► output column
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use courier_core::money::Money;
    ///
    /// let price = Money::from_cents(690); // 6.90
    /// assert_eq!(price.cents(), 690);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Subtracts, clamping at the `i64` bounds instead of overflowing.
    ///
    /// Catalog prices are caller-supplied, so differences between them go
    /// through here rather than `-`.
    #[inline]
    pub const fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Subtracts, flooring the result at zero.
    ///
    /// ## Example
    /// ```rust
    /// use courier_core::money::Money;
    ///
    /// let cap = Money::from_cents(1000);
    /// assert_eq!(cap.saturating_sub_to_zero(Money::from_cents(400)).cents(), 600);
    /// assert_eq!(cap.saturating_sub_to_zero(Money::from_cents(1500)).cents(), 0);
    /// ```
    #[inline]
    pub fn saturating_sub_to_zero(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses decimal strings with at most two fractional digits.
///
/// Accepted: `"6.90"`, `"6.9"`, `"7"`, `"-1.50"`, `".5"`.
/// Rejected: `""`, `"abc"`, `"1.005"`, `"1,50"`, `"+1"`.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (major, minor) = digits.split_once('.').unwrap_or((digits, ""));

        if major.is_empty() && minor.is_empty() {
            return Err(invalid("expected a decimal amount such as 6.90"));
        }
        if !major.bytes().all(|b| b.is_ascii_digit()) || !minor.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected a decimal amount such as 6.90"));
        }
        if minor.len() > 2 {
            return Err(invalid("at most two decimal places are allowed"));
        }

        let major_value: i64 = if major.is_empty() {
            0
        } else {
            major.parse().map_err(|_| invalid("amount is too large"))?
        };
        let minor_value: i64 = match minor.len() {
            0 => 0,
            1 => minor.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => minor.parse().map_err(|_| invalid("bad fraction"))?,
        };

        let cents = major_value
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor_value))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

impl TryFrom<String> for Money {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        money.to_string()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two-decimal rendering, the format used in output files: `6.90`, `-5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(690);
        assert_eq!(money.cents(), 690);
        assert_eq!(money.major(), 6);
        assert_eq!(money.minor(), 90);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(690).to_string(), "6.90");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-50).to_string(), "-0.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse_accepted_forms() {
        assert_eq!("6.90".parse::<Money>().unwrap().cents(), 690);
        assert_eq!("6.9".parse::<Money>().unwrap().cents(), 690);
        assert_eq!("7".parse::<Money>().unwrap().cents(), 700);
        assert_eq!(".5".parse::<Money>().unwrap().cents(), 50);
        assert_eq!("-1.50".parse::<Money>().unwrap().cents(), -150);
        assert_eq!("  10.00 ".parse::<Money>().unwrap().cents(), 1000);
    }

    #[test]
    fn test_parse_rejected_forms() {
        for bad in ["", ".", "-", "abc", "1.005", "1,50", "+1", "1.2.3", "99999999999999999999"] {
            assert!(bad.parse::<Money>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(690);

        assert_eq!((a + b).cents(), 1690);
        assert_eq!((a - b).cents(), 310);

        let mut acc = Money::zero();
        acc += b;
        acc += Money::from_cents(-90);
        assert_eq!(acc.cents(), 600);
    }

    #[test]
    fn test_saturating_sub_to_zero() {
        let cap = Money::from_cents(300);
        assert_eq!(cap.saturating_sub_to_zero(Money::from_cents(300)), Money::zero());
        assert_eq!(cap.saturating_sub_to_zero(Money::from_cents(100)).cents(), 200);
        assert_eq!(cap.saturating_sub_to_zero(Money::from_cents(900)), Money::zero());
    }

    #[test]
    fn test_saturating_sub_at_bounds() {
        let max = Money::from_cents(i64::MAX);
        let min = Money::from_cents(i64::MIN);

        assert_eq!(max.saturating_sub(Money::from_cents(-100)), max);
        assert_eq!(Money::from_cents(100).saturating_sub(min), max);
        assert_eq!(min.saturating_sub(Money::from_cents(1)), min);
        assert_eq!(Money::from_cents(690).saturating_sub(Money::from_cents(150)).cents(), 540);
    }

    #[test]
    fn test_serde_as_decimal_string() {
        let json = serde_json::to_string(&Money::from_cents(690)).unwrap();
        assert_eq!(json, r#""6.90""#);

        let back: Money = serde_json::from_str(r#""1.5""#).unwrap();
        assert_eq!(back.cents(), 150);

        assert!(serde_json::from_str::<Money>(r#""cheap""#).is_err());
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
    }
}
