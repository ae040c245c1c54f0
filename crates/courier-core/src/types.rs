//! # Domain Types
//!
//! Small value types shared by every other module.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Size       │   │   ProviderId    │   │      Quote      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Small   "S"    │   │  "LP", "MR"     │   │  price          │       │
//! │  │  Medium  "M"    │   │  (newtype over  │   │  discount       │       │
//! │  │  Large   "L"    │   │   String)       │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Size
// =============================================================================

/// Package size. Tokens are case-sensitive single letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Size {
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
}

impl Size {
    /// Every size, smallest first.
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

    /// The input/output token for this size.
    pub const fn token(&self) -> &'static str {
        match self {
            Size::Small => "S",
            Size::Medium => "M",
            Size::Large => "L",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Size {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S" => Ok(Size::Small),
            "M" => Ok(Size::Medium),
            "L" => Ok(Size::Large),
            _ => Err(ValidationError::NotAllowed {
                field: "size".to_string(),
                allowed: Size::ALL.iter().map(|s| s.token().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Provider Identifier
// =============================================================================

/// Identifier of a shipping provider, e.g. `LP`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        ProviderId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(id: &str) -> Self {
        ProviderId(id.to_string())
    }
}

impl From<String> for ProviderId {
    fn from(id: String) -> Self {
        ProviderId(id)
    }
}

// Lets catalog maps keyed by ProviderId be queried with a plain &str.
impl Borrow<str> for ProviderId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Quote
// =============================================================================

/// Result of evaluating one shipment: the price to charge and the discount
/// that was granted.
///
/// Both fields are always present. "No discount" is a zero `discount`;
/// an ignored shipment is `(0.00, 0.00)`. Callers that need to tell the
/// two apart use [`Quote::is_ignored`] rather than a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Quote {
    /// Final price after the discount.
    pub price: Money,
    /// Discount granted for this shipment.
    pub discount: Money,
}

impl Quote {
    #[inline]
    pub const fn new(price: Money, discount: Money) -> Self {
        Quote { price, discount }
    }

    /// The `(0.00, 0.00)` result for shipments that cannot be priced.
    #[inline]
    pub const fn ignored() -> Self {
        Quote::new(Money::zero(), Money::zero())
    }

    /// True when any discount was granted.
    #[inline]
    pub const fn is_discounted(&self) -> bool {
        !self.discount.is_zero()
    }

    /// True when the price is not positive and nothing was discounted.
    ///
    /// A fully discounted shipment (price 0.00, discount 6.90) is *not*
    /// ignored.
    #[inline]
    pub const fn is_ignored(&self) -> bool {
        !self.price.is_positive() && self.discount.is_zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_tokens() {
        for size in Size::ALL {
            assert_eq!(size.token().parse::<Size>().unwrap(), size);
        }
        assert!("XL".parse::<Size>().is_err());
        assert!("s".parse::<Size>().is_err());
        assert!("".parse::<Size>().is_err());
    }

    #[test]
    fn test_size_serde_uses_tokens() {
        assert_eq!(serde_json::to_string(&Size::Large).unwrap(), r#""L""#);
        assert_eq!(serde_json::from_str::<Size>(r#""M""#).unwrap(), Size::Medium);
    }

    #[test]
    fn test_provider_id_display() {
        let id = ProviderId::from("LP");
        assert_eq!(id.to_string(), "LP");
        assert_eq!(id.as_str(), "LP");
    }

    #[test]
    fn test_quote_states() {
        assert!(Quote::ignored().is_ignored());
        assert!(!Quote::ignored().is_discounted());

        let free = Quote::new(Money::zero(), Money::from_cents(690));
        assert!(!free.is_ignored());
        assert!(free.is_discounted());

        let full_price = Quote::new(Money::from_cents(300), Money::zero());
        assert!(!full_price.is_ignored());
        assert!(!full_price.is_discounted());
    }
}
