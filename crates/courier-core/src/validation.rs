//! # Validation Module
//!
//! Field-level checks for shipments, catalogs and engine settings.
//!
//! ## Where Each Check Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Startup (config load, courier-batch)                                  │
//! │  ├── validate_provider_id   - catalog identifiers                      │
//! │  ├── validate_price         - catalog prices                           │
//! │  └── validate_monthly_cap   - engine setting                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Per shipment (ShipmentRecord::validate)                               │
//! │  ├── parse_shipment_date    - YYYY-MM-DD, real calendar date           │
//! │  └── parse_size             - S | M | L                                │
//! │                                                                         │
//! │  Startup failures are errors. Per-shipment failures only mark the      │
//! │  shipment as ignored.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Size;
use crate::DATE_FORMAT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest provider identifier accepted from configuration.
pub const MAX_PROVIDER_ID_LEN: usize = 16;

// =============================================================================
// Shipment Fields
// =============================================================================

/// Parses a shipment date in strict `YYYY-MM-DD` form.
///
/// ## Rules
/// - Exactly ten characters: four-digit year, two-digit month and day
/// - Must be a real calendar date (no month 13, no February 30th)
///
/// ## Example
/// ```rust
/// use courier_core::validation::parse_shipment_date;
///
/// assert!(parse_shipment_date("2024-02-29").is_ok());
/// assert!(parse_shipment_date("2023-02-29").is_err());
/// assert!(parse_shipment_date("2024-13-32").is_err());
/// assert!(parse_shipment_date("2024-4-1").is_err());
/// ```
pub fn parse_shipment_date(date: &str) -> ValidationResult<NaiveDate> {
    let bytes = date.as_bytes();
    let well_shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_shaped {
        return Err(ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: format!("'{}' is not in YYYY-MM-DD form", date),
        });
    }

    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|err| ValidationError::InvalidFormat {
        field: "date".to_string(),
        reason: format!("'{}' is not a calendar date ({})", date, err),
    })
}

/// Parses a size token (`S`, `M` or `L`).
pub fn parse_size(token: &str) -> ValidationResult<Size> {
    token.parse()
}

// =============================================================================
// Catalog Fields
// =============================================================================

/// Validates a provider identifier.
///
/// ## Rules
/// - Must not be empty
/// - At most 16 characters
/// - Letters and digits only (identifiers are whitespace-separated tokens
///   in the transaction file)
pub fn validate_provider_id(id: &str) -> ValidationResult<()> {
    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "provider".to_string(),
        });
    }

    if id.len() > MAX_PROVIDER_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "provider".to_string(),
            max: MAX_PROVIDER_ID_LEN,
        });
    }

    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "provider".to_string(),
            reason: "must contain only letters and digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a catalog price. Zero is allowed.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Engine Settings
// =============================================================================

/// Validates the monthly discount cap. Must be strictly positive.
pub fn validate_monthly_cap(cap: Money) -> ValidationResult<()> {
    if !cap.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "monthly_cap".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_shipment_date() {
        let date = parse_shipment_date("2015-02-01").unwrap();
        assert_eq!(date.month(), 2);
        assert_eq!(date.year(), 2015);

        assert!(parse_shipment_date("2024-02-29").is_ok());

        assert!(parse_shipment_date("2024-13-32").is_err());
        assert!(parse_shipment_date("2023-02-29").is_err());
        assert!(parse_shipment_date("2024-04-31").is_err());
        assert!(parse_shipment_date("2024-00-10").is_err());
        assert!(parse_shipment_date("").is_err());
        assert!(parse_shipment_date("garbage").is_err());
        assert!(parse_shipment_date("2024/04/10").is_err());
        assert!(parse_shipment_date("10-04-2024").is_err());
        assert!(parse_shipment_date(" 2024-04-10").is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("S").unwrap(), Size::Small);
        assert_eq!(parse_size("L").unwrap(), Size::Large);
        assert!(parse_size("XL").is_err());
        assert!(parse_size("CUSPS").is_err());
    }

    #[test]
    fn test_validate_provider_id() {
        assert!(validate_provider_id("LP").is_ok());
        assert!(validate_provider_id("MR").is_ok());

        assert_eq!(
            validate_provider_id(""),
            Err(ValidationError::Required {
                field: "provider".to_string()
            })
        );
        assert!(validate_provider_id("L P").is_err());
        assert!(validate_provider_id(&"X".repeat(17)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(690)).is_ok());
        assert!(validate_price(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_monthly_cap() {
        assert!(validate_monthly_cap(Money::from_cents(1000)).is_ok());
        assert!(validate_monthly_cap(Money::zero()).is_err());
        assert!(validate_monthly_cap(Money::from_cents(-100)).is_err());
    }
}
