//! # Shipment Records
//!
//! One row of the transaction stream, kept exactly as it arrived.
//!
//! A record is built even when its fields are garbage: the date and size
//! stay raw strings until [`ShipmentRecord::validate`] is asked about them,
//! and an unresolved provider is simply `None`.

use chrono::NaiveDate;

use crate::types::{ProviderId, Size};
use crate::validation::{parse_shipment_date, parse_size, ValidationResult};

/// An incoming shipment transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentRecord {
    date: String,
    size: String,
    provider: Option<ProviderId>,
}

/// The typed fields of a record that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidShipment {
    pub date: NaiveDate,
    pub size: Size,
}

impl ShipmentRecord {
    pub fn new(
        date: impl Into<String>,
        size: impl Into<String>,
        provider: Option<ProviderId>,
    ) -> Self {
        ShipmentRecord {
            date: date.into(),
            size: size.into(),
            provider,
        }
    }

    /// Raw date string as received.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Raw size token as received.
    pub fn size_token(&self) -> &str {
        &self.size
    }

    /// Resolved provider, or `None` when the identifier was not registered.
    pub fn provider(&self) -> Option<&ProviderId> {
        self.provider.as_ref()
    }

    /// Checks the date and size, returning their typed values.
    ///
    /// The provider is not checked here; the engine short-circuits on an
    /// absent provider before asking.
    pub fn validate(&self) -> ValidationResult<ValidShipment> {
        let date = parse_shipment_date(&self.date)?;
        let size = parse_size(&self.size)?;
        Ok(ValidShipment { date, size })
    }

    /// Pure predicate form of [`validate`](Self::validate).
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
