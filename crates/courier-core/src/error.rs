//! # Error Types
//!
//! Domain-specific error types for courier-core.
//!
//! ## Error Hierarchy
//! ```text
//! ValidationError   one bad field: a date, a size token, an amount, an id
//!       │
//!       ▼
//! CoreError         a bad catalog or cap, found while setting up an engine
//!       │
//!       ▼
//! BatchError        (courier-batch) files, config, output encoding
//! ```
//!
//! ## What Is NOT an Error
//! Evaluating a shipment never fails. A bad date, an unknown size or an
//! unresolved provider produces an ignored [`Quote`](crate::Quote), not an
//! `Err`. These types only surface while building catalogs and checking
//! configuration, before the first shipment is processed.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core setup errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A provider catalog failed validation.
    ///
    /// ## When This Occurs
    /// - Provider identifier is empty or contains whitespace
    /// - A listed price is negative
    #[error("Invalid catalog for provider {provider}: {source}")]
    InvalidCatalog {
        provider: String,
        #[source]
        source: ValidationError,
    },

    /// No provider catalogs were registered.
    #[error("At least one provider catalog must be registered")]
    NoProviders,

    /// Engine-level setting rejected, e.g. a non-positive monthly cap.
    #[error("Invalid engine setting: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Why a single field was rejected.
///
/// Shipment fields report these through
/// [`ShipmentRecord::validate`](crate::ShipmentRecord::validate), where the
/// engine logs them and ignores the row; catalog and cap checks return them
/// as real errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Provider missing from the row or not registered.
    #[error("{field} is required")]
    Required { field: String },

    /// Provider identifier longer than allowed.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Amount outside its range, in cents.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Monthly cap of zero or less.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Unparseable date, amount or identifier.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Token outside a closed set, such as a size or a cap reset policy.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Result of engine and catalog setup.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
