//! # courier-core: Shipping Discount Engine
//!
//! Pure business logic for pricing shipments and granting discounts. No
//! files, no environment, no subscriber setup; everything here is
//! deterministic given the order shipments arrive in.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Courier Discounts Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              courier-batch (file I/O, config, CLI)              │   │
//! │  │    input.txt ──► ShipmentProcessor ──► output.txt               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ one ShipmentRecord at a time           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ courier-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │ shipment  │  │  ledger   │  │  engine   │  │   │
//! │  │   │ PriceCat. │  │ Shipment  │  │ Monthly   │  │ Discount  │  │   │
//! │  │   │ CatalogSet│  │  Record   │  │ Ledger    │  │ Engine    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • SINGLE-THREADED • NEVER FAILS PER SHIPMENT          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer-cent Money type
//! - [`types`] - Size, ProviderId, Quote
//! - [`validation`] - Date, size, catalog and cap checks
//! - [`catalog`] - Provider price lists
//! - [`shipment`] - Incoming shipment records
//! - [`ledger`] - Monthly counters and the discount running total
//! - [`engine`] - Rule evaluation
//! - [`error`] - Domain error types
//!
//! ## Discount Rules
//!
//! 1. **S shipments** are priced at the lowest S price among all providers.
//! 2. **The third L shipment via LP** in a calendar month is free.
//! 3. **Total discounts** never exceed the monthly cap; a discount that does
//!    not fit is covered partially.
//!
//! ## Example Usage
//!
//! ```rust
//! use courier_core::{default_providers, DiscountEngine, Money, ShipmentRecord};
//!
//! let mut engine = DiscountEngine::new(Money::from_cents(1000));
//! engine.extend(default_providers());
//!
//! let lp = engine.resolve_provider("LP");
//! let quotes: Vec<_> = ["2015-02-03", "2015-02-05", "2015-02-09"]
//!     .into_iter()
//!     .map(|date| engine.apply_discount(&ShipmentRecord::new(date, "L", lp.clone())))
//!     .collect();
//!
//! assert_eq!(quotes[0].price.to_string(), "6.90");
//! assert_eq!(quotes[2].price.to_string(), "0.00");
//! assert_eq!(quotes[2].discount.to_string(), "6.90");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod money;
pub mod shipment;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{default_providers, CatalogSet, PriceCatalog};
pub use engine::{apply_discount, DiscountEngine, ProviderRole};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{CapReset, MonthlyDiscountLedger};
pub use money::Money;
pub use shipment::{ShipmentRecord, ValidShipment};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Provider whose LARGE shipments earn the free-shipment rule.
pub const FLAGSHIP_PROVIDER: &str = "LP";

/// Which LARGE flagship shipment in a month is free.
///
/// Only this one: the 4th and later shipments of the month pay full price.
pub const NTH_FREE_LARGE_SHIPMENT: u32 = 3;

/// Default monthly discount cap (10.00).
pub const DEFAULT_MONTHLY_CAP: Money = Money::from_cents(1000);

/// Shipment date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
