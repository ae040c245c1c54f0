//! # courier-batch: Transaction File Processing
//!
//! Runs the courier-core discount engine over a transaction file and
//! writes the priced result.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Courier Discounts Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               courier-discounts (binary, clap)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ courier-batch (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  config   │  │ processor │  │  format   │  │  logging  │  │   │
//! │  │   │ TOML+env  │  │ Shipment  │  │ text/json │  │  tracing  │  │   │
//! │  │   │           │  │ Processor │  │   rows    │  │ subscriber│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 courier-core (pure rules)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use courier_batch::{CourierConfig, OutputFormat, ShipmentProcessor};
//!
//! let config = CourierConfig::default();
//! let engine = config.build_engine().unwrap();
//! let mut processor = ShipmentProcessor::new(engine, OutputFormat::Text);
//!
//! let mut out = Vec::new();
//! processor.process("2015-02-01 S MR\n".as_bytes(), &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "2015-02-01 S MR 1.50 0.50\n");
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod processor;

pub use config::{CourierConfig, IoSettings, LoggingSettings, PricingSettings, ProviderSettings};
pub use error::{BatchError, BatchResult};
pub use format::{JsonRow, OutputFormat, RowStatus};
pub use logging::init_tracing;
pub use processor::{RunSummary, ShipmentProcessor, TransactionLine};
