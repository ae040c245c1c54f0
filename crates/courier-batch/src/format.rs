//! # Output Formats
//!
//! How a priced transaction is written back out.
//!
//! ## Text (default)
//! The input line followed by the price and discount columns:
//! ```text
//! 2015-02-01 S MR 1.50 0.50
//! 2015-02-02 S MR 1.50 0.50
//! 2015-02-03 L LP 6.90 -
//! 2015-02-29 CUSPS Ignored -
//! ```
//! A zero discount prints as `-`. A shipment that could not be priced
//! prints `Ignored` in place of its price.
//!
//! ## JSON lines
//! One object per input line, for downstream tooling:
//! ```text
//! {"line":"2015-02-01 S MR","price":"1.50","discount":"0.50","status":"discounted"}
//! ```

use std::fmt;
use std::str::FromStr;

use courier_core::{Money, Quote};
use serde::{Deserialize, Serialize};

use crate::error::BatchError;

/// Placeholder for a zero discount.
pub const NO_DISCOUNT: &str = "-";

/// Placeholder for the price of a shipment that could not be priced.
pub const IGNORED: &str = "Ignored";

// =============================================================================
// Output Format
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Space-separated columns appended to the input line.
    #[default]
    Text,

    /// One JSON object per line.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "plain" => Ok(OutputFormat::Text),
            "json" | "jsonl" | "ndjson" => Ok(OutputFormat::Json),
            other => Err(BatchError::InvalidConfig(format!(
                "Unknown output format: '{}'. Valid options: text, json",
                other
            ))),
        }
    }
}

// =============================================================================
// Row Status
// =============================================================================

/// Outcome of one transaction line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// Charged the full price.
    Priced,
    /// Some discount was granted.
    Discounted,
    /// Could not be priced.
    Ignored,
}

impl RowStatus {
    pub fn of(quote: &Quote) -> Self {
        if quote.is_ignored() {
            RowStatus::Ignored
        } else if quote.is_discounted() {
            RowStatus::Discounted
        } else {
            RowStatus::Priced
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

fn price_column(quote: &Quote) -> String {
    if quote.is_ignored() {
        IGNORED.to_string()
    } else {
        quote.price.to_string()
    }
}

fn discount_column(discount: Money) -> String {
    if discount.is_zero() {
        NO_DISCOUNT.to_string()
    } else {
        discount.to_string()
    }
}

/// Renders the text output line for `line` priced as `quote`.
///
/// ```rust
/// use courier_batch::format::render_text;
/// use courier_core::{Money, Quote};
///
/// let quote = Quote::new(Money::from_cents(150), Money::from_cents(50));
/// assert_eq!(render_text("2015-02-01 S MR", &quote), "2015-02-01 S MR 1.50 0.50");
/// assert_eq!(render_text("2015-02-29 CUSPS", &Quote::ignored()), "2015-02-29 CUSPS Ignored -");
/// ```
pub fn render_text(line: &str, quote: &Quote) -> String {
    format!("{} {} {}", line, price_column(quote), discount_column(quote.discount))
}

/// A JSON-lines output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRow {
    pub line: String,
    pub price: Money,
    pub discount: Money,
    pub status: RowStatus,
}

impl JsonRow {
    pub fn new(line: &str, quote: &Quote) -> Self {
        JsonRow {
            line: line.to_string(),
            price: quote.price,
            discount: quote.discount,
            status: RowStatus::of(quote),
        }
    }
}
