//! # Monthly Discount Ledger
//!
//! Per-run state that makes discount evaluation order-sensitive.
//!
//! ## What It Tracks
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     MonthlyDiscountLedger                               │
//! │                                                                         │
//! │  large_counts                          accumulated                      │
//! │  ─────────────                         ───────────                      │
//! │  (LP, 4) ─► 3                          4.50 granted so far              │
//! │  (LP, 5) ─► 1                                                           │
//! │                                                                         │
//! │  Counters are keyed by month NUMBER (1-12), so April 2024 and April    │
//! │  2025 share a counter within one run.                                  │
//! │                                                                         │
//! │  accumulated is one running total for the whole run unless the        │
//! │  ledger was built with CapReset::CalendarMonth.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger is owned by exactly one engine and only ever mutated through
//! `&mut`; shipments must reach it in input order.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ProviderId;

// =============================================================================
// Cap Reset Policy
// =============================================================================

/// When the accumulated discount total starts again from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapReset {
    /// Only a new ledger resets the total.
    #[default]
    Never,

    /// The total restarts when a discountable shipment falls in a different
    /// (year, month) than the previous one.
    CalendarMonth,
}

impl fmt::Display for CapReset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapReset::Never => write!(f, "never"),
            CapReset::CalendarMonth => write!(f, "calendar_month"),
        }
    }
}

impl FromStr for CapReset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "never" | "run" => Ok(CapReset::Never),
            "calendar_month" | "calendar-month" | "month" => Ok(CapReset::CalendarMonth),
            _ => Err(ValidationError::NotAllowed {
                field: "cap_reset".to_string(),
                allowed: vec!["never".to_string(), "calendar_month".to_string()],
            }),
        }
    }
}

// =============================================================================
// Ledger
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct MonthlyDiscountLedger {
    large_counts: HashMap<(ProviderId, u32), u32>,
    accumulated: Money,
    cap_reset: CapReset,
    period: Option<(i32, u32)>,
}

impl MonthlyDiscountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cap_reset(cap_reset: CapReset) -> Self {
        MonthlyDiscountLedger {
            cap_reset,
            ..Self::default()
        }
    }

    pub fn cap_reset(&self) -> CapReset {
        self.cap_reset
    }

    /// Counts one more LARGE shipment for `provider` in `month` and returns
    /// the new count (1 for the first shipment of that month).
    pub fn record_large_shipment(&mut self, provider: &ProviderId, month: u32) -> u32 {
        let count = self
            .large_counts
            .entry((provider.clone(), month))
            .or_insert(0);
        *count += 1;
        *count
    }

    /// LARGE shipments counted so far for `provider` in `month`.
    pub fn large_count(&self, provider: &ProviderId, month: u32) -> u32 {
        self.large_counts
            .get(&(provider.clone(), month))
            .copied()
            .unwrap_or(0)
    }

    /// Total discount granted in the current cap context.
    pub fn accumulated_discount(&self) -> Money {
        self.accumulated
    }

    /// Budget left under `cap`, never below zero.
    pub fn remaining(&self, cap: Money) -> Money {
        cap.saturating_sub_to_zero(self.accumulated)
    }

    /// Moves the cap context to the month of `date`.
    ///
    /// With [`CapReset::Never`] this is a no-op. With
    /// [`CapReset::CalendarMonth`] the accumulated total is cleared when the
    /// month differs from the last one seen.
    pub fn enter_period(&mut self, date: NaiveDate) {
        if self.cap_reset == CapReset::Never {
            return;
        }

        let period = (date.year(), date.month());
        match self.period {
            Some(current) if current == period => {}
            Some(previous) => {
                debug!(
                    from = ?previous,
                    to = ?period,
                    carried = %self.accumulated,
                    "Calendar month changed, resetting discount total"
                );
                self.accumulated = Money::zero();
                self.period = Some(period);
            }
            None => self.period = Some(period),
        }
    }

    /// Records a granted discount.
    pub fn grant(&mut self, discount: Money) {
        self.accumulated += discount;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
