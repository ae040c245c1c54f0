//! # Discount Engine
//!
//! Decides, shipment by shipment, what to charge and how much to discount.
//!
//! ## Evaluation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       apply_discount(shipment)                          │
//! │                                                                         │
//! │  provider absent / unregistered? ──yes──► (0.00, 0.00)                 │
//! │           │ no                                                          │
//! │  date or size invalid? ───────────yes──► (0.00, 0.00)                  │
//! │           │ no                                                          │
//! │  price = catalog.price(size)                                           │
//! │           │                                                             │
//! │  match (size, role)                                                    │
//! │  ├── (S, _)            discount = price - lowest S price               │
//! │  ├── (L, Flagship)     count += 1; discount = price if count == 3      │
//! │  └── (M, _) | (L, Standard) ─────────────► (price, 0.00)  no cap       │
//! │           │                                                             │
//! │  clamp discount to remaining monthly budget, then to [0, price]        │
//! │  ledger.grant(discount)                                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  (price - discount, discount)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use courier_core::{default_providers, DiscountEngine, Money, ShipmentRecord};
//!
//! let mut engine = DiscountEngine::new(Money::from_cents(1000));
//! for catalog in default_providers() {
//!     engine.add_provider(catalog);
//! }
//!
//! let provider = engine.resolve_provider("MR");
//! let quote = engine.apply_discount(&ShipmentRecord::new("2015-02-01", "S", provider));
//! assert_eq!(quote.price.to_string(), "1.50");
//! assert_eq!(quote.discount.to_string(), "0.50");
//! ```

use chrono::Datelike;
use tracing::debug;

use crate::catalog::{CatalogSet, PriceCatalog};
use crate::error::CoreResult;
use crate::ledger::{CapReset, MonthlyDiscountLedger};
use crate::money::Money;
use crate::shipment::{ShipmentRecord, ValidShipment};
use crate::types::{ProviderId, Quote, Size};
use crate::validation::validate_monthly_cap;
use crate::{FLAGSHIP_PROVIDER, NTH_FREE_LARGE_SHIPMENT};

// =============================================================================
// Provider Role
// =============================================================================

/// Whether a provider takes part in the free LARGE shipment rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderRole {
    Flagship,
    Standard,
}

impl ProviderRole {
    pub fn of(provider: &ProviderId) -> Self {
        if provider.as_str() == FLAGSHIP_PROVIDER {
            ProviderRole::Flagship
        } else {
            ProviderRole::Standard
        }
    }
}

// =============================================================================
// Rule Evaluation
// =============================================================================

/// Evaluates one shipment against `catalogs`, updating `ledger`.
///
/// Never fails: unusable shipments come back as [`Quote::ignored`].
/// Shipments must be passed in input order; the third-LARGE rule and the
/// monthly cap both depend on what came before.
pub fn apply_discount(
    shipment: &ShipmentRecord,
    catalogs: &CatalogSet,
    ledger: &mut MonthlyDiscountLedger,
    monthly_cap: Money,
) -> Quote {
    let Some((provider, catalog)) = shipment
        .provider()
        .and_then(|id| catalogs.get(id.as_str()).map(|catalog| (id, catalog)))
    else {
        debug!(
            date = shipment.date(),
            size = shipment.size_token(),
            "Unknown provider, shipment ignored"
        );
        return Quote::ignored();
    };

    let ValidShipment { date, size } = match shipment.validate() {
        Ok(valid) => valid,
        Err(err) => {
            debug!(
                date = shipment.date(),
                size = shipment.size_token(),
                %provider,
                error = %err,
                "Shipment date or size is invalid, shipment ignored"
            );
            return Quote::ignored();
        }
    };

    let price = catalog.price(size);

    let discount = match (size, ProviderRole::of(provider)) {
        (Size::Small, _) => {
            // Every S shipment is brought down to the cheapest S on offer.
            let lowest = catalogs.lowest_price(Size::Small).unwrap_or(price);
            let discount = price.saturating_sub(lowest).max(Money::zero());
            debug!(
                %date,
                %provider,
                %price,
                %lowest,
                %discount,
                "Small package matched to lowest price"
            );
            discount
        }
        (Size::Large, ProviderRole::Flagship) => {
            let count = ledger.record_large_shipment(provider, date.month());
            let discount = if count == NTH_FREE_LARGE_SHIPMENT {
                price
            } else {
                Money::zero()
            };
            debug!(
                %date,
                %provider,
                %price,
                count,
                %discount,
                "Flagship large package counted"
            );
            discount
        }
        (Size::Medium, _) | (Size::Large, ProviderRole::Standard) => {
            debug!(%date, %provider, %size, %price, "No discount rule applies");
            return Quote::new(price, Money::zero());
        }
    };

    ledger.enter_period(date);
    let remaining = ledger.remaining(monthly_cap);
    let granted = discount.min(remaining).min(price).max(Money::zero());
    if granted < discount {
        debug!(
            %date,
            %provider,
            wanted = %discount,
            %granted,
            %remaining,
            "Discount limited by monthly cap"
        );
    }
    ledger.grant(granted);

    Quote::new(price - granted, granted)
}

// =============================================================================
// Discount Engine
// =============================================================================

/// Owns the registered catalogs, the monthly cap and the run's ledger.
#[derive(Debug, Clone)]
pub struct DiscountEngine {
    catalogs: CatalogSet,
    ledger: MonthlyDiscountLedger,
    monthly_cap: Money,
}

impl DiscountEngine {
    /// Creates an engine with an empty catalog set and a fresh ledger.
    pub fn new(monthly_cap: Money) -> Self {
        DiscountEngine {
            catalogs: CatalogSet::new(),
            ledger: MonthlyDiscountLedger::new(),
            monthly_cap,
        }
    }

    /// Replaces the ledger with a fresh one using `cap_reset`.
    pub fn with_cap_reset(mut self, cap_reset: CapReset) -> Self {
        self.ledger = MonthlyDiscountLedger::with_cap_reset(cap_reset);
        self
    }

    /// Registers a provider. Last registration for an identifier wins.
    pub fn add_provider(&mut self, catalog: PriceCatalog) {
        if let Some(previous) = self.catalogs.register(catalog) {
            debug!(provider = %previous.id(), "Provider catalog replaced");
        }
    }

    pub fn resolve_provider(&self, raw: &str) -> Option<ProviderId> {
        self.catalogs.resolve(raw)
    }

    /// Evaluates one shipment. See [`apply_discount`].
    pub fn apply_discount(&mut self, shipment: &ShipmentRecord) -> Quote {
        apply_discount(shipment, &self.catalogs, &mut self.ledger, self.monthly_cap)
    }

    pub fn catalogs(&self) -> &CatalogSet {
        &self.catalogs
    }

    pub fn ledger(&self) -> &MonthlyDiscountLedger {
        &self.ledger
    }

    pub fn monthly_cap(&self) -> Money {
        self.monthly_cap
    }

    /// Checks the cap and every registered catalog. Call once after
    /// registration; [`apply_discount`](Self::apply_discount) works on an
    /// unchecked engine too.
    pub fn validate(&self) -> CoreResult<()> {
        validate_monthly_cap(self.monthly_cap)?;
        self.catalogs.validate()
    }
}

impl Extend<PriceCatalog> for DiscountEngine {
    fn extend<I: IntoIterator<Item = PriceCatalog>>(&mut self, iter: I) {
        for catalog in iter {
            self.add_provider(catalog);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_providers;
    use crate::error::CoreError;

    fn cents(value: i64) -> Money {
        Money::from_cents(value)
    }

    fn engine(cap: i64) -> DiscountEngine {
        let mut engine = DiscountEngine::new(cents(cap));
        engine.extend(default_providers());
        engine
    }

    fn ship(engine: &mut DiscountEngine, date: &str, size: &str, provider: &str) -> Quote {
        let provider = engine.resolve_provider(provider);
        engine.apply_discount(&ShipmentRecord::new(date, size, provider))
    }

    #[test]
    fn test_provider_role() {
        assert_eq!(ProviderRole::of(&ProviderId::from("LP")), ProviderRole::Flagship);
        assert_eq!(ProviderRole::of(&ProviderId::from("MR")), ProviderRole::Standard);
    }

    #[test]
    fn test_validate_setup() {
        assert!(engine(1000).validate().is_ok());
        assert!(matches!(engine(0).validate(), Err(CoreError::Validation(_))));
        assert!(matches!(
            DiscountEngine::new(cents(1000)).validate(),
            Err(CoreError::NoProviders)
        ));
    }

    #[test]
    fn test_unknown_provider_is_ignored() {
        let mut engine = engine(1000);
        assert_eq!(ship(&mut engine, "2015-02-01", "S", "DHL"), Quote::ignored());
    }

    #[test]
    fn test_provider_not_in_catalogs_is_ignored() {
        // A record can name a provider the set never registered.
        let mut engine = engine(1000);
        let shipment = ShipmentRecord::new("2015-02-01", "S", Some(ProviderId::from("DHL")));
        assert_eq!(engine.apply_discount(&shipment), Quote::ignored());
    }

    #[test]
    fn test_invalid_record_is_ignored_without_touching_ledger() {
        let mut engine = engine(1000);
        assert_eq!(ship(&mut engine, "2024-13-32", "L", "LP"), Quote::ignored());
        assert_eq!(ship(&mut engine, "2015-02-29", "CUSPS", "LP"), Quote::ignored());
        assert_eq!(engine.ledger().accumulated_discount(), Money::zero());
        assert_eq!(engine.ledger().large_count(&ProviderId::from("LP"), 2), 0);
    }

    #[test]
    fn test_small_matches_lowest_price() {
        let mut engine = engine(1000);
        let quote = ship(&mut engine, "2015-02-01", "S", "MR");
        assert_eq!(quote, Quote::new(cents(150), cents(50)));

        let quote = ship(&mut engine, "2015-02-02", "S", "LP");
        assert_eq!(quote, Quote::new(cents(150), Money::zero()));
    }

    #[test]
    fn test_medium_and_standard_large_bypass_cap() {
        let mut engine = engine(1000);
        assert_eq!(ship(&mut engine, "2015-02-01", "M", "LP"), Quote::new(cents(490), Money::zero()));
        assert_eq!(ship(&mut engine, "2015-02-01", "L", "MR"), Quote::new(cents(400), Money::zero()));
        assert_eq!(engine.ledger().large_count(&ProviderId::from("MR"), 2), 0);
    }

    #[test]
    fn test_negative_small_discount_clamped() {
        let mut engine = DiscountEngine::new(cents(1000));
        engine.add_provider(PriceCatalog::new("LP", [(Size::Small, cents(300))]));
        engine.add_provider(PriceCatalog::new("MR", [(Size::Large, cents(400))]));

        // MR lists no S, so its S price is 0.00 while the lowest listed is 3.00.
        let quote = ship(&mut engine, "2015-02-01", "S", "MR");
        assert_eq!(quote.discount, Money::zero());
        assert_eq!(quote.price, Money::zero());
    }

    #[test]
    fn test_negative_price_never_produces_negative_discount() {
        let mut engine = DiscountEngine::new(cents(1000));
        engine.add_provider(PriceCatalog::new("LP", [(Size::Large, cents(-500))]));

        for day in 1..=4 {
            let quote = ship(&mut engine, &format!("2015-03-0{day}"), "L", "LP");
            assert_eq!(quote.discount, Money::zero());
            assert_eq!(quote.price, cents(-500));
        }
    }

    #[test]
    fn test_extreme_small_prices_stay_within_cap() {
        let mut engine = DiscountEngine::new(cents(1000));
        engine.add_provider(PriceCatalog::new("LP", [(Size::Small, cents(i64::MAX))]));
        engine.add_provider(PriceCatalog::new("MR", [(Size::Small, cents(-100))]));

        let quote = ship(&mut engine, "2015-02-01", "S", "LP");
        assert_eq!(quote, Quote::new(cents(i64::MAX - 1000), cents(1000)));

        let quote = ship(&mut engine, "2015-02-02", "S", "MR");
        assert_eq!(quote, Quote::new(cents(-100), Money::zero()));
    }

    #[test]
    fn test_most_negative_lowest_price_does_not_overflow() {
        let mut engine = DiscountEngine::new(cents(1000));
        engine.add_provider(PriceCatalog::new("LP", [(Size::Small, cents(i64::MIN))]));
        engine.add_provider(PriceCatalog::new("MR", [(Size::Small, cents(100))]));

        let quote = ship(&mut engine, "2015-02-01", "S", "MR");
        assert_eq!(quote, Quote::new(Money::zero(), cents(100)));
        assert_eq!(engine.ledger().accumulated_discount(), cents(100));
    }

    #[test]
    fn test_last_registration_wins() {
        let mut engine = engine(1000);
        engine.add_provider(PriceCatalog::new("MR", [(Size::Medium, cents(100))]));
        assert_eq!(ship(&mut engine, "2015-02-01", "M", "MR").price, cents(100));
        assert_eq!(engine.catalogs().len(), 2);
    }
}
