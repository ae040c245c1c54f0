//! # Price Catalogs
//!
//! Per-provider price lists and the set of providers active for a run.
//!
//! ```text
//! CatalogSet
//! ├── "LP" ─► PriceCatalog { S: 1.50, M: 4.90, L: 6.90 }
//! └── "MR" ─► PriceCatalog { S: 2.00, M: 3.00, L: 4.00 }
//! ```
//!
//! Lookups never fail. An unknown provider or an unlisted size prices at
//! 0.00; the engine relies on that to treat such shipments as ignored
//! rather than as errors.

use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{ProviderId, Size};
use crate::validation::{validate_price, validate_provider_id};

// =============================================================================
// Price Catalog
// =============================================================================

/// Prices one provider charges per package size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceCatalog {
    id: ProviderId,
    prices: BTreeMap<Size, Money>,
}

impl PriceCatalog {
    /// Creates a catalog. No validation happens here; see [`validate`](Self::validate).
    ///
    /// ## Example
    /// ```rust
    /// use courier_core::{Money, PriceCatalog, Size};
    ///
    /// let mr = PriceCatalog::new("MR", [
    ///     (Size::Small, Money::from_cents(200)),
    ///     (Size::Large, Money::from_cents(400)),
    /// ]);
    /// assert_eq!(mr.price(Size::Large).cents(), 400);
    /// assert_eq!(mr.price(Size::Medium).cents(), 0);
    /// ```
    pub fn new(id: impl Into<ProviderId>, prices: impl IntoIterator<Item = (Size, Money)>) -> Self {
        PriceCatalog {
            id: id.into(),
            prices: prices.into_iter().collect(),
        }
    }

    pub fn id(&self) -> &ProviderId {
        &self.id
    }

    /// Price for `size`, or 0.00 when the size is not listed.
    #[inline]
    pub fn price(&self, size: Size) -> Money {
        self.listed_price(size).unwrap_or_default()
    }

    /// Price for `size` only if the provider lists it.
    #[inline]
    pub fn listed_price(&self, size: Size) -> Option<Money> {
        self.prices.get(&size).copied()
    }

    /// Listed prices, smallest size first.
    pub fn prices(&self) -> impl Iterator<Item = (Size, Money)> + '_ {
        self.prices.iter().map(|(size, price)| (*size, *price))
    }

    /// Checks the identifier and that no listed price is negative.
    pub fn validate(&self) -> CoreResult<()> {
        let wrap = |source| CoreError::InvalidCatalog {
            provider: self.id.to_string(),
            source,
        };

        validate_provider_id(self.id.as_str()).map_err(wrap)?;
        for (_, price) in self.prices() {
            validate_price(price).map_err(wrap)?;
        }
        Ok(())
    }
}

// =============================================================================
// Catalog Set
// =============================================================================

/// The providers registered for a run, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSet {
    catalogs: BTreeMap<ProviderId, PriceCatalog>,
}

impl CatalogSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a catalog. A later registration for the same identifier
    /// replaces the earlier one, which is returned.
    pub fn register(&mut self, catalog: PriceCatalog) -> Option<PriceCatalog> {
        self.catalogs.insert(catalog.id().clone(), catalog)
    }

    pub fn get(&self, id: &str) -> Option<&PriceCatalog> {
        self.catalogs.get(id)
    }

    /// Resolves a raw identifier from an input row. Unregistered identifiers
    /// resolve to `None`.
    pub fn resolve(&self, raw: &str) -> Option<ProviderId> {
        self.catalogs.get_key_value(raw).map(|(id, _)| id.clone())
    }

    /// Price lookup across the set; 0.00 for an unknown provider or size.
    pub fn lookup(&self, id: &str, size: Size) -> Money {
        self.get(id).map(|catalog| catalog.price(size)).unwrap_or_default()
    }

    /// Lowest listed price for `size` across all providers. Providers that
    /// do not list the size are skipped.
    pub fn lowest_price(&self, size: Size) -> Option<Money> {
        self.catalogs
            .values()
            .filter_map(|catalog| catalog.listed_price(size))
            .min()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceCatalog> {
        self.catalogs.values()
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Validates every catalog and requires at least one.
    pub fn validate(&self) -> CoreResult<()> {
        if self.is_empty() {
            return Err(CoreError::NoProviders);
        }
        self.iter().try_for_each(PriceCatalog::validate)
    }
}

impl FromIterator<PriceCatalog> for CatalogSet {
    fn from_iter<I: IntoIterator<Item = PriceCatalog>>(iter: I) -> Self {
        let mut set = CatalogSet::new();
        for catalog in iter {
            set.register(catalog);
        }
        set
    }
}

impl Extend<PriceCatalog> for CatalogSet {
    fn extend<I: IntoIterator<Item = PriceCatalog>>(&mut self, iter: I) {
        for catalog in iter {
            self.register(catalog);
        }
    }
}

// =============================================================================
// Default Providers
// =============================================================================

/// The provider price list shipped with the application.
///
/// | Provider | S    | M    | L    |
/// |----------|------|------|------|
/// | LP       | 1.50 | 4.90 | 6.90 |
/// | MR       | 2.00 | 3.00 | 4.00 |
pub fn default_providers() -> Vec<PriceCatalog> {
    vec![
        PriceCatalog::new(
            "LP",
            [
                (Size::Small, Money::from_cents(150)),
                (Size::Medium, Money::from_cents(490)),
                (Size::Large, Money::from_cents(690)),
            ],
        ),
        PriceCatalog::new(
            "MR",
            [
                (Size::Small, Money::from_cents(200)),
                (Size::Medium, Money::from_cents(300)),
                (Size::Large, Money::from_cents(400)),
            ],
        ),
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(id: &str, small: i64, medium: i64, large: i64) -> PriceCatalog {
        PriceCatalog::new(
            id,
            [
                (Size::Small, Money::from_cents(small)),
                (Size::Medium, Money::from_cents(medium)),
                (Size::Large, Money::from_cents(large)),
            ],
        )
    }

    #[test]
    fn test_price_lookup() {
        let provider = PriceCatalog::new(
            "Test",
            [
                (Size::Small, Money::from_cents(1000)),
                (Size::Large, Money::from_cents(2000)),
            ],
        );

        assert_eq!(provider.price(Size::Small).cents(), 1000);
        assert_eq!(provider.price(Size::Large).cents(), 2000);
        assert_eq!(provider.price(Size::Medium), Money::zero());
        assert_eq!(provider.listed_price(Size::Medium), None);
    }

    #[test]
    fn test_set_lookup_unknown_provider_is_zero() {
        let set: CatalogSet = default_providers().into_iter().collect();

        assert_eq!(set.lookup("LP", Size::Large).cents(), 690);
        assert_eq!(set.lookup("DHL", Size::Large), Money::zero());
        assert_eq!(set.resolve("MR"), Some(ProviderId::from("MR")));
        assert_eq!(set.resolve("DHL"), None);
        assert_eq!(set.resolve("lp"), None);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut set = CatalogSet::new();
        assert!(set.register(catalog("LP", 150, 490, 690)).is_none());

        let replaced = set.register(catalog("LP", 100, 200, 300));
        assert_eq!(replaced.map(|c| c.price(Size::Small).cents()), Some(150));
        assert_eq!(set.len(), 1);
        assert_eq!(set.lookup("LP", Size::Small).cents(), 100);
    }

    #[test]
    fn test_lowest_price_skips_unlisted_sizes() {
        let mut set: CatalogSet = default_providers().into_iter().collect();
        assert_eq!(set.lowest_price(Size::Small), Some(Money::from_cents(150)));
        assert_eq!(set.lowest_price(Size::Medium), Some(Money::from_cents(300)));

        set.register(PriceCatalog::new("XP", [(Size::Large, Money::from_cents(100))]));
        assert_eq!(set.lowest_price(Size::Small), Some(Money::from_cents(150)));
        assert_eq!(set.lowest_price(Size::Large), Some(Money::from_cents(100)));

        assert_eq!(CatalogSet::new().lowest_price(Size::Small), None);
    }

    #[test]
    fn test_validate() {
        let set: CatalogSet = default_providers().into_iter().collect();
        assert!(set.validate().is_ok());

        assert!(matches!(CatalogSet::new().validate(), Err(CoreError::NoProviders)));

        let negative = catalog("LP", -1, 490, 690);
        assert!(matches!(
            negative.validate(),
            Err(CoreError::InvalidCatalog { ref provider, .. }) if provider == "LP"
        ));

        assert!(catalog("L P", 1, 1, 1).validate().is_err());
    }
}
