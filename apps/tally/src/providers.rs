//! # Standard Providers
//!
//! The read-only dependency bundle handed to every rule call: price book,
//! tax table and promo book. Lookups are async because their production
//! counterparts are remote services; the file-backed implementations here
//! resolve immediately.
//!
//! The engine never touches the bundle — it is passed by reference through
//! the fold, unmodified.

use crate::config::AppConfig;
use std::collections::BTreeMap;
use tally_core::{Currency, Money, Sku};

/// Unit prices by SKU, in a single currency.
#[derive(Debug, Clone)]
pub struct PriceBook {
    currency: Currency,
    entries: BTreeMap<Sku, Money>,
}

impl PriceBook {
    /// Look up the unit price of a SKU.
    pub async fn unit_price(&self, sku: &Sku) -> Option<Money> {
        self.entries.get(sku).copied()
    }

    /// The currency every price is denominated in.
    #[must_use]
    pub fn currency(&self) -> &Currency {
        &self.currency
    }
}

/// The applicable tax rate.
#[derive(Debug, Clone, Default)]
pub struct TaxTable {
    rate_bp: u32,
}

impl TaxTable {
    /// Tax rate in basis points.
    pub async fn rate_bp(&self) -> u32 {
        self.rate_bp
    }
}

/// Redeemable promo codes and their discounts.
#[derive(Debug, Clone, Default)]
pub struct PromoBook {
    codes: BTreeMap<String, u32>,
}

impl PromoBook {
    /// Look up the discount for a code. `None` means the code is not valid.
    pub async fn discount_bp(&self, code: &str) -> Option<u32> {
        self.codes.get(code).copied()
    }
}

/// The bundle passed to every rule of the standard set.
#[derive(Debug, Clone)]
pub struct StandardProviders {
    /// Unit prices.
    pub price_book: PriceBook,
    /// Tax rate.
    pub tax_table: TaxTable,
    /// Promo codes.
    pub promo_book: PromoBook,
}

impl StandardProviders {
    /// Build the bundle from an app configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let entries = config
            .catalog
            .iter()
            .map(|entry| (Sku::new(entry.sku.clone()), Money::new(entry.unit_price)))
            .collect();
        let codes = config
            .promos
            .iter()
            .map(|promo| (promo.code.clone(), promo.discount_bp))
            .collect();

        Self {
            price_book: PriceBook {
                currency: Currency::new(config.currency.clone()),
                entries,
            },
            tax_table: TaxTable {
                rate_bp: config.tax.rate_bp,
            },
            promo_book: PromoBook { codes },
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
