//! # App Configuration
//!
//! TOML-backed configuration for the standard providers: the price book,
//! the tax rate and the promo code table. All monetary values are minor
//! units; all rates are basis points (1 bp = 0.01%).
//!
//! ```toml
//! currency = "EUR"
//!
//! [[catalog]]
//! sku = "sku-tee"
//! unit_price = 1999
//!
//! [tax]
//! rate_bp = 2000
//!
//! [[promos]]
//! code = "WELCOME10"
//! discount_bp = 1000
//! ```

use crate::error::AppError;
use serde::Deserialize;
use std::path::Path;

/// One priced item in the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    /// The SKU this price belongs to.
    pub sku: String,
    /// Unit price in minor units.
    pub unit_price: i64,
}

/// Tax configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaxConfig {
    /// Tax rate in basis points, applied to the discounted subtotal.
    #[serde(default)]
    pub rate_bp: u32,
}

/// One redeemable promo code.
#[derive(Debug, Clone, Deserialize)]
pub struct PromoEntry {
    /// The code as entered by the customer.
    pub code: String,
    /// Discount in basis points off the subtotal.
    pub discount_bp: u32,
}

/// The full app configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Currency every catalog price is denominated in.
    pub currency: String,
    /// The price book.
    #[serde(default)]
    pub catalog: Vec<CatalogEntry>,
    /// Tax settings.
    #[serde(default)]
    pub tax: TaxConfig,
    /// Redeemable promo codes.
    #[serde(default)]
    pub promos: Vec<PromoEntry>,
}

impl AppConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|e| AppError::Config(format!("cannot parse config: {e}")))
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let config = AppConfig::from_toml_str(
            r#"
            currency = "EUR"

            [[catalog]]
            sku = "sku-tee"
            unit_price = 1999

            [[catalog]]
            sku = "sku-mug"
            unit_price = 899

            [tax]
            rate_bp = 2000

            [[promos]]
            code = "WELCOME10"
            discount_bp = 1000
            "#,
        )
        .expect("parse");

        assert_eq!(config.currency, "EUR");
        assert_eq!(config.catalog.len(), 2);
        assert_eq!(config.tax.rate_bp, 2000);
        assert_eq!(config.promos[0].code, "WELCOME10");
    }

    #[test]
    fn sections_default_to_empty() {
        let config = AppConfig::from_toml_str(r#"currency = "USD""#).expect("parse");
        assert!(config.catalog.is_empty());
        assert_eq!(config.tax.rate_bp, 0);
        assert!(config.promos.is_empty());
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let result = AppConfig::from_toml_str("currency = ");
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
