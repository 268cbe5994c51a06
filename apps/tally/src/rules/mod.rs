//! # Standard Rule Set
//!
//! The caller-authored rules the Tally binary registers: catalog pricing,
//! promo discount, tax, and totals assembly. Each rule is a distinct
//! implementer of the engine's `Rule` trait and contributes through the
//! slot it owns:
//!
//! | Rule          | Priority | Contributes                         |
//! |---------------|----------|-------------------------------------|
//! | `CatalogRule` | 10       | structure: currency + line items    |
//! | `PromoRule`   | 20       | data: discount from the promo book  |
//! | `TaxRule`     | 30       | data: tax on the discounted basis   |
//! | `TotalsRule`  | 40       | structure: assembled totals         |
//!
//! Intermediate amounts travel forward through [`StandardCalcData`]; only
//! `TotalsRule` folds them into the structure.

use crate::providers::StandardProviders;
use async_trait::async_trait;
use serde::Serialize;
use tally_core::{
    CalculationState, CartStructure, LineItem, Money, Priority, Rule, RuleError, Sku, StateUpdate,
    Totals,
};
use thiserror::Error;

// =============================================================================
// CALCULATION DATA
// =============================================================================

/// Intermediate amounts the standard rules pass forward through the fold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StandardCalcData {
    /// Discount computed by [`PromoRule`], consumed by [`TotalsRule`].
    pub discount_total: Money,
    /// Tax computed by [`TaxRule`], consumed by [`TotalsRule`].
    pub tax_total: Money,
    /// The promo code that actually took effect, if any.
    pub promo_applied: Option<String>,
}

/// Errors the standard rules can fail with.
#[derive(Debug, Error)]
pub enum StandardRuleError {
    /// A requested SKU has no price in the catalog.
    #[error("unknown sku '{0}'")]
    UnknownSku(Sku),
}

// =============================================================================
// CATALOG RULE
// =============================================================================

/// Prices every requested item from the price book and sets the currency.
pub struct CatalogRule;

#[async_trait]
impl Rule<StandardCalcData, StandardProviders> for CatalogRule {
    fn name(&self) -> &str {
        "catalog"
    }

    fn priority(&self) -> Priority {
        Priority::new(10)
    }

    async fn run(
        &self,
        state: &CalculationState<StandardCalcData>,
        providers: &StandardProviders,
    ) -> Result<StateUpdate<StandardCalcData>, RuleError> {
        let mut lines = Vec::with_capacity(state.request.items.len());
        for item in &state.request.items {
            let unit_price = providers
                .price_book
                .unit_price(&item.sku)
                .await
                .ok_or_else(|| {
                    Box::new(StandardRuleError::UnknownSku(item.sku.clone())) as RuleError
                })?;
            lines.push(LineItem::new(item.sku.clone(), item.quantity, unit_price));
        }

        Ok(StateUpdate::none().with_structure(CartStructure {
            currency: Some(providers.price_book.currency().clone()),
            lines,
            totals: None,
        }))
    }
}

// =============================================================================
// PROMO RULE
// =============================================================================

/// Applies the request's promo code, if it is in the promo book.
///
/// An unknown code is not an error — the cart simply gets no discount,
/// matching how checkout treats mistyped codes.
pub struct PromoRule;

#[async_trait]
impl Rule<StandardCalcData, StandardProviders> for PromoRule {
    fn name(&self) -> &str {
        "promo"
    }

    fn priority(&self) -> Priority {
        Priority::new(20)
    }

    async fn run(
        &self,
        state: &CalculationState<StandardCalcData>,
        providers: &StandardProviders,
    ) -> Result<StateUpdate<StandardCalcData>, RuleError> {
        let Some(code) = state.request.promo_code.as_deref() else {
            return Ok(StateUpdate::none());
        };

        let Some(discount_bp) = providers.promo_book.discount_bp(code).await else {
            tracing::debug!(code, "promo code not in promo book, no discount");
            return Ok(StateUpdate::none());
        };

        let subtotal = state.structure.lines_subtotal();
        let data = StandardCalcData {
            discount_total: subtotal.scale_bp(discount_bp),
            promo_applied: Some(code.to_string()),
            ..state.data.clone()
        };
        Ok(StateUpdate::none().with_data(data))
    }
}

// =============================================================================
// TAX RULE
// =============================================================================

/// Computes tax on the discounted subtotal.
pub struct TaxRule;

#[async_trait]
impl Rule<StandardCalcData, StandardProviders> for TaxRule {
    fn name(&self) -> &str {
        "tax"
    }

    fn priority(&self) -> Priority {
        Priority::new(30)
    }

    async fn run(
        &self,
        state: &CalculationState<StandardCalcData>,
        providers: &StandardProviders,
    ) -> Result<StateUpdate<StandardCalcData>, RuleError> {
        let rate_bp = providers.tax_table.rate_bp().await;
        let basis = state
            .structure
            .lines_subtotal()
            .saturating_sub(state.data.discount_total);
        let data = StandardCalcData {
            tax_total: basis.scale_bp(rate_bp),
            ..state.data.clone()
        };
        Ok(StateUpdate::none().with_data(data))
    }
}

// =============================================================================
// TOTALS RULE
// =============================================================================

/// Assembles the totals from the lines and the accumulated data.
pub struct TotalsRule;

#[async_trait]
impl Rule<StandardCalcData, StandardProviders> for TotalsRule {
    fn name(&self) -> &str {
        "totals"
    }

    fn priority(&self) -> Priority {
        Priority::new(40)
    }

    async fn run(
        &self,
        state: &CalculationState<StandardCalcData>,
        _providers: &StandardProviders,
    ) -> Result<StateUpdate<StandardCalcData>, RuleError> {
        let subtotal = state.structure.lines_subtotal();
        let structure = CartStructure {
            totals: Some(Totals::new(
                subtotal,
                state.data.discount_total,
                state.data.tax_total,
            )),
            ..state.structure.clone()
        };
        Ok(StateUpdate::none().with_structure(structure))
    }
}

// =============================================================================
// ASSEMBLY
// =============================================================================

/// The standard rule set, ready to register.
#[must_use]
pub fn standard_rules() -> Vec<Box<dyn Rule<StandardCalcData, StandardProviders>>> {
    vec![
        Box::new(CatalogRule),
        Box::new(PromoRule),
        Box::new(TaxRule),
        Box::new(TotalsRule),
    ]
}
