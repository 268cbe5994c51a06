//! # Completeness Contract
//!
//! The predicate the final [`CartStructure`] must satisfy before a pipeline
//! run is considered successful. The contract is explicit and configurable:
//! every check can be relaxed individually, so callers whose target
//! structure differs (e.g. quote-only pipelines with no totals) can still
//! use the engine without forking it.
//!
//! Currency consistency across lines holds by construction — the structure
//! carries a single currency and lines carry none.

use crate::types::{CartStructure, Money, Sku, Totals};
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// VIOLATIONS
// =============================================================================

/// A named way the final structure failed the completeness contract.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum CompletenessViolation {
    /// No currency was set by any rule.
    #[error("structure has no currency")]
    MissingCurrency,

    /// No line items were produced.
    #[error("structure has no line items")]
    NoLineItems,

    /// No totals were assembled.
    #[error("structure has no totals")]
    MissingTotals,

    /// A line's extended price disagrees with its unit price and quantity.
    #[error("line '{sku}': line total {actual} != unit price x quantity ({expected})")]
    LineTotalMismatch {
        /// The offending line.
        sku: Sku,
        /// `unit_price * quantity`.
        expected: Money,
        /// The stored line total.
        actual: Money,
    },

    /// The subtotal disagrees with the sum of line totals.
    #[error("subtotal {actual} != sum of line totals ({expected})")]
    SubtotalMismatch {
        /// Sum of line totals.
        expected: Money,
        /// The stored subtotal.
        actual: Money,
    },

    /// Discount or tax is negative.
    #[error("negative adjustment: discount {discount}, tax {tax}")]
    NegativeAdjustment {
        /// The stored discount total.
        discount: Money,
        /// The stored tax total.
        tax: Money,
    },

    /// The grand total does not reconcile.
    #[error("grand total {actual} != subtotal - discount + tax ({expected})")]
    GrandTotalMismatch {
        /// `subtotal - discount_total + tax_total`.
        expected: Money,
        /// The stored grand total.
        actual: Money,
    },
}

// =============================================================================
// POLICY
// =============================================================================

/// Configurable completeness contract.
///
/// The default policy requires a currency, at least one line, assembled
/// totals, and full integer reconciliation. Each requirement can be relaxed
/// through the builder methods.
#[derive(Debug, Clone)]
pub struct CompletenessPolicy {
    require_currency: bool,
    require_lines: bool,
    require_totals: bool,
    reconcile: bool,
}

impl Default for CompletenessPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletenessPolicy {
    /// The full contract: currency, lines, totals, reconciliation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            require_currency: true,
            require_lines: true,
            require_totals: true,
            reconcile: true,
        }
    }

    /// Accept structures with no currency set.
    #[must_use]
    pub fn allow_missing_currency(mut self) -> Self {
        self.require_currency = false;
        self
    }

    /// Accept structures with zero line items.
    #[must_use]
    pub fn allow_empty_cart(mut self) -> Self {
        self.require_lines = false;
        self
    }

    /// Accept structures with no totals. Reconciliation is skipped when
    /// totals are absent.
    #[must_use]
    pub fn allow_missing_totals(mut self) -> Self {
        self.require_totals = false;
        self
    }

    /// Skip the numeric reconciliation checks.
    #[must_use]
    pub fn without_reconciliation(mut self) -> Self {
        self.reconcile = false;
        self
    }

    /// Validate a final structure against this policy.
    pub fn validate(&self, structure: &CartStructure) -> Result<(), CompletenessViolation> {
        if self.require_currency && structure.currency.is_none() {
            return Err(CompletenessViolation::MissingCurrency);
        }
        if self.require_lines && structure.lines.is_empty() {
            return Err(CompletenessViolation::NoLineItems);
        }
        match &structure.totals {
            None if self.require_totals => Err(CompletenessViolation::MissingTotals),
            None => Ok(()),
            Some(totals) if self.reconcile => self.reconcile_totals(structure, totals),
            Some(_) => Ok(()),
        }
    }

    fn reconcile_totals(
        &self,
        structure: &CartStructure,
        totals: &Totals,
    ) -> Result<(), CompletenessViolation> {
        for line in &structure.lines {
            let expected = line.unit_price.times(line.quantity);
            if line.line_total != expected {
                return Err(CompletenessViolation::LineTotalMismatch {
                    sku: line.sku.clone(),
                    expected,
                    actual: line.line_total,
                });
            }
        }

        let expected_subtotal = structure.lines_subtotal();
        if totals.subtotal != expected_subtotal {
            return Err(CompletenessViolation::SubtotalMismatch {
                expected: expected_subtotal,
                actual: totals.subtotal,
            });
        }

        if totals.discount_total.is_negative() || totals.tax_total.is_negative() {
            return Err(CompletenessViolation::NegativeAdjustment {
                discount: totals.discount_total,
                tax: totals.tax_total,
            });
        }

        let expected_grand = totals
            .subtotal
            .saturating_sub(totals.discount_total)
            .saturating_add(totals.tax_total);
        if totals.grand_total != expected_grand {
            return Err(CompletenessViolation::GrandTotalMismatch {
                expected: expected_grand,
                actual: totals.grand_total,
            });
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
