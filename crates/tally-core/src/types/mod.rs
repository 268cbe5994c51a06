//! # Core Type Definitions
//!
//! This module contains the shared data model for the Tally pipeline engine:
//! - Money and identifier newtypes (`Money`, `Currency`, `Sku`, `Priority`)
//! - The calculation request (`CartRequest`, `RequestedItem`)
//! - The evolving result shape (`CartStructure`, `LineItem`, `Totals`)
//! - Error types (`TallyError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point); money is minor units
//! - Use saturating arithmetic so totals never overflow-panic
//! - Derive `Ord` where values are used as ordering keys

use crate::completeness::CompletenessViolation;
use crate::rule::RuleError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// MONEY
// =============================================================================

/// A monetary amount in minor units (e.g. cents).
///
/// Uses i64 with saturating arithmetic. There is no attached currency;
/// a calculation is single-currency and the currency lives on
/// [`CartStructure`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Money(pub i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Money = Money(0);

    /// Create a new amount from minor units.
    #[must_use]
    pub const fn new(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Get the raw minor-unit value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Saturating addition.
    #[must_use]
    pub const fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction.
    #[must_use]
    pub const fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Multiply by a quantity, saturating.
    #[must_use]
    pub const fn times(self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(quantity as i64))
    }

    /// Scale by basis points (1 bp = 0.01%), truncating toward zero.
    ///
    /// The intermediate product is computed in i128 and clamped back into
    /// the i64 range, so large amounts cannot wrap.
    #[must_use]
    pub const fn scale_bp(self, basis_points: u32) -> Money {
        let scaled = (self.0 as i128 * basis_points as i128) / 10_000;
        if scaled > i64::MAX as i128 {
            Money(i64::MAX)
        } else if scaled < i64::MIN as i128 {
            Money(i64::MIN)
        } else {
            Money(scaled as i64)
        }
    }

    /// Check if the amount is below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Currency code for a calculation (ISO-4217 style, e.g. "EUR").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Currency(pub String);

impl Currency {
    /// Create a new currency code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stock-keeping unit identifying a purchasable item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sku(pub String);

impl Sku {
    /// Create a new SKU.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the SKU as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Execution-order key for a rule. Lower value runs earlier.
///
/// Two registered rules may never share a priority; the registrar rejects
/// such configurations with [`TallyError::DuplicatePriority`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Priority(pub i32);

impl Priority {
    /// Create a new priority.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// One requested item within a calculation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedItem {
    /// The item to price.
    pub sku: Sku,
    /// How many units were requested.
    pub quantity: u32,
}

impl RequestedItem {
    /// Create a new requested item.
    #[must_use]
    pub fn new(sku: Sku, quantity: u32) -> Self {
        Self { sku, quantity }
    }
}

/// The original computation request, as supplied by the caller.
///
/// A rule may amend the request mid-fold (e.g. normalizing a promo code);
/// the amended value then flows to every later rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRequest {
    /// Caller-chosen cart identifier.
    pub cart_id: String,
    /// Owning customer, if known.
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Items to price.
    #[serde(default)]
    pub items: Vec<RequestedItem>,
    /// Optional promotional code.
    #[serde(default)]
    pub promo_code: Option<String>,
}

impl CartRequest {
    /// Create a request with just a cart id.
    #[must_use]
    pub fn new(cart_id: impl Into<String>) -> Self {
        Self {
            cart_id: cart_id.into(),
            customer_id: None,
            items: Vec::new(),
            promo_code: None,
        }
    }
}

// =============================================================================
// STRUCTURE
// =============================================================================

/// A priced line within the evolving cart structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The priced item.
    pub sku: Sku,
    /// Units of the item.
    pub quantity: u32,
    /// Price per unit in minor units.
    pub unit_price: Money,
    /// Extended price for the line.
    pub line_total: Money,
}

impl LineItem {
    /// Create a line with `line_total` computed from price and quantity.
    #[must_use]
    pub fn new(sku: Sku, quantity: u32, unit_price: Money) -> Self {
        Self {
            sku,
            quantity,
            unit_price,
            line_total: unit_price.times(quantity),
        }
    }
}

/// Monetary totals of a completed structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Totals {
    /// Sum of all line totals before adjustments.
    pub subtotal: Money,
    /// Total discount applied (non-negative).
    pub discount_total: Money,
    /// Total tax applied (non-negative).
    pub tax_total: Money,
    /// `subtotal - discount_total + tax_total`.
    pub grand_total: Money,
}

impl Totals {
    /// Build totals from the three inputs, deriving the grand total.
    #[must_use]
    pub const fn new(subtotal: Money, discount_total: Money, tax_total: Money) -> Self {
        Self {
            subtotal,
            discount_total,
            tax_total,
            grand_total: subtotal.saturating_sub(discount_total).saturating_add(tax_total),
        }
    }
}

/// The evolving result shape threaded through the fold.
///
/// Starts fully empty; rules replace it wholesale as they contribute.
/// Completeness of the final value is judged by
/// [`CompletenessPolicy`](crate::completeness::CompletenessPolicy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CartStructure {
    /// The single currency every line is priced in.
    pub currency: Option<Currency>,
    /// Priced lines, in request order.
    pub lines: Vec<LineItem>,
    /// Totals, once a rule has assembled them.
    pub totals: Option<Totals>,
}

impl CartStructure {
    /// Sum of all line totals, saturating.
    #[must_use]
    pub fn lines_subtotal(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::ZERO, |acc, line| acc.saturating_add(line.line_total))
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the pipeline engine.
///
/// - A pipeline run is all-or-nothing; there is no partial-success reporting
/// - Rule failures are propagated unchanged as the `source` of [`Rule`]
/// - The engine performs no retries; recovery belongs to individual rules
///
/// [`Rule`]: TallyError::Rule
#[derive(Debug, Error)]
pub enum TallyError {
    /// Two rules were registered with the same priority.
    #[error("duplicate rule priority {priority}: '{first}' and '{second}'")]
    DuplicatePriority {
        /// The shared priority value.
        priority: Priority,
        /// Name of the first colliding rule (in input order).
        first: String,
        /// Name of the second colliding rule.
        second: String,
    },

    /// `calculate` was invoked with no rules registered.
    #[error("no rules registered")]
    EmptyPipeline,

    /// A rule invocation failed; the fold was aborted at that step.
    #[error("rule '{rule}' failed: {source}")]
    Rule {
        /// Name of the failing rule.
        rule: String,
        /// The rule's own error, unchanged.
        #[source]
        source: RuleError,
    },

    /// Every rule ran, but the final structure failed the completeness
    /// contract. A configuration or rule-authoring defect, not transient.
    #[error("calculation incomplete: {0}")]
    Incomplete(#[from] CompletenessViolation),

    /// The caller cancelled the run between rule steps.
    #[error("calculation cancelled")]
    Cancelled,
}

// =============================================================================
// TESTS
// =============================================================================
