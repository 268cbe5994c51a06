//! # Calculation State
//!
//! The three-slot accumulator threaded through a pipeline run, and the
//! completed form handed back to the caller.
//!
//! The state is owned by exactly one `calculate` invocation; nothing is
//! shared across runs.

use crate::rule::StateUpdate;
use crate::types::{CartRequest, CartStructure};
use serde::Serialize;

// =============================================================================
// CALCULATION STATE
// =============================================================================

/// The accumulator for one pipeline run.
///
/// Three independent slots: the (possibly amended) request, the evolving
/// structure, and free-form calculation data rules use to pass intermediate
/// results forward (e.g. discounts applied, tax basis).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationState<D> {
    /// The original computation request, possibly amended by a rule.
    pub request: CartRequest,
    /// The evolving result shape; starts empty.
    pub structure: CartStructure,
    /// Free-form auxiliary data; starts at `D::default()`.
    pub data: D,
}

impl<D: Default> CalculationState<D> {
    /// Initial state for a run: the given request, everything else empty.
    #[must_use]
    pub fn new(request: CartRequest) -> Self {
        Self {
            request,
            structure: CartStructure::default(),
            data: D::default(),
        }
    }
}

impl<D> CalculationState<D> {
    /// Merge one rule's partial update into the state.
    ///
    /// This is the only place where state is mutated. Each slot present in
    /// the update replaces the corresponding slot wholesale; absent slots
    /// keep their prior value. No deep merge.
    #[must_use]
    pub fn apply(mut self, update: StateUpdate<D>) -> Self {
        if let Some(request) = update.request {
            self.request = request;
        }
        if let Some(structure) = update.structure {
            self.structure = structure;
        }
        if let Some(data) = update.data {
            self.data = data;
        }
        self
    }
}

// =============================================================================
// UPDATE SUMMARY
// =============================================================================

/// Which slots one rule's update replaced. Handed to the fold observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct UpdateSummary {
    /// The request slot was replaced.
    pub request_replaced: bool,
    /// The structure slot was replaced.
    pub structure_replaced: bool,
    /// The calculation-data slot was replaced.
    pub data_replaced: bool,
}

impl UpdateSummary {
    /// Summarize an update without consuming it.
    #[must_use]
    pub fn of<D>(update: &StateUpdate<D>) -> Self {
        Self {
            request_replaced: update.request.is_some(),
            structure_replaced: update.structure.is_some(),
            data_replaced: update.data.is_some(),
        }
    }
}

// =============================================================================
// COMPLETED CALCULATION
// =============================================================================

/// The final accumulator of a successful run.
///
/// Constructed by the executor only after the structure passed the
/// configured completeness contract; its lifecycle ends at return, the
/// engine retains nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedCalculation<D> {
    /// The request as of the last rule.
    pub request: CartRequest,
    /// The structure, validated against the completeness contract.
    pub structure: CartStructure,
    /// The final calculation data.
    pub data: D,
}

impl<D> CompletedCalculation<D> {
    /// Bless a folded state as complete. Executor-only: callers can read
    /// the fields but never forge a completed calculation.
    pub(crate) fn from_state(state: CalculationState<D>) -> Self {
        Self {
            request: state.request,
            structure: state.structure,
            data: state.data,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
