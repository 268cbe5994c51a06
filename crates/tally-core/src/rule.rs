//! # Rule Seam
//!
//! The single extension point of the engine. A rule is an opaque,
//! caller-authored unit with a name, a priority, and one capability:
//! given the current calculation state and the provider bundle, produce a
//! partial state update.
//!
//! Rules are registered by value into an ordered collection and dispatched
//! through `dyn Rule`; no inheritance hierarchy exists or is needed.

use crate::state::CalculationState;
use crate::types::{CartRequest, CartStructure, Priority};
use async_trait::async_trait;

/// Error type a rule may fail with. The engine never inspects it; it is
/// carried unchanged as the source of
/// [`TallyError::Rule`](crate::types::TallyError::Rule).
pub type RuleError = Box<dyn std::error::Error + Send + Sync>;

// =============================================================================
// RULE TRAIT
// =============================================================================

/// An independently authored transformation rule.
///
/// `D` is the caller-chosen calculation-data type threaded through the fold;
/// `P` is the caller's provider bundle, passed by reference to every rule
/// call and never touched by the engine.
///
/// # Contract
///
/// - `run` observes the fully merged output of every higher-priority rule
/// - The returned [`StateUpdate`] replaces slots wholesale; an absent slot
///   leaves the prior value untouched
/// - A rule may suspend (e.g. on external provider lookups); the engine
///   awaits it and does no other work meanwhile
/// - An `Err` aborts the whole run; the engine never retries
///
/// # Extension Point
///
/// This trait is intentionally defined without in-crate implementations.
/// Concrete rules live with the caller.
#[async_trait]
pub trait Rule<D, P>: Send + Sync {
    /// Rule identity, used in error reporting and observation.
    fn name(&self) -> &str;

    /// Execution-order key. Must be unique within one registered set.
    fn priority(&self) -> Priority;

    /// Transform the current state into a partial update.
    async fn run(
        &self,
        state: &CalculationState<D>,
        providers: &P,
    ) -> Result<StateUpdate<D>, RuleError>;
}

// =============================================================================
// STATE UPDATE
// =============================================================================

/// A partial state update returned by one rule invocation.
///
/// Each field mirrors one slot of [`CalculationState`]. A present field
/// replaces its slot wholesale; there is deliberately no deep merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateUpdate<D> {
    /// Replacement for the request slot, if any.
    pub request: Option<CartRequest>,
    /// Replacement for the structure slot, if any.
    pub structure: Option<CartStructure>,
    /// Replacement for the calculation-data slot, if any.
    pub data: Option<D>,
}

impl<D> StateUpdate<D> {
    /// An update that touches nothing.
    #[must_use]
    pub fn none() -> Self {
        Self {
            request: None,
            structure: None,
            data: None,
        }
    }

    /// Replace the request slot.
    #[must_use]
    pub fn with_request(mut self, request: CartRequest) -> Self {
        self.request = Some(request);
        self
    }

    /// Replace the structure slot.
    #[must_use]
    pub fn with_structure(mut self, structure: CartStructure) -> Self {
        self.structure = Some(structure);
        self
    }

    /// Replace the calculation-data slot.
    #[must_use]
    pub fn with_data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }
}

impl<D> Default for StateUpdate<D> {
    fn default() -> Self {
        Self::none()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CartStructure, Currency};

    #[test]
    fn none_touches_nothing() {
        let update: StateUpdate<u32> = StateUpdate::none();
        assert!(update.request.is_none());
        assert!(update.structure.is_none());
        assert!(update.data.is_none());
    }

    #[test]
    fn builders_set_individual_slots() {
        let structure = CartStructure {
            currency: Some(Currency::new("EUR")),
            ..CartStructure::default()
        };
        let update: StateUpdate<u32> = StateUpdate::none().with_structure(structure).with_data(7);
        assert!(update.request.is_none());
        assert!(update.structure.is_some());
        assert_eq!(update.data, Some(7));
    }
}
