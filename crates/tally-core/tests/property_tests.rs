//! # Property-Based Tests
//!
//! Registration and merge invariants checked over generated inputs:
//! - Pairwise-distinct priorities always register, in ascending order
//! - Any duplicate pair is rejected wherever it sits in the input
//! - State merging is slot-wise wholesale replacement

use async_trait::async_trait;
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use tally_core::{
    CalculationState, CartRequest, CartStructure, Currency, Priority, Rule, RuleError, RuleSet,
    StateUpdate, TallyError,
};

// =============================================================================
// TEST RULE
// =============================================================================

struct InertRule {
    name: String,
    priority: i32,
}

#[async_trait]
impl Rule<(), ()> for InertRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> Priority {
        Priority::new(self.priority)
    }

    async fn run(
        &self,
        _state: &CalculationState<()>,
        _providers: &(),
    ) -> Result<StateUpdate<()>, RuleError> {
        Ok(StateUpdate::none())
    }
}

fn rules_from(priorities: &[i32]) -> Vec<Box<dyn Rule<(), ()>>> {
    priorities
        .iter()
        .map(|&priority| {
            Box::new(InertRule {
                name: format!("rule-{priority}"),
                priority,
            }) as Box<dyn Rule<(), ()>>
        })
        .collect()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Distinct priorities always register, and the stored order is the
    /// ascending priority order regardless of input order.
    #[test]
    fn distinct_priorities_register_in_ascending_order(
        priorities in btree_set(any::<i32>(), 1..40)
    ) {
        let mut input: Vec<i32> = priorities.iter().copied().collect();
        input.reverse();

        let set = RuleSet::new(rules_from(&input)).expect("distinct priorities");

        let stored: Vec<i32> = set.order().iter().map(|(_, p)| p.value()).collect();
        let expected: Vec<i32> = priorities.into_iter().collect();
        prop_assert_eq!(stored, expected);
    }

    /// Duplicating any element of the input makes registration fail with
    /// DuplicatePriority, no matter where the duplicate lands.
    #[test]
    fn any_duplicate_pair_is_rejected(
        base in vec(-1000i32..1000, 1..30),
        pick in any::<proptest::sample::Index>()
    ) {
        let mut input = base.clone();
        input.push(base[pick.index(base.len())]);

        let result = RuleSet::new(rules_from(&input));
        let is_duplicate = matches!(result, Err(TallyError::DuplicatePriority { .. }));
        prop_assert!(is_duplicate);
    }

    /// Merging is slot-wise: a present slot replaces wholesale, an absent
    /// slot keeps the prior value.
    #[test]
    fn merge_replaces_exactly_the_present_slots(
        replace_request in any::<bool>(),
        replace_structure in any::<bool>(),
        replace_data in any::<bool>(),
        new_data in any::<u32>()
    ) {
        let initial = CalculationState::<u32>::new(CartRequest::new("before"));

        let mut update = StateUpdate::none();
        if replace_request {
            update = update.with_request(CartRequest::new("after"));
        }
        if replace_structure {
            update = update.with_structure(CartStructure {
                currency: Some(Currency::new("EUR")),
                ..CartStructure::default()
            });
        }
        if replace_data {
            update = update.with_data(new_data);
        }

        let merged = initial.apply(update);

        prop_assert_eq!(
            merged.request.cart_id,
            if replace_request { "after" } else { "before" }
        );
        prop_assert_eq!(merged.structure.currency.is_some(), replace_structure);
        prop_assert_eq!(merged.data, if replace_data { new_data } else { 0 });
    }
}
