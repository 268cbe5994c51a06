//! # Rule Set
//!
//! The ordered, validated collection of rules a pipeline executes. Building
//! a `RuleSet` is the registration step: sort ascending by priority, then
//! reject any duplicate priority pair.
//!
//! Duplicate detection scans adjacent pairs of the *sorted* sequence, which
//! catches all duplicate pairs regardless of where they sat in the input,
//! because sorting groups equal keys together. The scan covers every
//! adjacent pair including the final one.

use crate::rule::Rule;
use crate::types::{Priority, TallyError};

/// An immutable, priority-ordered set of rules.
///
/// Once built, the set never changes; the pipeline swaps whole sets on
/// re-registration and in-flight runs keep the snapshot they started with.
pub struct RuleSet<D, P> {
    rules: Vec<Box<dyn Rule<D, P>>>,
}

impl<D, P> RuleSet<D, P> {
    /// A set with no rules. Valid to hold, invalid to execute.
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Sort and validate a sequence of rules.
    ///
    /// The sort is stable, so when duplicates collide the error names the
    /// first colliding pair in input order.
    pub fn new(mut rules: Vec<Box<dyn Rule<D, P>>>) -> Result<Self, TallyError> {
        rules.sort_by_key(|rule| rule.priority());

        for pair in rules.windows(2) {
            if pair[0].priority() == pair[1].priority() {
                return Err(TallyError::DuplicatePriority {
                    priority: pair[0].priority(),
                    first: pair[0].name().to_string(),
                    second: pair[1].name().to_string(),
                });
            }
        }

        Ok(Self { rules })
    }

    /// Number of rules in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check whether the set holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate rules in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule<D, P>> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Name and priority of every rule, in execution order.
    #[must_use]
    pub fn order(&self) -> Vec<(String, Priority)> {
        self.rules
            .iter()
            .map(|rule| (rule.name().to_string(), rule.priority()))
            .collect()
    }
}

impl<D, P> std::fmt::Debug for RuleSet<D, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet").field("order", &self.order()).finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
