//! # Pipeline
//!
//! The registrar facade and the executor fold.
//!
//! A [`Pipeline`] holds the active [`RuleSet`] behind a copy-on-write
//! snapshot: `register_rules` swaps in a new set atomically, while every
//! `calculate` invocation clones the `Arc` once up front and folds over
//! that snapshot, so re-registration never disturbs in-flight runs.
//!
//! Execution is strictly sequential in ascending priority order. Each
//! rule's contract assumes it sees the fully merged output of all
//! higher-priority rules, which rules out parallel execution by design.
//! Independent `calculate` invocations may run concurrently; each owns its
//! own [`CalculationState`].

use crate::cancel::CancellationToken;
use crate::completeness::CompletenessPolicy;
use crate::observer::{FoldObserver, NoopObserver};
use crate::registry::RuleSet;
use crate::rule::Rule;
use crate::state::{CalculationState, CompletedCalculation, UpdateSummary};
use crate::types::{CartRequest, Priority, TallyError};
use std::sync::{Arc, PoisonError, RwLock};

// =============================================================================
// PIPELINE
// =============================================================================

/// A priority-ordered, sequential rule pipeline.
///
/// `D` is the caller-chosen calculation-data type; `P` the provider bundle
/// handed by reference to every rule.
pub struct Pipeline<D, P> {
    rules: RwLock<Arc<RuleSet<D, P>>>,
    policy: CompletenessPolicy,
    observer: Arc<dyn FoldObserver>,
}

impl<D, P> Default for Pipeline<D, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, P> Pipeline<D, P> {
    /// A pipeline with no rules, the full completeness contract and no
    /// observation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(Arc::new(RuleSet::empty())),
            policy: CompletenessPolicy::new(),
            observer: Arc::new(NoopObserver),
        }
    }

    /// Replace the completeness contract.
    #[must_use]
    pub fn with_policy(mut self, policy: CompletenessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Install a fold observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn FoldObserver>) -> Self {
        self.observer = observer;
        self
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Register a rule set, replacing any previously registered one.
    ///
    /// Rules are sorted ascending by priority; a duplicate priority fails
    /// with [`TallyError::DuplicatePriority`] and leaves the previous set
    /// untouched (nothing partial is ever stored). An empty sequence is
    /// accepted here and only rejected at `calculate` time.
    ///
    /// In-flight calculations keep the snapshot they started with.
    pub fn register_rules(&self, rules: Vec<Box<dyn Rule<D, P>>>) -> Result<(), TallyError> {
        let set = Arc::new(RuleSet::new(rules)?);
        let mut guard = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        *guard = set;
        Ok(())
    }

    /// Name and priority of every registered rule, in execution order.
    #[must_use]
    pub fn rule_order(&self) -> Vec<(String, Priority)> {
        self.snapshot().order()
    }

    fn snapshot(&self) -> Arc<RuleSet<D, P>> {
        Arc::clone(&self.rules.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl<D, P> Pipeline<D, P>
where
    D: Default + Send + Sync,
    P: Send + Sync,
{
    // =========================================================================
    // EXECUTION
    // =========================================================================

    /// Fold the request through every registered rule and validate the
    /// result.
    ///
    /// Fails with [`TallyError::EmptyPipeline`] when no rules are
    /// registered, with [`TallyError::Rule`] on the first rule failure
    /// (later rules never run), and with [`TallyError::Incomplete`] when
    /// the final structure misses the completeness contract.
    pub async fn calculate(
        &self,
        request: CartRequest,
        providers: &P,
    ) -> Result<CompletedCalculation<D>, TallyError> {
        self.calculate_cancellable(request, providers, &CancellationToken::new())
            .await
    }

    /// Like [`calculate`](Pipeline::calculate), but checks `token` before
    /// every rule step and aborts with [`TallyError::Cancelled`] once it
    /// is tripped. A cancelled run never yields partial state.
    pub async fn calculate_cancellable(
        &self,
        request: CartRequest,
        providers: &P,
        token: &CancellationToken,
    ) -> Result<CompletedCalculation<D>, TallyError> {
        let rules = self.snapshot();
        match self.fold(&rules, request, providers, token).await {
            Ok(completed) => {
                self.observer.on_pipeline_complete();
                Ok(completed)
            }
            Err(error) => {
                self.observer.on_pipeline_failed(&error);
                Err(error)
            }
        }
    }

    async fn fold(
        &self,
        rules: &RuleSet<D, P>,
        request: CartRequest,
        providers: &P,
        token: &CancellationToken,
    ) -> Result<CompletedCalculation<D>, TallyError> {
        if rules.is_empty() {
            return Err(TallyError::EmptyPipeline);
        }

        self.observer.on_pipeline_start(rules.len());

        let mut state = CalculationState::new(request);
        for rule in rules.iter() {
            if token.is_cancelled() {
                return Err(TallyError::Cancelled);
            }

            let update = rule
                .run(&state, providers)
                .await
                .map_err(|source| TallyError::Rule {
                    rule: rule.name().to_string(),
                    source,
                })?;

            let summary = UpdateSummary::of(&update);
            state = state.apply(update);
            self.observer.on_rule_applied(rule.name(), rule.priority(), summary);
        }

        self.policy.validate(&state.structure)?;
        Ok(CompletedCalculation::from_state(state))
    }
}

impl<D, P> std::fmt::Debug for Pipeline<D, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("rules", &self.rule_order())
            .field("policy", &self.policy)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{RuleError, StateUpdate};
    use async_trait::async_trait;

    /// Appends its own name to the data slot, proving order and threading.
    struct TraceRule {
        name: &'static str,
        priority: i32,
    }

    #[async_trait]
    impl Rule<Vec<String>, ()> for TraceRule {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> Priority {
            Priority::new(self.priority)
        }

        async fn run(
            &self,
            state: &CalculationState<Vec<String>>,
            _providers: &(),
        ) -> Result<StateUpdate<Vec<String>>, RuleError> {
            let mut trace = state.data.clone();
            trace.push(self.name.to_string());
            Ok(StateUpdate::none().with_data(trace))
        }
    }

    fn trace_rule(name: &'static str, priority: i32) -> Box<dyn Rule<Vec<String>, ()>> {
        Box::new(TraceRule { name, priority })
    }

    fn relaxed_pipeline() -> Pipeline<Vec<String>, ()> {
        Pipeline::new().with_policy(
            CompletenessPolicy::new()
                .allow_missing_currency()
                .allow_empty_cart()
                .allow_missing_totals(),
        )
    }

    #[tokio::test]
    async fn empty_pipeline_rejected() {
        let pipeline: Pipeline<Vec<String>, ()> = relaxed_pipeline();
        let result = pipeline.calculate(CartRequest::new("c1"), &()).await;
        assert!(matches!(result, Err(TallyError::EmptyPipeline)));
    }

    #[tokio::test]
    async fn rules_run_in_priority_order_not_input_order() {
        let pipeline = relaxed_pipeline();
        pipeline
            .register_rules(vec![
                trace_rule("late", 20),
                trace_rule("early", 10),
                trace_rule("mid", 15),
            ])
            .expect("register");

        let completed = pipeline
            .calculate(CartRequest::new("c1"), &())
            .await
            .expect("calculate");

        assert_eq!(completed.data, vec!["early", "mid", "late"]);
    }

    #[tokio::test]
    async fn registration_replaces_previous_set() {
        let pipeline = relaxed_pipeline();
        pipeline
            .register_rules(vec![trace_rule("old", 1)])
            .expect("register");
        pipeline
            .register_rules(vec![trace_rule("new", 1)])
            .expect("register");

        let completed = pipeline
            .calculate(CartRequest::new("c1"), &())
            .await
            .expect("calculate");

        assert_eq!(completed.data, vec!["new"]);
    }

    #[tokio::test]
    async fn failed_registration_keeps_previous_set() {
        let pipeline = relaxed_pipeline();
        pipeline
            .register_rules(vec![trace_rule("kept", 1)])
            .expect("register");

        let result = pipeline.register_rules(vec![trace_rule("a", 2), trace_rule("b", 2)]);
        assert!(matches!(result, Err(TallyError::DuplicatePriority { .. })));

        let completed = pipeline
            .calculate(CartRequest::new("c1"), &())
            .await
            .expect("calculate");
        assert_eq!(completed.data, vec!["kept"]);
    }

    #[tokio::test]
    async fn pre_cancelled_token_runs_no_rule() {
        let pipeline = relaxed_pipeline();
        pipeline
            .register_rules(vec![trace_rule("only", 1)])
            .expect("register");

        let token = CancellationToken::new();
        token.cancel();

        let result = pipeline
            .calculate_cancellable(CartRequest::new("c1"), &(), &token)
            .await;
        assert!(matches!(result, Err(TallyError::Cancelled)));
    }
}
