//! # Fold Observer
//!
//! Injectable observation of a pipeline run, invoked once per fold step.
//! This replaces process-wide logging inside the engine: the core emits no
//! log records of its own, and the app layer bridges these callbacks into
//! whatever logging it runs.
//!
//! [`RecordingObserver`] additionally gives callers a per-step event list
//! for debugging a rule configuration.

use crate::state::UpdateSummary;
use crate::types::{Priority, TallyError};
use std::sync::{Mutex, PoisonError};

// =============================================================================
// OBSERVER TRAIT
// =============================================================================

/// Callbacks fired by the executor during one `calculate` invocation.
///
/// All methods default to no-ops; implement only what you need. Callbacks
/// run inline on the fold path, so they should stay cheap.
pub trait FoldObserver: Send + Sync {
    /// The fold is about to start over `rule_count` rules.
    fn on_pipeline_start(&self, rule_count: usize) {
        let _ = rule_count;
    }

    /// One rule ran and its update was merged into the state.
    fn on_rule_applied(&self, rule: &str, priority: Priority, summary: UpdateSummary) {
        let _ = (rule, priority, summary);
    }

    /// The final structure passed the completeness contract.
    fn on_pipeline_complete(&self) {}

    /// The run ended in an error (rule failure, incompleteness,
    /// cancellation, or an empty pipeline).
    fn on_pipeline_failed(&self, error: &TallyError) {
        let _ = error;
    }
}

/// Observer that ignores everything. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FoldObserver for NoopObserver {}

// =============================================================================
// RECORDING OBSERVER
// =============================================================================

/// One recorded pipeline event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoldEvent {
    /// The fold started.
    Started {
        /// Number of rules in the snapshot.
        rule_count: usize,
    },
    /// A rule ran and was merged.
    RuleApplied {
        /// The rule's name.
        rule: String,
        /// The rule's priority.
        priority: Priority,
        /// Which slots the rule replaced.
        summary: UpdateSummary,
    },
    /// The run completed successfully.
    Completed,
    /// The run failed; the rendered error message.
    Failed(String),
}

/// Observer that records every event, in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<FoldEvent>>,
}

impl RecordingObserver {
    /// A fresh recorder with no events.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<FoldEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, event: FoldEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl FoldObserver for RecordingObserver {
    fn on_pipeline_start(&self, rule_count: usize) {
        self.push(FoldEvent::Started { rule_count });
    }

    fn on_rule_applied(&self, rule: &str, priority: Priority, summary: UpdateSummary) {
        self.push(FoldEvent::RuleApplied {
            rule: rule.to_string(),
            priority,
            summary,
        });
    }

    fn on_pipeline_complete(&self) {
        self.push(FoldEvent::Completed);
    }

    fn on_pipeline_failed(&self, error: &TallyError) {
        self.push(FoldEvent::Failed(error.to_string()));
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_event_order() {
        let recorder = RecordingObserver::new();
        recorder.on_pipeline_start(2);
        recorder.on_rule_applied("catalog", Priority::new(10), UpdateSummary::default());
        recorder.on_pipeline_complete();

        let events = recorder.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], FoldEvent::Started { rule_count: 2 });
        assert!(matches!(events[1], FoldEvent::RuleApplied { .. }));
        assert_eq!(events[2], FoldEvent::Completed);
    }

    #[test]
    fn failure_renders_error() {
        let recorder = RecordingObserver::new();
        recorder.on_pipeline_failed(&TallyError::EmptyPipeline);
        assert_eq!(
            recorder.events(),
            vec![FoldEvent::Failed("no rules registered".to_string())]
        );
    }
}
