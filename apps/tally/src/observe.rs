//! # Tracing Observer
//!
//! Bridges the engine's fold events into the app's tracing output. The
//! engine itself never logs; this is where its observer seam meets the
//! binary's logging stack.

use tally_core::{FoldObserver, Priority, TallyError, UpdateSummary};

/// Emits one structured tracing event per fold callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FoldObserver for TracingObserver {
    fn on_pipeline_start(&self, rule_count: usize) {
        tracing::info!(rule_count, "pipeline.start");
    }

    fn on_rule_applied(&self, rule: &str, priority: Priority, summary: UpdateSummary) {
        tracing::info!(
            rule,
            priority = priority.value(),
            request = summary.request_replaced,
            structure = summary.structure_replaced,
            data = summary.data_replaced,
            "pipeline.rule_applied"
        );
    }

    fn on_pipeline_complete(&self) {
        tracing::info!("pipeline.complete");
    }

    fn on_pipeline_failed(&self, error: &TallyError) {
        tracing::warn!(%error, "pipeline.failed");
    }
}
