//! # tally-core
//!
//! The priority-ordered rule-pipeline engine for Tally - THE LOGIC.
//!
//! This crate computes a derived result (a cart total and structure) by
//! folding an initial request through an ordered list of independently
//! authored transformation rules. It owns ordering guarantees, conflict
//! detection, the incremental state-merging semantics, and the
//! post-pipeline completeness invariant — and nothing else.
//!
//! ## Control Flow
//!
//! ```text
//! register_rules(rules)        sort by priority, reject duplicates
//!         |
//! calculate(request, providers)
//!         |
//!   Idle -> Running(rule_1) -> ... -> Running(rule_n) -> Validating
//!                                                            |
//!                                           Complete | Failed (all-or-nothing)
//! ```
//!
//! Each rule receives the fully merged output of every higher-priority rule
//! and returns a partial update; slots are replaced wholesale, never
//! deep-merged. Rules execute sequentially by design — their contract is
//! incompatible with parallel execution.
//!
//! ## Architectural Constraints
//!
//! The engine:
//! - Implements no rules itself; the [`Rule`] trait is the single seam
//! - Performs no I/O and holds no state across `calculate` invocations
//! - Uses integer money only (minor units); no floating-point anywhere
//! - Emits no log records; observation is injected via [`FoldObserver`]

// =============================================================================
// MODULES
// =============================================================================

pub mod cancel;
pub mod completeness;
pub mod observer;
pub mod pipeline;
pub mod registry;
pub mod rule;
pub mod state;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    CartRequest, CartStructure, Currency, LineItem, Money, Priority, RequestedItem, Sku,
    TallyError, Totals,
};

// =============================================================================
// RE-EXPORTS: Pipeline Engine
// =============================================================================

pub use cancel::CancellationToken;
pub use completeness::{CompletenessPolicy, CompletenessViolation};
pub use observer::{FoldEvent, FoldObserver, NoopObserver, RecordingObserver};
pub use pipeline::Pipeline;
pub use registry::RuleSet;
pub use rule::{Rule, RuleError, StateUpdate};
pub use state::{CalculationState, CompletedCalculation, UpdateSummary};
