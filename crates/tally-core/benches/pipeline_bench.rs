//! # Pipeline Benchmarks
//!
//! Performance benchmarks for the fold loop.
//!
//! Run with: `cargo bench -p tally-core`

use async_trait::async_trait;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tally_core::{
    CalculationState, CartRequest, CompletenessPolicy, Pipeline, Priority, Rule, RuleError,
    StateUpdate,
};

/// Increments the data slot by one; the cheapest possible rule.
struct CountRule {
    priority: i32,
}

#[async_trait]
impl Rule<u64, ()> for CountRule {
    fn name(&self) -> &str {
        "count"
    }

    fn priority(&self) -> Priority {
        Priority::new(self.priority)
    }

    async fn run(
        &self,
        state: &CalculationState<u64>,
        _providers: &(),
    ) -> Result<StateUpdate<u64>, RuleError> {
        Ok(StateUpdate::none().with_data(state.data.saturating_add(1)))
    }
}

/// Build a pipeline with `size` counting rules and a fully relaxed contract.
fn counting_pipeline(size: i32) -> Pipeline<u64, ()> {
    let pipeline = Pipeline::new().with_policy(
        CompletenessPolicy::new()
            .allow_missing_currency()
            .allow_empty_cart()
            .allow_missing_totals(),
    );
    let rules = (0..size)
        .map(|priority| Box::new(CountRule { priority }) as Box<dyn Rule<u64, ()>>)
        .collect();
    pipeline.register_rules(rules).expect("distinct priorities");
    pipeline
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_fold(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let mut group = c.benchmark_group("fold");

    for size in [4, 16, 64].iter() {
        let pipeline = counting_pipeline(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let completed = runtime
                    .block_on(pipeline.calculate(CartRequest::new("bench"), &()))
                    .expect("calculate");
                black_box(completed.data)
            });
        });
    }

    group.finish();
}

fn bench_registration(c: &mut Criterion) {
    c.bench_function("register_64_rules", |b| {
        b.iter(|| black_box(counting_pipeline(64)));
    });
}

criterion_group!(benches, bench_fold, bench_registration);
criterion_main!(benches);
