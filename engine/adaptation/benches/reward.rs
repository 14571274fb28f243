//! Reward pipeline benchmarks.
//!
//! Run with: `cargo bench -p adaptation`
//!
//! These benchmarks measure:
//! - Index table lookups (cold row build and warm slot access)
//! - A full reward evaluation for a few representative topologies
//! - The autocorrelation used by the sustained-oscillation gate

use adaptation::oscillation::autocorrelation;
use adaptation::{
    AdaptationEvaluator, AdaptationPipeline, EvaluationContext, OscillationConfig,
    RewardEvaluator, ScoringConfig,
};
use circuit_core::{Grammar, Sign, Topology, TopologyId};
use circuit_dynamics::DynamicsConfig;
use circuit_params::{IndexTable, ParameterSet, SamplingConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_index_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_table");

    group.bench_function("cold_row", |b| {
        b.iter(|| {
            let table = IndexTable::new(1, 10_000, 2024).unwrap();
            black_box(table.slot(TopologyId(0), 0).unwrap())
        })
    });

    let table = IndexTable::new(19_231, 10_000, 2024).unwrap();
    table.row(TopologyId(42)).unwrap();
    group.throughput(Throughput::Elements(1000));
    group.bench_function("warm_slot", |b| {
        b.iter(|| {
            for visit in 0..1000u64 {
                black_box(table.slot(TopologyId(42), visit).unwrap());
            }
        })
    });
    group.finish();
}

fn feedback_adapter() -> (Topology, ParameterSet) {
    let topology = "ABO::AOa_BOi_OBa".parse().unwrap();
    let params = ParameterSet::uniform(3, 1.0, 1.0)
        .with_entry(Sign::Activates, 0, 3, 10.0, 10.0)
        .with_entry(Sign::Inhibits, 0, 3, 0.5, 0.01)
        .with_entry(Sign::Activates, 2, 0, 10.0, 0.1)
        .with_entry(Sign::Inhibits, 2, 1, 10.0, 0.1)
        .with_entry(Sign::Activates, 1, 2, 0.1, 0.001)
        .with_entry(Sign::Inhibits, 1, 3, 0.1, 0.001);
    (topology, params)
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(10);

    let (topology, params) = feedback_adapter();
    let pipeline = AdaptationPipeline::new(
        DynamicsConfig::default(),
        OscillationConfig::default(),
        ScoringConfig::default(),
    );
    group.bench_function("feedback_adapter_full_horizon", |b| {
        b.iter(|| black_box(pipeline.run(&topology, &params).unwrap()))
    });

    let context = EvaluationContext::new(
        Grammar::three_node(),
        &SamplingConfig::for_testing(),
        DynamicsConfig::for_testing(),
        OscillationConfig::default(),
        ScoringConfig::default(),
        2024,
    )
    .unwrap();
    let evaluator = AdaptationEvaluator::new(context);
    for state in ["ABO::AOa", "ABO::AOa_BOi_OBa", "ABO::ABi_BOi_OAi"] {
        group.bench_with_input(BenchmarkId::new("evaluate", state), &state, |b, &state| {
            let mut visit = 0u64;
            b.iter(|| {
                visit += 1;
                black_box(evaluator.evaluate(state, visit).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_autocorrelation(c: &mut Criterion) {
    let mut group = c.benchmark_group("autocorrelation");
    for n in [2_000usize, 20_000] {
        let series: Vec<f64> = (0..n).map(|t| (t as f64 * 0.01).sin()).collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &series, |b, series| {
            b.iter(|| black_box(autocorrelation(series)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_index_table,
    bench_pipeline,
    bench_autocorrelation
);
criterion_main!(benches);
