//! Knapsack benchmark suite: one group per operation, one case per grid point.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use knapq_bench::{HarnessConfig, KnapsackBenchmarks, Operation, parameter_grid};
use knapq_adapter_sim::SimBackend;
use knapq_hal::Backend;
use std::hint::black_box;
use std::sync::Arc;

fn bench_operation(c: &mut Criterion, operation: Operation) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let config = HarnessConfig::default();
    let backend: Arc<dyn Backend> = Arc::new(SimBackend::new());
    let cases =
        KnapsackBenchmarks::measurable_cases(&parameter_grid(), operation, &config, backend);

    let mut group = c.benchmark_group(operation.name());
    group.sample_size(10);
    for bench in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(bench.params()), bench, |b, bench| {
            b.iter(|| {
                bench
                    .run(black_box(operation))
                    .expect("operation failed during measurement")
            })
        });
    }
    group.finish();
}

fn bench_generate_qubo(c: &mut Criterion) {
    bench_operation(c, Operation::GenerateQubo);
}

fn bench_qaoa(c: &mut Criterion) {
    bench_operation(c, Operation::Qaoa);
}

fn bench_vqe(c: &mut Criterion) {
    bench_operation(c, Operation::Vqe);
}

fn bench_grover(c: &mut Criterion) {
    bench_operation(c, Operation::Grover);
}

criterion_group!(
    benches,
    bench_generate_qubo,
    bench_qaoa,
    bench_vqe,
    bench_grover
);
criterion_main!(benches);
