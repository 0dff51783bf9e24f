use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use knapq_ir::{Circuit, QubitId};
use std::hint::black_box;

/// Layered RY/RZ + CX circuit, the shape of a hardware-efficient ansatz.
fn layered_circuit(num_qubits: u32, reps: usize) -> Circuit {
    let mut circuit = Circuit::with_size("layered", num_qubits, num_qubits);
    for rep in 0..=reps {
        for q in 0..num_qubits {
            circuit.ry(0.1 * rep as f64, QubitId(q)).unwrap();
            circuit.rz(0.2 * rep as f64, QubitId(q)).unwrap();
        }
        if rep < reps {
            for q in (0..num_qubits.saturating_sub(1)).rev() {
                circuit.cx(QubitId(q), QubitId(q + 1)).unwrap();
            }
        }
    }
    circuit.measure_all().unwrap();
    circuit
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("circuit_build");
    for num_qubits in [4u32, 8, 16] {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_qubits),
            &num_qubits,
            |b, &n| b.iter(|| layered_circuit(black_box(n), 3)),
        );
    }
    group.finish();
}

fn bench_depth(c: &mut Criterion) {
    let circuit = layered_circuit(16, 3);
    c.bench_function("circuit_depth_16q", |b| b.iter(|| black_box(&circuit).depth()));
}

criterion_group!(benches, bench_build, bench_depth);
criterion_main!(benches);
