// Criterion benchmarks for cfpq-tensor.
//
// Graphs are generated in memory: bidirected a/b bamboos (a path whose edges
// are each paired with a reverse edge under the other label) of increasing
// length, solved against the Dyck and matching-pairs grammars.
//
// Run:
//   cargo bench -p cfpq-tensor

use std::hint::black_box;

use cfpq_core::graph::LabelGraph;
use cfpq_rsm::RecursiveStateMachine;
use cfpq_tensor::{SeedOrder, SolverConfig, TensorSolver};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

const MATCHING_PAIRS: &str = "a b\nS\n4\n0 1 2 3\n0\n3\n4\n0 1 a\n1 2 S\n1 3 b\n2 3 b\n";
const DYCK: &str = "a b\nS\n5\n0 1 2 3 4\n0\n4\n5\n0 1 a\n1 2 S\n2 3 b\n3 4 S\n0 4 eps\n";

// ---------------------------------------------------------------------------
// Graph generation
// ---------------------------------------------------------------------------

/// `length` edges alternating `a` and `b`, each with its reverse.
fn alternating_bamboo(length: usize) -> LabelGraph {
    let mut graph = LabelGraph::new(length + 1);
    for u in 0..length {
        let (forward, backward) = if u % 2 == 0 { ("a", "b") } else { ("b", "a") };
        graph.set(forward, u, u + 1);
        graph.set(backward, u + 1, u);
    }
    graph
}

/// `a^half b^half`, each edge with its reverse.
fn balanced_bamboo(half: usize) -> LabelGraph {
    let mut graph = LabelGraph::new(2 * half + 1);
    for u in 0..2 * half {
        let (forward, backward) = if u < half { ("a", "b") } else { ("b", "a") };
        graph.set(forward, u, u + 1);
        graph.set(backward, u + 1, u);
    }
    graph
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_dyck(c: &mut Criterion) {
    let rsm = RecursiveStateMachine::parse(DYCK).expect("dyck grammar");
    let mut group = c.benchmark_group("dyck_alternating_bamboo");
    for length in [16, 64, 256] {
        let solver = TensorSolver::new(alternating_bamboo(length), rsm.clone());
        group.bench_with_input(BenchmarkId::from_parameter(length), &solver, |b, solver| {
            b.iter(|| black_box(solver.solve()))
        });
    }
    group.finish();
}

fn bench_matching_pairs(c: &mut Criterion) {
    let rsm = RecursiveStateMachine::parse(MATCHING_PAIRS).expect("matching pairs grammar");
    let mut group = c.benchmark_group("matching_pairs_balanced_bamboo");
    for half in [8, 32, 128] {
        let solver = TensorSolver::new(balanced_bamboo(half), rsm.clone());
        group.bench_with_input(BenchmarkId::from_parameter(half), &solver, |b, solver| {
            b.iter(|| black_box(solver.solve()))
        });
    }
    group.finish();
}

fn bench_seed_order(c: &mut Criterion) {
    let rsm = RecursiveStateMachine::parse(DYCK).expect("dyck grammar");
    let graph = alternating_bamboo(128);
    let forward = TensorSolver::new(graph.clone(), rsm.clone());
    let reversed = TensorSolver::new(graph, rsm)
        .with_config(SolverConfig::default().with_seed_order(SeedOrder::Reversed));

    c.bench_function("seed_order_forward", |b| b.iter(|| black_box(forward.solve())));
    c.bench_function("seed_order_reversed", |b| b.iter(|| black_box(reversed.solve())));
}

criterion_group!(benches, bench_dyck, bench_matching_pairs, bench_seed_order);
criterion_main!(benches);
