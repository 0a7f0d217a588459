use automata_minimizer::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const SIZES: [usize; 3] = [100, 1_000, 10_000];

fn complete_dfas(c: &mut Criterion) {
    fastrand::seed(42);
    let mut group = c.benchmark_group("minimize_dfa");
    for size in SIZES {
        let dfa = random::generate_random_dfa(size, &['a', 'b', 'c']);
        group.bench_with_input(BenchmarkId::from_parameter(size), &dfa, |b, dfa| {
            b.iter(|| black_box(dfa.ts().minimize().size()))
        });
    }
    group.finish();
}

fn partial_dfas(c: &mut Criterion) {
    fastrand::seed(42);
    let mut group = c.benchmark_group("minimize_partial_dfa");
    for size in SIZES {
        let dfa = random::generate_random_partial_dfa(size, &['a', 'b', 'c'], 0.25);
        group.bench_with_input(BenchmarkId::from_parameter(size), &dfa, |b, dfa| {
            b.iter(|| black_box(dfa.ts().minimize().size()))
        });
    }
    group.finish();
}

fn reused_workspace(c: &mut Criterion) {
    fastrand::seed(42);
    let dfa = random::generate_random_dfa(1_000, &['a', 'b']);
    let mut minimizer = Minimizer::new();
    c.bench_function("minimize_reused_workspace", |b| {
        b.iter(|| {
            black_box(
                minimizer
                    .minimize(dfa.ts(), |q| dfa.ts().state_color(q))
                    .size(),
            )
        })
    });
}

criterion_group!(benches, complete_dfas, partial_dfas, reused_workspace);
criterion_main!(benches);
