//! Criterion micro-benchmarks for flux and Jacobian assembly.

use std::hint::black_box;

use clusterkin_bench::{reference_evaluator, seeded_state};
use clusterkin_core::NullSink;
use criterion::{criterion_group, criterion_main, Criterion};

/// Benchmark: whole-grid flux on 64 nodes.
fn bench_flux(c: &mut Criterion) {
    let mut eval = reference_evaluator(32, 16);
    let state = seeded_state(&eval, 42);
    let mut out = vec![0.0; state.as_slice().len()];

    c.bench_function("flux_hev_32x16_64nodes", |b| {
        b.iter(|| {
            eval.evaluate_all_flux(black_box(&state), &mut out).unwrap();
            black_box(&out);
        });
    });
}

/// Benchmark: whole-grid Jacobian triplets on 64 nodes.
fn bench_jacobian(c: &mut Criterion) {
    let mut eval = reference_evaluator(32, 16);
    let state = seeded_state(&eval, 42);

    c.bench_function("jacobian_hev_32x16_64nodes", |b| {
        b.iter(|| {
            let entries = eval.evaluate_all_jacobian(black_box(&state)).unwrap();
            black_box(entries.len());
        });
    });
}

/// Benchmark: rate refresh after every temperature moved by 1 K.
fn bench_temperature_update(c: &mut Criterion) {
    let mut eval = reference_evaluator(32, 16);
    let mut state = seeded_state(&eval, 7);
    let t = eval.connectivity().temperature_index().unwrap();
    let mut bump = 0.0;

    c.bench_function("rate_refresh_hev_32x16_64nodes", |b| {
        b.iter(|| {
            bump += 1.0;
            state.fill_dof(t, 1000.0 + bump);
            let n = eval.update_temperatures(&state, 1.0, &NullSink).unwrap();
            black_box(n);
        });
    });
}

criterion_group!(benches, bench_flux, bench_jacobian, bench_temperature_update);
criterion_main!(benches);
