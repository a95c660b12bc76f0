//! Criterion benchmarks for the LHP tranche model.
//!
//! Measures the scalar kernels on the reference portfolio and the batch
//! evaluator on tranche strips and loss grids of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lhp_models::copula::{
    exp_min_lk, lhp_analytical_density, portfolio_cdf_lhp, tr_surv_prob_lhp, GaussianCopulaLhp,
    TrancheBatch,
};

const NUM_CREDITS: usize = 125;

/// Benchmark the scalar kernels.
fn bench_scalar_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("lhp_scalar");
    let survs = vec![0.98; NUM_CREDITS];
    let recs = vec![0.4; NUM_CREDITS];

    group.bench_function("exp_min_lk", |b| {
        b.iter(|| exp_min_lk(black_box(0.03), 0.02, 0.4, 1.0, black_box(0.3)))
    });

    group.bench_function("tr_surv_prob_lhp", |b| {
        b.iter(|| {
            tr_surv_prob_lhp(
                black_box(0.03),
                black_box(0.07),
                NUM_CREDITS,
                &survs,
                &recs,
                0.3,
            )
        })
    });

    group.bench_function("portfolio_cdf_lhp", |b| {
        b.iter(|| portfolio_cdf_lhp(black_box(0.03), NUM_CREDITS, &survs, &recs, 0.3, 0))
    });

    group.bench_function("lhp_analytical_density", |b| {
        b.iter(|| lhp_analytical_density(black_box(0.03), 0.02, 0.4, 0.3))
    });

    group.finish();
}

/// Benchmark batch evaluation across grid sizes.
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("lhp_batch");
    let batch = TrancheBatch::new(
        GaussianCopulaLhp::reference(),
        NUM_CREDITS,
        &vec![0.98; NUM_CREDITS],
        &vec![0.4; NUM_CREDITS],
        0.3,
    )
    .unwrap();

    for size in [10, 100, 1000] {
        let width = 0.6 / size as f64;
        let tranches: Vec<(f64, f64)> = (0..size)
            .map(|i| (i as f64 * width, (i + 1) as f64 * width))
            .collect();
        let ks: Vec<f64> = (1..=size).map(|i| i as f64 * width).collect();

        group.bench_with_input(
            BenchmarkId::new("tranche_strip", size),
            &tranches,
            |b, tranches| b.iter(|| batch.tranche_survivals(black_box(tranches))),
        );

        group.bench_with_input(BenchmarkId::new("loss_cdf_grid", size), &ks, |b, ks| {
            b.iter(|| batch.loss_cdf_grid(black_box(ks)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scalar_kernels, bench_batch);
criterion_main!(benches);
