//! Benchmarks for tabulated functions and the Hankel transform.
//!
//! Run with: cargo bench -p halox-math

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use halox_math::fftlog::{CorrelationTransform, HankelPlan};
use halox_math::grid::log_space;
use halox_math::interpolation::{Interpolator, LinearInterpolator, LogInterpolator};

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn mass_function_like(m: f64) -> f64 {
    (m / 1e12).powf(-1.9) * (-(m / 1e15)).exp() / 1e12
}

fn spectrum_like(k: f64) -> f64 {
    k / (1.0 + (k / 0.02).powi(2)).powf(1.4)
}

// =============================================================================
// TABLE BENCHMARKS
// =============================================================================

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for thinness in [20_usize, 100, 1000] {
        group.throughput(Throughput::Elements(thinness as u64));
        group.bench_with_input(
            BenchmarkId::new("log", thinness),
            &thinness,
            |b, &thinness| {
                b.iter(|| {
                    LogInterpolator::from_fn(mass_function_like, 1e5, 1e17, black_box(thinness))
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("linear", thinness),
            &thinness,
            |b, &thinness| {
                b.iter(|| {
                    LinearInterpolator::from_fn(|z: f64| 1.0 + z, 0.0, 10.0, black_box(thinness))
                })
            },
        );
    }

    group.finish();
}

fn bench_evaluate_and_integrate(c: &mut Criterion) {
    let table = LogInterpolator::from_fn(mass_function_like, 1e5, 1e17, 100).unwrap();
    let masses = log_space(1000, 1e6, 1e16);

    let mut group = c.benchmark_group("log_table");
    group.throughput(Throughput::Elements(masses.len() as u64));
    group.bench_function("evaluate", |b| {
        b.iter(|| table.evaluate_all(black_box(&masses)))
    });
    group.bench_function("integrate", |b| {
        b.iter(|| table.integrate(black_box(1e5), black_box(1e17)))
    });
    group.finish();
}

fn bench_composition(c: &mut Criterion) {
    let dndm = LogInterpolator::from_fn(mass_function_like, 1e5, 1e17, 100).unwrap();
    let bias = LogInterpolator::from_fn(|m| 1.0 + (m / 1e13).powf(0.4), 1e5, 1e17, 100).unwrap();

    c.bench_function("multiply_then_integrate", |b| {
        b.iter(|| {
            let product = dndm.multiply(black_box(&bias)).unwrap();
            product.integrate(1e5, 1e17)
        })
    });
}

// =============================================================================
// FFTLOG BENCHMARKS
// =============================================================================

fn bench_hankel(c: &mut Criterion) {
    let mut group = c.benchmark_group("fftlog");
    group.sample_size(30);

    for size in [128_usize, 512, 2048] {
        let ks = log_space(size, 1e-4, 1e3);
        let ps: Vec<f64> = ks.iter().map(|&k| spectrum_like(k)).collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("plan", size), &size, |b, &size| {
            b.iter(|| HankelPlan::new(black_box(size), 0.5, 0.02, 1.0, true))
        });
        group.bench_with_input(
            BenchmarkId::new("correlation", size),
            &(ks, ps),
            |b, (ks, ps)| {
                b.iter(|| {
                    let mut transform =
                        CorrelationTransform::new(ks.clone(), ps.clone()).unwrap();
                    transform.transform_at(black_box(&[1.0, 10.0])).unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_evaluate_and_integrate,
    bench_composition,
    bench_hankel
);
criterion_main!(benches);
