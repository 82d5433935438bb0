//! Benchmarks for the halo-model pipeline.
//!
//! Run with: cargo bench -p halox-model

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use halox_cosmology::{CosmologicalParameters, Cosmology};
use halox_math::grid::log_space;
use halox_model::prelude::*;

fn cosmology() -> Arc<Cosmology> {
    let k = log_space(200, 1e-4, 1e4);
    let pk = k
        .iter()
        .map(|&k| k / (1.0 + (k / 0.02).powi(2)).powi(2))
        .collect();
    Arc::new(
        Cosmology::builder(CosmologicalParameters::default(), k, pk)
            .build()
            .expect("cosmology"),
    )
}

fn bench_construction(c: &mut Criterion) {
    let cosmo = cosmology();
    let hod = OccupationParameters::default().build();
    let mut group = c.benchmark_group("halo_model_new");
    group.sample_size(10);

    for thinness in [20_usize, 50] {
        group.bench_with_input(
            BenchmarkId::from_parameter(thinness),
            &thinness,
            |b, &thinness| {
                b.iter(|| HaloModel::new(hod.clone(), cosmo.clone(), 1.0, black_box(thinness)))
            },
        );
    }
    group.finish();
}

fn bench_spectra(c: &mut Criterion) {
    let model = HaloModel::new(OccupationParameters::default().build(), cosmology(), 1.0, 50)
        .expect("model");
    let radii = log_space(30, 0.1, 50.0);
    let mut group = c.benchmark_group("halo_model");

    group.bench_function("set_occupation", |b| {
        let mut model = model.clone();
        let hod = OccupationParameters::default().build();
        b.iter(|| model.set_occupation(hod.clone()))
    });
    group.bench_function("power_spectrum_total", |b| {
        b.iter(|| model.power_spectrum(black_box(Component::Total)))
    });
    group.bench_function("correlation_function", |b| {
        b.iter(|| model.correlation_function(Component::Total, black_box(&radii)))
    });
    group.finish();
}

criterion_group!(benches, bench_construction, bench_spectra);
criterion_main!(benches);
