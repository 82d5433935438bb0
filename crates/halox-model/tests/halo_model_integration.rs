//! Integration test: run the halo-model pipelines end to end on the default
//! flat ΛCDM cosmology with a smooth seed spectrum.

use std::sync::Arc;

use approx::assert_relative_eq;
use halox_cosmology::prelude::*;
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
            .with_thinness(200)
            .build()
            .unwrap(),
    )
}

fn threshold_hod() -> Arc<dyn OccupationModel> {
    OccupationParameters::from_values(OccupationKind::Harikane16, &[0.5, 1e11, 1.0, 1e11, 1e11, 1.0])
        .unwrap()
        .build()
}

#[test]
fn test_reference_occupation_values() {
    let hod = threshold_hod();
    assert_relative_eq!(hod.mean_central(1e12), 0.9213503964748575, max_relative = 1e-14);
    assert_relative_eq!(hod.mean_satellite(1e12), 8.2921535682737169, max_relative = 1e-14);
}

#[test]
fn test_mean_density_positive_for_any_threshold_in_range() {
    let cosmo = cosmology();
    let mut model = HaloModel::new(threshold_hod(), cosmo, 0.5, 30).unwrap();
    for m_min in [1e9, 1e11, 1e13] {
        model
            .set_occupation(Arc::new(Harikane16::new(0.5, m_min, 0.5, m_min, 10.0 * m_min, 1.0)))
            .unwrap();
        let ng = model.mean_galaxy_density().unwrap();
        assert!(ng > 0.0, "n_g = {ng} for M_min = {m_min:e}");
    }
}

#[test]
fn test_denser_populations_are_less_biased() {
    let cosmo = cosmology();
    let faint = HaloModel::new(
        Arc::new(Harikane16::new(0.5, 1e10, 0.5, 1e10, 1e11, 1.0)),
        cosmo.clone(),
        1.0,
        30,
    )
    .unwrap();
    let bright = HaloModel::new(
        Arc::new(Harikane16::new(0.5, 1e13, 0.5, 1e13, 1e14, 1.0)),
        cosmo,
        1.0,
        30,
    )
    .unwrap();

    assert!(faint.mean_galaxy_density().unwrap() > bright.mean_galaxy_density().unwrap());
    assert!(faint.bias().unwrap() < bright.bias().unwrap());
    assert!(faint.mean_halo_mass().unwrap() < bright.mean_halo_mass().unwrap());
}

#[test]
fn test_total_spectrum_is_exact_sum() {
    let model = HaloModel::new(threshold_hod(), cosmology(), 1.0, 30).unwrap();
    let total = model.power_spectrum(Component::Total).unwrap();
    let one = model.power_spectrum(Component::OneHalo).unwrap();
    let two = model.power_spectrum(Component::TwoHalo).unwrap();
    assert_eq!(total.len(), 30);
    for i in 0..30 {
        assert_eq!(total[i], one[i] + two[i]);
        assert!(total[i].is_finite());
    }
}

#[test]
fn test_spectra_are_repeatable() {
    let model = HaloModel::new(threshold_hod(), cosmology(), 1.0, 30).unwrap();
    let first = model.power_spectrum_total().unwrap();
    let second = model.power_spectrum_total().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_wavenumber_grid() {
    let model = HaloModel::new(threshold_hod(), cosmology(), 1.0, 30).unwrap();
    let k = model.wavenumbers();
    assert_eq!(k.len(), 30);
    assert_relative_eq!(k[0], 1e-3, max_relative = 1e-12);
    assert_relative_eq!(k[29], 1e3, max_relative = 1e-12);
}

#[test]
fn test_cross_model_with_itself() {
    let cosmo = cosmology();
    let cross = CrossHaloModel::new(threshold_hod(), threshold_hod(), cosmo.clone(), 1.0, 30).unwrap();
    let auto = HaloModel::new(threshold_hod(), cosmo, 1.0, 30).unwrap();

    assert_relative_eq!(
        cross.mean_galaxy_density_1().unwrap(),
        auto.mean_galaxy_density().unwrap(),
        max_relative = 1e-12
    );
    assert_eq!(
        cross.mean_galaxy_density_1().unwrap(),
        cross.mean_galaxy_density_2().unwrap()
    );

    let theta = log_space(6, 1e-4, 1e-2);
    let w = cross.angular_correlation(Component::TwoHalo, &theta).unwrap();
    assert_eq!(w.len(), 6);
    assert!(w.iter().all(|v| v.is_finite()));
}

#[test]
fn test_models_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HaloModel>();
    assert_send_sync::<CrossHaloModel>();
}
