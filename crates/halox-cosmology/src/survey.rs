//! Source redshift distributions of flux-limited surveys.

use halox_math::integration::{integrate_qng, QuadratureConfig};

use crate::background::Cosmology;
use crate::luminosity::LuminosityFunction;

impl Cosmology {
    /// Normalised redshift distribution of sources with magnitudes in
    /// `[l_min, l_max]`, over the survey window `[z_lo, z_hi]`.
    ///
    /// `dN/dz ∝ dV/dz/dΩ ∫ φ(L, z) dL`, normalised to unit integral over the
    /// window.
    pub fn redshift_distribution(
        &self,
        z: f64,
        l_min: f64,
        l_max: f64,
        z_lo: f64,
        z_hi: f64,
        luminosity_function: LuminosityFunction,
    ) -> f64 {
        let config = QuadratureConfig::default();
        let counts = |zz: f64| {
            let number = integrate_qng(|l| luminosity_function.evaluate(l, zz), l_min, l_max, &config);
            self.comoving_volume_element(zz) * number.value
        };

        counts(z) / integrate_qng(counts, z_lo, z_hi, &config).value
    }
}
