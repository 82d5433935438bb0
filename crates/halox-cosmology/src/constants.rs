//! Physical constants and unit conversions.
//!
//! SI units unless stated otherwise.

use std::f64::consts::PI;

/// Speed of light `[m / s]`.
pub const SPEED_OF_LIGHT: f64 = 2.997_924_58e8;

/// One parsec `[m]`.
pub const PARSEC: f64 = 3.085_677_581_305_73e16;

/// One sidereal year `[s]`.
pub const YEAR: f64 = 3600.0 * 24.0 * 365.256_363_004;

/// Newtonian gravitational constant `[m^3 kg^-1 s^-2]`.
pub const GRAVITATIONAL_CONSTANT: f64 = 6.673_848_0e-11;

/// Inverse of [`GRAVITATIONAL_CONSTANT`] as tabulated `[m^-3 kg s^2]`.
pub const INVERSE_GRAVITATIONAL_CONSTANT: f64 = 1.498_385_94e10;

/// Solar mass `[kg]`.
pub const SOLAR_MASS: f64 = 1.988_55e30;

/// Hubble constant for `h = 1` `[km / s / Mpc]`.
pub const HUBBLE_UNIT: f64 = 100.0;

/// Redshift floor; logarithmic redshift tables cannot start at zero.
pub const REDSHIFT_FLOOR: f64 = 1e-7;

/// Default upper redshift of the background tables.
pub const DEFAULT_MAX_REDSHIFT: f64 = 1e7;

/// Default number of points per internal table.
pub const DEFAULT_THINNESS: usize = 200;

/// Smoothing radius of the `sigma_8` normalisation `[Mpc / h]`.
pub const SIGMA8_RADIUS: f64 = 8.0;

/// Wavenumber range `[h / Mpc]` of the variance integrals.
pub const VARIANCE_K_RANGE: (f64, f64) = (1e-4, 100.0);

/// Critical density today for `h = 1`, `3 H^2 / (8 pi G)` `[M_sun / Mpc^3]`.
///
/// Built from the constants above: `(3/8) 1e16 pc / (pi G M_sun)`.
pub fn critical_density_unit() -> f64 {
    3.75e15 * PARSEC * INVERSE_GRAVITATIONAL_CONSTANT / (PI * SOLAR_MASS)
}

/// Converts arcseconds to radians.
pub fn arcsec_to_rad(angle: f64) -> f64 {
    angle * PI / 648_000.0
}

/// Converts radians to arcseconds.
pub fn rad_to_arcsec(angle: f64) -> f64 {
    angle * 648_000.0 / PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_critical_density() {
        // 2.775e11 h^2 M_sun / Mpc^3
        assert_relative_eq!(critical_density_unit(), 2.775e11, max_relative = 1e-3);
    }

    #[test]
    fn test_angle_conversions() {
        assert_relative_eq!(arcsec_to_rad(648_000.0), PI);
        assert_relative_eq!(rad_to_arcsec(arcsec_to_rad(3.5)), 3.5, max_relative = 1e-14);
    }
}
