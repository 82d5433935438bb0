//! FFI functions for the cosmology engine.
//!
//! Scalar queries return NaN for an invalid handle. Redshifts must lie in
//! the range the cosmology was created with.

use std::sync::Arc;

use libc::{c_char, c_double, c_int};

use halox_cosmology::io::read_power_spectrum;
use halox_cosmology::{
    ConcentrationModel, CosmologicalParameters, Cosmology, CosmologyOptions, HaloBiasModel,
    LuminosityFunction, MassFunctionModel, OverdensityModel,
};

use crate::error::set_last_error;
use crate::registry::{self, Handle, ObjectType, INVALID_HANDLE};
use crate::{input_slice, input_str};

/// Cosmologies are shared with the halo models built on them.
pub type StoredCosmology = Arc<Cosmology>;

/// Cosmological parameters.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct HaloxCosmoParams {
    /// Matter density Ω_M.
    pub omega_m: c_double,
    /// Baryon density Ω_b.
    pub omega_b: c_double,
    /// Dark-energy density Ω_Λ.
    pub omega_l: c_double,
    /// Neutrino density Ω_ν.
    pub omega_n: c_double,
    /// Radiation density Ω_r.
    pub omega_r: c_double,
    /// Curvature density Ω_K.
    pub omega_k: c_double,
    /// Dimensionless Hubble parameter.
    pub h: c_double,
    /// σ_8.
    pub sigma8: c_double,
    /// Dark-energy equation of state, constant term.
    pub w0: c_double,
    /// Dark-energy equation of state, slope.
    pub wa: c_double,
}

impl From<HaloxCosmoParams> for CosmologicalParameters {
    fn from(p: HaloxCosmoParams) -> Self {
        Self {
            omega_m: p.omega_m,
            omega_b: p.omega_b,
            omega_l: p.omega_l,
            omega_n: p.omega_n,
            omega_r: p.omega_r,
            omega_k: p.omega_k,
            h: p.h,
            sigma8: p.sigma8,
            w0: p.w0,
            wa: p.wa,
        }
    }
}

impl From<CosmologicalParameters> for HaloxCosmoParams {
    fn from(p: CosmologicalParameters) -> Self {
        Self {
            omega_m: p.omega_m,
            omega_b: p.omega_b,
            omega_l: p.omega_l,
            omega_n: p.omega_n,
            omega_r: p.omega_r,
            omega_k: p.omega_k,
            h: p.h,
            sigma8: p.sigma8,
            w0: p.w0,
            wa: p.wa,
        }
    }
}

/// Selection of the halo fits.
///
/// Codes: mass function 0 Sheth-Tormen, 1 Tinker08, 2 Behroozi13; bias
/// 0 Sheth-Mo-Tormen, 1 Tinker10; overdensity 0 Bryan-Norman,
/// 1 Nakamura-Suto; concentration 0 Shimizu03, 1 Zhao09.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct HaloxCosmoOptions {
    /// Mass function code.
    pub mass_function: c_int,
    /// Halo bias code.
    pub halo_bias: c_int,
    /// Virial overdensity code.
    pub overdensity: c_int,
    /// Concentration code.
    pub concentration: c_int,
    /// Returned by the formation-redshift solve when it fails.
    pub formation_fallback: c_double,
}

impl From<CosmologyOptions> for HaloxCosmoOptions {
    fn from(o: CosmologyOptions) -> Self {
        Self {
            mass_function: match o.mass_function {
                MassFunctionModel::ShethTormen => 0,
                MassFunctionModel::Tinker08 => 1,
                MassFunctionModel::Behroozi13 => 2,
            },
            halo_bias: match o.halo_bias {
                HaloBiasModel::ShethMoTormen => 0,
                HaloBiasModel::Tinker10 => 1,
            },
            overdensity: match o.overdensity {
                OverdensityModel::BryanNorman => 0,
                OverdensityModel::NakamuraSuto => 1,
            },
            concentration: match o.concentration {
                ConcentrationModel::Shimizu03 => 0,
                ConcentrationModel::Zhao09 => 1,
            },
            formation_fallback: o.formation_fallback,
        }
    }
}

fn options_from_ffi(o: HaloxCosmoOptions) -> Option<CosmologyOptions> {
    let mass_function = match o.mass_function {
        0 => MassFunctionModel::ShethTormen,
        1 => MassFunctionModel::Tinker08,
        2 => MassFunctionModel::Behroozi13,
        code => return invalid_code("mass function", code),
    };
    let halo_bias = match o.halo_bias {
        0 => HaloBiasModel::ShethMoTormen,
        1 => HaloBiasModel::Tinker10,
        code => return invalid_code("halo bias", code),
    };
    let overdensity = match o.overdensity {
        0 => OverdensityModel::BryanNorman,
        1 => OverdensityModel::NakamuraSuto,
        code => return invalid_code("overdensity", code),
    };
    let concentration = match o.concentration {
        0 => ConcentrationModel::Shimizu03,
        1 => ConcentrationModel::Zhao09,
        code => return invalid_code("concentration", code),
    };
    Some(CosmologyOptions {
        mass_function,
        halo_bias,
        overdensity,
        concentration,
        formation_fallback: o.formation_fallback,
    })
}

fn invalid_code<T>(kind: &str, code: c_int) -> Option<T> {
    set_last_error(format!("Unknown {kind} code {code}"));
    None
}

/// Default cosmological parameters (flat ΛCDM, Ω_M = 0.3, h = 0.7, σ_8 = 0.8).
#[no_mangle]
pub extern "C" fn halox_cosmo_params_default() -> HaloxCosmoParams {
    CosmologicalParameters::default().into()
}

/// Default halo fits.
#[no_mangle]
pub extern "C" fn halox_cosmo_options_default() -> HaloxCosmoOptions {
    CosmologyOptions::default().into()
}

unsafe fn create(
    params: *const HaloxCosmoParams,
    options: *const HaloxCosmoOptions,
    k: Vec<f64>,
    pk: Vec<f64>,
    z_min: c_double,
    z_max: c_double,
    thinness: c_int,
) -> Handle {
    let params = if params.is_null() {
        CosmologicalParameters::default()
    } else {
        (*params).into()
    };
    let options = if options.is_null() {
        CosmologyOptions::default()
    } else {
        match options_from_ffi(*options) {
            Some(o) => o,
            None => return INVALID_HANDLE,
        }
    };
    let Ok(thinness) = usize::try_from(thinness) else {
        set_last_error(format!("Thinness must be positive, got {thinness}"));
        return INVALID_HANDLE;
    };

    match Cosmology::new(params, k, pk, z_min, z_max, thinness, options) {
        Ok(cosmology) => registry::register(Arc::new(cosmology), ObjectType::Cosmology),
        Err(e) => {
            set_last_error(format!("Failed to create cosmology: {e}"));
            INVALID_HANDLE
        }
    }
}

/// Creates a cosmology from a tabulated seed power spectrum.
///
/// `params` and `options` may be null for the defaults.
///
/// # Safety
///
/// `k` and `pk` must point to `len` doubles.
#[no_mangle]
pub unsafe extern "C" fn halox_cosmology_create(
    params: *const HaloxCosmoParams,
    options: *const HaloxCosmoOptions,
    k: *const c_double,
    pk: *const c_double,
    len: c_int,
    z_min: c_double,
    z_max: c_double,
    thinness: c_int,
) -> Handle {
    let (Some(k), Some(pk)) = (input_slice(k, len), input_slice(pk, len)) else {
        return INVALID_HANDLE;
    };
    create(params, options, k.to_vec(), pk.to_vec(), z_min, z_max, thinness)
}

/// Creates a cosmology reading the seed power spectrum from a two-column
/// text file.
///
/// # Safety
///
/// `path` must be a null-terminated string.
#[no_mangle]
pub unsafe extern "C" fn halox_cosmology_create_from_file(
    params: *const HaloxCosmoParams,
    options: *const HaloxCosmoOptions,
    path: *const c_char,
    z_min: c_double,
    z_max: c_double,
    thinness: c_int,
) -> Handle {
    let Some(path) = input_str(path) else {
        return INVALID_HANDLE;
    };
    match read_power_spectrum(path) {
        Ok(table) => {
            let (k, pk) = table.into_columns();
            create(params, options, k, pk, z_min, z_max, thinness)
        }
        Err(e) => {
            set_last_error(format!("Failed to read {path}: {e}"));
            INVALID_HANDLE
        }
    }
}

/// Frees a cosmology. Halo models built on it keep their own reference.
///
/// Returns `HALOX_OK` or `HALOX_INVALID_HANDLE`.
#[no_mangle]
pub extern "C" fn halox_cosmology_free(handle: Handle) -> c_int {
    if registry::release(handle, Some(ObjectType::Cosmology)) {
        crate::HALOX_OK
    } else {
        crate::HALOX_INVALID_HANDLE
    }
}

pub(crate) fn shared(handle: Handle) -> Option<StoredCosmology> {
    registry::lookup::<StoredCosmology, _, _>(handle, ObjectType::Cosmology, Arc::clone)
}

fn query(handle: Handle, f: impl FnOnce(&Cosmology) -> f64) -> c_double {
    registry::lookup::<StoredCosmology, _, _>(handle, ObjectType::Cosmology, |c| f(c.as_ref()))
        .unwrap_or(f64::NAN)
}

// ============================================================================
// Background
// ============================================================================

/// Dimensionless expansion rate `E(z)`.
#[no_mangle]
pub extern "C" fn halox_cosmology_e(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.e(z))
}

/// Hubble constant `H_0` [km/s/Mpc].
#[no_mangle]
pub extern "C" fn halox_cosmology_hubble_constant(handle: Handle) -> c_double {
    query(handle, Cosmology::hubble_constant)
}

/// Hubble time [Gyr].
#[no_mangle]
pub extern "C" fn halox_cosmology_hubble_time(handle: Handle) -> c_double {
    query(handle, Cosmology::hubble_time)
}

/// Hubble parameter `H(z)` [km/s/Mpc].
#[no_mangle]
pub extern "C" fn halox_cosmology_hubble(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.hubble(z))
}

/// Hubble distance `c / H(z)` [Mpc].
#[no_mangle]
pub extern "C" fn halox_cosmology_hubble_distance(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.hubble_distance(z))
}

/// Line-of-sight comoving distance [Mpc].
#[no_mangle]
pub extern "C" fn halox_cosmology_comoving_distance(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.comoving_distance(z))
}

/// `dD_C/dz` [Mpc].
#[no_mangle]
pub extern "C" fn halox_cosmology_comoving_distance_derivative(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.comoving_distance_derivative(z))
}

/// Angular-diameter distance [Mpc].
#[no_mangle]
pub extern "C" fn halox_cosmology_angular_diameter_distance(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.angular_diameter_distance(z))
}

/// Comoving volume element `dV/dz/dΩ` [Mpc^3].
#[no_mangle]
pub extern "C" fn halox_cosmology_comoving_volume_element(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.comoving_volume_element(z))
}

/// Comoving volume within `z` [Mpc^3].
#[no_mangle]
pub extern "C" fn halox_cosmology_comoving_volume(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.comoving_volume(z))
}

/// Age of the universe at `z` [Gyr].
#[no_mangle]
pub extern "C" fn halox_cosmology_cosmic_time(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.cosmic_time(z))
}

/// Critical density [M_sun / Mpc^3].
#[no_mangle]
pub extern "C" fn halox_cosmology_critical_density(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.critical_density(z))
}

/// Critical density in `h^2` units.
#[no_mangle]
pub extern "C" fn halox_cosmology_critical_density_comoving(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.critical_density_comoving(z))
}

/// Matter density parameter `Ω_M(z)`.
#[no_mangle]
pub extern "C" fn halox_cosmology_omega_m(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.omega_m(z))
}

/// Baryon density parameter `Ω_b(z)`.
#[no_mangle]
pub extern "C" fn halox_cosmology_omega_b(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.omega_b(z))
}

/// Spherical collapse threshold `δ_c(z)`.
#[no_mangle]
pub extern "C" fn halox_cosmology_delta_c(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.delta_c(z))
}

/// Virial overdensity of the selected fit.
#[no_mangle]
pub extern "C" fn halox_cosmology_virial_overdensity(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.virial_overdensity(z))
}

/// Bryan & Norman virial overdensity.
#[no_mangle]
pub extern "C" fn halox_cosmology_virial_overdensity_bryan_norman(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.virial_overdensity_bryan_norman(z))
}

/// Nakamura & Suto virial overdensity.
#[no_mangle]
pub extern "C" fn halox_cosmology_virial_overdensity_nakamura_suto(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.virial_overdensity_nakamura_suto(z))
}

// ============================================================================
// Growth and power spectrum
// ============================================================================

/// Unnormalised linear growth factor `D(z)`.
#[no_mangle]
pub extern "C" fn halox_cosmology_growth_factor(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.growth_factor(z))
}

/// Scale-dependent growth `(1 + z) D(z)`.
#[no_mangle]
pub extern "C" fn halox_cosmology_scaled_growth_factor(handle: Handle, z: c_double) -> c_double {
    query(handle, |c| c.scaled_growth_factor(z))
}

/// Linear power spectrum, `k` in 1/Mpc.
#[no_mangle]
pub extern "C" fn halox_cosmology_power_spectrum(handle: Handle, k: c_double, z: c_double) -> c_double {
    query(handle, |c| c.power_spectrum(k, z))
}

/// Linear power spectrum, `k` in h/Mpc.
#[no_mangle]
pub extern "C" fn halox_cosmology_power_spectrum_comoving(handle: Handle, k: c_double, z: c_double) -> c_double {
    query(handle, |c| c.power_spectrum_comoving(k, z))
}

/// Variance in spheres of radius `r` [Mpc].
#[no_mangle]
pub extern "C" fn halox_cosmology_sigma2_radius(handle: Handle, r: c_double, z: c_double) -> c_double {
    query(handle, |c| c.sigma2_radius(r, z))
}

/// Variance at halo mass `m` [M_sun].
#[no_mangle]
pub extern "C" fn halox_cosmology_sigma2_mass(handle: Handle, m: c_double, z: c_double) -> c_double {
    query(handle, |c| c.sigma2_mass(m, z))
}

/// `dσ²/dM`.
#[no_mangle]
pub extern "C" fn halox_cosmology_dsigma2_dmass(handle: Handle, m: c_double, z: c_double) -> c_double {
    query(handle, |c| c.dsigma2_dmass(m, z))
}

// ============================================================================
// Halos
// ============================================================================

/// Halo mass function `dn/dM`.
#[no_mangle]
pub extern "C" fn halox_cosmology_mass_function(handle: Handle, m: c_double, z: c_double) -> c_double {
    query(handle, |c| c.mass_function(m, z))
}

/// Halo bias.
#[no_mangle]
pub extern "C" fn halox_cosmology_halo_bias(handle: Handle, m: c_double, z: c_double) -> c_double {
    query(handle, |c| c.halo_bias(m, z))
}

/// Halo concentration.
#[no_mangle]
pub extern "C" fn halox_cosmology_concentration(handle: Handle, m: c_double, z: c_double) -> c_double {
    query(handle, |c| c.concentration(m, z))
}

/// Normalised Fourier-space NFW profile.
#[no_mangle]
pub extern "C" fn halox_cosmology_density_profile(
    handle: Handle,
    k: c_double,
    m: c_double,
    z: c_double,
) -> c_double {
    query(handle, |c| c.density_profile(k, m, z))
}

/// Redshift at which a halo of mass `m` at `z_now` had assembled
/// `fraction` of its mass. Returns the configured fallback on failure.
#[no_mangle]
pub extern "C" fn halox_cosmology_formation_redshift(
    handle: Handle,
    m: c_double,
    fraction: c_double,
    z_now: c_double,
    z_max: c_double,
) -> c_double {
    query(handle, |c| c.formation_redshift(m, fraction, z_now, z_max))
}

// ============================================================================
// Luminosity functions
// ============================================================================

/// UV luminosity function by name at absolute magnitude `magnitude`.
///
/// # Safety
///
/// `name` must be a null-terminated string.
#[no_mangle]
pub unsafe extern "C" fn halox_luminosity_function(
    name: *const c_char,
    magnitude: c_double,
    z: c_double,
) -> c_double {
    match parse_luminosity_function(name) {
        Some(lf) => lf.evaluate(magnitude, z),
        None => f64::NAN,
    }
}

/// Normalised redshift distribution of sources with magnitudes in
/// `[l_min, l_max]` over `[z_lo, z_hi]`.
///
/// # Safety
///
/// `name` must be a null-terminated string.
#[no_mangle]
pub unsafe extern "C" fn halox_cosmology_redshift_distribution(
    handle: Handle,
    name: *const c_char,
    z: c_double,
    l_min: c_double,
    l_max: c_double,
    z_lo: c_double,
    z_hi: c_double,
) -> c_double {
    match parse_luminosity_function(name) {
        Some(lf) => query(handle, |c| c.redshift_distribution(z, l_min, l_max, z_lo, z_hi, lf)),
        None => f64::NAN,
    }
}

unsafe fn parse_luminosity_function(name: *const c_char) -> Option<LuminosityFunction> {
    let name = input_str(name)?;
    match name.parse::<LuminosityFunction>() {
        Ok(lf) => Some(lf),
        Err(e) => {
            set_last_error(e.to_string());
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use halox_math::grid::log_space;
    use std::ffi::CString;

    pub(crate) fn create_default(thinness: c_int) -> Handle {
        let k = log_space(200, 1e-4, 1e4);
        let pk: Vec<f64> = k.iter().map(|&k| k / (1.0 + (k / 0.02).powi(2)).powi(2)).collect();
        unsafe {
            halox_cosmology_create(
                std::ptr::null(),
                std::ptr::null(),
                k.as_ptr(),
                pk.as_ptr(),
                200,
                1e-7,
                1e7,
                thinness,
            )
        }
    }

    #[test]
    fn test_create_and_query() {
        let handle = create_default(200);
        assert_ne!(handle, INVALID_HANDLE);
        assert_eq!(registry::get_type(handle), ObjectType::Cosmology);

        assert_relative_eq!(halox_cosmology_e(handle, 1e-7), 1.0, max_relative = 1e-6);
        assert_relative_eq!(halox_cosmology_hubble_constant(handle), 70.0);
        assert_eq!(halox_cosmology_comoving_distance(handle, 1e-7), 0.0);
        assert!(halox_cosmology_growth_factor(handle, 1.0) < halox_cosmology_growth_factor(handle, 0.1));
        assert!(halox_cosmology_mass_function(handle, 1e12, 1.0) > 0.0);

        assert_eq!(halox_cosmology_free(handle), crate::HALOX_OK);
        assert!(halox_cosmology_e(handle, 1.0).is_nan());
    }

    #[test]
    fn test_invalid_options_code() {
        let k = log_space(20, 1e-4, 1e4);
        let mut options = halox_cosmo_options_default();
        options.mass_function = 9;
        let handle = unsafe {
            halox_cosmology_create(
                std::ptr::null(),
                &options,
                k.as_ptr(),
                k.as_ptr(),
                20,
                1e-7,
                1e7,
                200,
            )
        };
        assert_eq!(handle, INVALID_HANDLE);
    }

    #[test]
    fn test_coarse_expansion_table_is_rejected() {
        assert_eq!(create_default(20), INVALID_HANDLE);
        let message = unsafe { std::ffi::CStr::from_ptr(crate::error::last_error_message()) };
        assert!(message.to_string_lossy().contains("increase the thinness"));
    }

    #[test]
    fn test_defaults_round_trip() {
        let params = halox_cosmo_params_default();
        assert_eq!(params.omega_m, 0.3);
        assert_eq!(params.sigma8, 0.8);
        let options = halox_cosmo_options_default();
        assert_eq!(options.mass_function, 2);
        assert!(options.formation_fallback.is_nan());
        assert!(options_from_ffi(options).is_some());
    }

    #[test]
    fn test_luminosity_function_by_name() {
        let name = CString::new("Bouwens15").unwrap();
        let value = unsafe { halox_luminosity_function(name.as_ptr(), -20.0, 6.0) };
        assert!(value > 0.0);
        let name = CString::new("schechter").unwrap();
        let value = unsafe { halox_luminosity_function(name.as_ptr(), -20.0, 6.0) };
        assert!(value.is_nan());
    }
}
