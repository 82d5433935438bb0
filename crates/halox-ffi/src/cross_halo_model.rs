//! FFI functions for the two-population halo model.
//!
//! Only the total (0), one-halo (1) and two-halo (4) component codes are
//! defined here; other codes return `HALOX_ERROR`.

use libc::{c_double, c_int};

use halox_model::CrossHaloModel;

use crate::error::{error_status, set_last_error};
use crate::registry::{self, Handle, ObjectType, INVALID_HANDLE};
use crate::{component_from_ffi, cosmology, fill, input_slice, occupation, scalar};
use crate::{HALOX_ERROR, HALOX_INVALID_HANDLE, HALOX_OK};

const KIND: ObjectType = ObjectType::CrossHaloModel;

/// Creates a cross halo model from two occupation handles and a cosmology.
#[no_mangle]
pub extern "C" fn halox_cross_halo_model_create(
    population1: Handle,
    population2: Handle,
    cosmology: Handle,
    redshift: c_double,
    thinness: c_int,
) -> Handle {
    let (Some(population1), Some(population2), Some(cosmology)) = (
        occupation::shared(population1),
        occupation::shared(population2),
        cosmology::shared(cosmology),
    ) else {
        return INVALID_HANDLE;
    };
    let Ok(thinness) = usize::try_from(thinness) else {
        set_last_error(format!("Thinness must be positive, got {thinness}"));
        return INVALID_HANDLE;
    };

    match CrossHaloModel::new(population1, population2, cosmology, redshift, thinness) {
        Ok(model) => registry::register(model, KIND),
        Err(e) => {
            set_last_error(format!("Failed to create cross halo model: {e}"));
            INVALID_HANDLE
        }
    }
}

/// Replaces population 1 or 2.
#[no_mangle]
pub extern "C" fn halox_cross_halo_model_set_population(
    handle: Handle,
    population: c_int,
    occupation: Handle,
) -> c_int {
    let Some(occupation) = occupation::shared(occupation) else {
        return HALOX_INVALID_HANDLE;
    };
    let result = registry::with_object_mut::<CrossHaloModel, _, _>(handle, |model| match population {
        1 => Some(model.set_population1(occupation)),
        2 => Some(model.set_population2(occupation)),
        _ => None,
    });
    match result {
        Some(Some(Ok(()))) => HALOX_OK,
        Some(Some(Err(e))) => error_status(e),
        Some(None) => error_status(format!("Population must be 1 or 2, got {population}")),
        None => {
            set_last_error(format!("Invalid cross halo model handle {handle}"));
            HALOX_INVALID_HANDLE
        }
    }
}

/// Frees a cross halo model.
#[no_mangle]
pub extern "C" fn halox_cross_halo_model_free(handle: Handle) -> c_int {
    if registry::release(handle, Some(KIND)) {
        HALOX_OK
    } else {
        HALOX_INVALID_HANDLE
    }
}

/// Number of wavenumber bins, or `HALOX_INVALID_HANDLE`.
#[no_mangle]
pub extern "C" fn halox_cross_halo_model_thinness(handle: Handle) -> c_int {
    registry::lookup::<CrossHaloModel, _, _>(handle, KIND, |m| {
        c_int::try_from(m.thinness()).unwrap_or(c_int::MAX)
    })
    .unwrap_or(HALOX_INVALID_HANDLE)
}

/// Mean galaxy density of the first population.
#[no_mangle]
pub extern "C" fn halox_cross_halo_model_mean_galaxy_density_1(handle: Handle) -> c_double {
    scalar(handle, KIND, CrossHaloModel::mean_galaxy_density_1)
}

/// Mean galaxy density of the second population.
#[no_mangle]
pub extern "C" fn halox_cross_halo_model_mean_galaxy_density_2(handle: Handle) -> c_double {
    scalar(handle, KIND, CrossHaloModel::mean_galaxy_density_2)
}

/// Writes the wavenumber grid into `out`.
///
/// # Safety
///
/// `out` must point to `len` writable doubles.
#[no_mangle]
pub unsafe extern "C" fn halox_cross_halo_model_wavenumbers(
    handle: Handle,
    out: *mut c_double,
    len: c_int,
) -> c_int {
    fill(handle, KIND, out, len, |m: &CrossHaloModel| {
        Ok::<_, std::convert::Infallible>(m.wavenumbers().to_vec())
    })
}

/// Writes a cross power spectrum term into `out`.
///
/// # Safety
///
/// `out` must point to `len` writable doubles.
#[no_mangle]
pub unsafe extern "C" fn halox_cross_halo_model_power_spectrum(
    handle: Handle,
    component: c_int,
    out: *mut c_double,
    len: c_int,
) -> c_int {
    let Some(component) = component_from_ffi(component) else {
        return HALOX_ERROR;
    };
    fill(handle, KIND, out, len, |m: &CrossHaloModel| m.power_spectrum(component))
}

/// Writes the cross `ξ(r)` at `radii` into `out`.
///
/// # Safety
///
/// `radii` and `out` must point to `len` doubles.
#[no_mangle]
pub unsafe extern "C" fn halox_cross_halo_model_correlation(
    handle: Handle,
    component: c_int,
    radii: *const c_double,
    out: *mut c_double,
    len: c_int,
) -> c_int {
    let (Some(component), Some(radii)) = (component_from_ffi(component), input_slice(radii, len)) else {
        return HALOX_ERROR;
    };
    fill(handle, KIND, out, len, |m: &CrossHaloModel| m.correlation_function(component, radii))
}

/// Writes the cross `w_p(r_p)` at `radii` into `out`.
///
/// # Safety
///
/// `radii` and `out` must point to `len` doubles.
#[no_mangle]
pub unsafe extern "C" fn halox_cross_halo_model_projected_correlation(
    handle: Handle,
    component: c_int,
    radii: *const c_double,
    out: *mut c_double,
    len: c_int,
) -> c_int {
    let (Some(component), Some(radii)) = (component_from_ffi(component), input_slice(radii, len)) else {
        return HALOX_ERROR;
    };
    fill(handle, KIND, out, len, |m: &CrossHaloModel| m.projected_correlation(component, radii))
}

/// Writes the cross `w(θ)` at angles `theta` in radians into `out`.
///
/// # Safety
///
/// `theta` and `out` must point to `len` doubles.
#[no_mangle]
pub unsafe extern "C" fn halox_cross_halo_model_angular_correlation(
    handle: Handle,
    component: c_int,
    theta: *const c_double,
    out: *mut c_double,
    len: c_int,
) -> c_int {
    let (Some(component), Some(theta)) = (component_from_ffi(component), input_slice(theta, len)) else {
        return HALOX_ERROR;
    };
    fill(handle, KIND, out, len, |m: &CrossHaloModel| m.angular_correlation(component, theta))
}
