//! FFI functions for the single-population halo model.
//!
//! Power spectra are written on the model's wavenumber grid, so their
//! buffers must hold `halox_halo_model_thinness` values. Real-space
//! statistics are written at caller-supplied points, one output per point.

use libc::{c_double, c_int};

use halox_model::HaloModel;

use crate::error::{error_status, set_last_error};
use crate::registry::{self, Handle, ObjectType, INVALID_HANDLE};
use crate::{component_from_ffi, cosmology, fill, input_slice, occupation, scalar};
use crate::{HALOX_ERROR, HALOX_INVALID_HANDLE, HALOX_OK};

const KIND: ObjectType = ObjectType::HaloModel;

/// Creates a halo model from occupation and cosmology handles.
///
/// Both objects stay usable and may be freed independently.
#[no_mangle]
pub extern "C" fn halox_halo_model_create(
    occupation: Handle,
    cosmology: Handle,
    redshift: c_double,
    thinness: c_int,
) -> Handle {
    let (Some(occupation), Some(cosmology)) = (occupation::shared(occupation), cosmology::shared(cosmology)) else {
        return INVALID_HANDLE;
    };
    let Ok(thinness) = usize::try_from(thinness) else {
        set_last_error(format!("Thinness must be positive, got {thinness}"));
        return INVALID_HANDLE;
    };

    match HaloModel::new(occupation, cosmology, redshift, thinness) {
        Ok(model) => registry::register(model, KIND),
        Err(e) => {
            set_last_error(format!("Failed to create halo model: {e}"));
            INVALID_HANDLE
        }
    }
}

/// Replaces the occupation model, keeping the cosmology tables.
#[no_mangle]
pub extern "C" fn halox_halo_model_set_occupation(handle: Handle, occupation: Handle) -> c_int {
    let Some(occupation) = occupation::shared(occupation) else {
        return HALOX_INVALID_HANDLE;
    };
    match registry::with_object_mut::<HaloModel, _, _>(handle, |model| model.set_occupation(occupation)) {
        Some(Ok(())) => HALOX_OK,
        Some(Err(e)) => error_status(e),
        None => {
            set_last_error(format!("Invalid halo model handle {handle}"));
            HALOX_INVALID_HANDLE
        }
    }
}

/// Frees a halo model.
#[no_mangle]
pub extern "C" fn halox_halo_model_free(handle: Handle) -> c_int {
    if registry::release(handle, Some(KIND)) {
        HALOX_OK
    } else {
        HALOX_INVALID_HANDLE
    }
}

/// Number of wavenumber bins, or `HALOX_INVALID_HANDLE`.
#[no_mangle]
pub extern "C" fn halox_halo_model_thinness(handle: Handle) -> c_int {
    registry::lookup::<HaloModel, _, _>(handle, KIND, |m| {
        c_int::try_from(m.thinness()).unwrap_or(c_int::MAX)
    })
    .unwrap_or(HALOX_INVALID_HANDLE)
}

/// Redshift of the model.
#[no_mangle]
pub extern "C" fn halox_halo_model_redshift(handle: Handle) -> c_double {
    registry::lookup::<HaloModel, _, _>(handle, KIND, HaloModel::redshift).unwrap_or(f64::NAN)
}

// ============================================================================
// Scalar statistics
// ============================================================================

/// Mean galaxy number density.
#[no_mangle]
pub extern "C" fn halox_halo_model_mean_galaxy_density(handle: Handle) -> c_double {
    scalar(handle, KIND, HaloModel::mean_galaxy_density)
}

/// Large-scale galaxy bias.
#[no_mangle]
pub extern "C" fn halox_halo_model_bias(handle: Handle) -> c_double {
    scalar(handle, KIND, HaloModel::bias)
}

/// Mean host halo mass.
#[no_mangle]
pub extern "C" fn halox_halo_model_mean_halo_mass(handle: Handle) -> c_double {
    scalar(handle, KIND, HaloModel::mean_halo_mass)
}

/// Galaxy number density per unit halo mass at `m`.
#[no_mangle]
pub extern "C" fn halox_halo_model_galaxy_mass_density(handle: Handle, m: c_double) -> c_double {
    registry::lookup::<HaloModel, _, _>(handle, KIND, |model| model.galaxy_mass_density(m))
        .unwrap_or(f64::NAN)
}

// ============================================================================
// Arrays
// ============================================================================

/// Writes the wavenumber grid into `out`.
///
/// # Safety
///
/// `out` must point to `len` writable doubles.
#[no_mangle]
pub unsafe extern "C" fn halox_halo_model_wavenumbers(handle: Handle, out: *mut c_double, len: c_int) -> c_int {
    fill(handle, KIND, out, len, |m: &HaloModel| {
        Ok::<_, std::convert::Infallible>(m.wavenumbers().to_vec())
    })
}

/// Writes a power spectrum term (see the component codes) into `out`.
///
/// # Safety
///
/// `out` must point to `len` writable doubles.
#[no_mangle]
pub unsafe extern "C" fn halox_halo_model_power_spectrum(
    handle: Handle,
    component: c_int,
    out: *mut c_double,
    len: c_int,
) -> c_int {
    let Some(component) = component_from_ffi(component) else {
        return HALOX_ERROR;
    };
    fill(handle, KIND, out, len, |m: &HaloModel| m.power_spectrum(component))
}

/// Writes `ξ(r)` at `radii` into `out`.
///
/// # Safety
///
/// `radii` and `out` must point to `len` doubles.
#[no_mangle]
pub unsafe extern "C" fn halox_halo_model_correlation(
    handle: Handle,
    component: c_int,
    radii: *const c_double,
    out: *mut c_double,
    len: c_int,
) -> c_int {
    let (Some(component), Some(radii)) = (component_from_ffi(component), input_slice(radii, len)) else {
        return HALOX_ERROR;
    };
    fill(handle, KIND, out, len, |m: &HaloModel| m.correlation_function(component, radii))
}

/// Writes `w_p(r_p)` at `radii` into `out`.
///
/// # Safety
///
/// `radii` and `out` must point to `len` doubles.
#[no_mangle]
pub unsafe extern "C" fn halox_halo_model_projected_correlation(
    handle: Handle,
    component: c_int,
    radii: *const c_double,
    out: *mut c_double,
    len: c_int,
) -> c_int {
    let (Some(component), Some(radii)) = (component_from_ffi(component), input_slice(radii, len)) else {
        return HALOX_ERROR;
    };
    fill(handle, KIND, out, len, |m: &HaloModel| m.projected_correlation(component, radii))
}

/// Writes `w(θ)` at angles `theta` in radians into `out`.
///
/// # Safety
///
/// `theta` and `out` must point to `len` doubles.
#[no_mangle]
pub unsafe extern "C" fn halox_halo_model_angular_correlation(
    handle: Handle,
    component: c_int,
    theta: *const c_double,
    out: *mut c_double,
    len: c_int,
) -> c_int {
    let (Some(component), Some(theta)) = (component_from_ffi(component), input_slice(theta, len)) else {
        return HALOX_ERROR;
    };
    fill(handle, KIND, out, len, |m: &HaloModel| m.angular_correlation(component, theta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmology::tests::create_default;
    use crate::occupation::tests::create_threshold;
    use crate::HALOX_SIZE_MISMATCH;

    #[test]
    fn test_pipeline_through_handles() {
        let cosmo = create_default(200);
        let hod = create_threshold();
        let model = halox_halo_model_create(hod, cosmo, 1.0, 20);
        assert_ne!(model, INVALID_HANDLE);
        assert_eq!(halox_halo_model_thinness(model), 20);
        assert!(halox_halo_model_mean_galaxy_density(model) > 0.0);

        // The model keeps its own references.
        crate::cosmology::halox_cosmology_free(cosmo);
        crate::occupation::halox_occupation_free(hod);

        let mut total = vec![0.0; 20];
        let mut one = vec![0.0; 20];
        let mut two = vec![0.0; 20];
        unsafe {
            assert_eq!(halox_halo_model_power_spectrum(model, 0, total.as_mut_ptr(), 20), HALOX_OK);
            assert_eq!(halox_halo_model_power_spectrum(model, 1, one.as_mut_ptr(), 20), HALOX_OK);
            assert_eq!(halox_halo_model_power_spectrum(model, 4, two.as_mut_ptr(), 20), HALOX_OK);
        }
        for i in 0..20 {
            assert_eq!(total[i], one[i] + two[i]);
        }

        let mut short = vec![0.0; 10];
        let status = unsafe { halox_halo_model_wavenumbers(model, short.as_mut_ptr(), 10) };
        assert_eq!(status, HALOX_SIZE_MISMATCH);

        let radii = [0.5, 1.0, 5.0];
        let mut xi = [0.0; 3];
        let status = unsafe { halox_halo_model_correlation(model, 0, radii.as_ptr(), xi.as_mut_ptr(), 3) };
        assert_eq!(status, HALOX_OK);
        assert!(xi.iter().all(|v| v.is_finite()));

        assert_eq!(halox_halo_model_free(model), HALOX_OK);
        assert!(halox_halo_model_bias(model).is_nan());
    }

    #[test]
    fn test_set_occupation() {
        let cosmo = create_default(200);
        let model = halox_halo_model_create(create_threshold(), cosmo, 1.0, 20);
        let before = halox_halo_model_mean_galaxy_density(model);

        let richer = crate::occupation::halox_occupation_harikane16_create(0.5, 1e11, 1.0, 1e11, 1e10, 1.0);
        assert_eq!(halox_halo_model_set_occupation(model, richer), HALOX_OK);
        assert!(halox_halo_model_mean_galaxy_density(model) > before);

        assert_eq!(halox_halo_model_set_occupation(model, INVALID_HANDLE), HALOX_INVALID_HANDLE);
        halox_halo_model_free(model);
    }

    #[test]
    fn test_invalid_handles() {
        assert_eq!(halox_halo_model_create(INVALID_HANDLE, INVALID_HANDLE, 1.0, 20), INVALID_HANDLE);
        assert_eq!(halox_halo_model_thinness(INVALID_HANDLE), HALOX_INVALID_HANDLE);
        let mut out = [0.0; 4];
        let status = unsafe { halox_halo_model_power_spectrum(INVALID_HANDLE, 0, out.as_mut_ptr(), 4) };
        assert_eq!(status, HALOX_INVALID_HANDLE);
        let status = unsafe { halox_halo_model_power_spectrum(INVALID_HANDLE, 9, out.as_mut_ptr(), 4) };
        assert_eq!(status, HALOX_ERROR);
    }
}
