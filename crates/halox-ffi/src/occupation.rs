//! FFI functions for occupation models.

use std::sync::Arc;

use libc::{c_char, c_double, c_int};

use halox_model::{OccupationKind, OccupationModel, OccupationParameters};

use crate::error::set_last_error;
use crate::registry::{self, Handle, ObjectType, INVALID_HANDLE};
use crate::{input_slice, input_str};

/// Occupation models are shared with the halo models that use them.
pub type StoredOccupation = Arc<dyn OccupationModel>;

fn register(params: OccupationParameters) -> Handle {
    registry::register(params.build(), ObjectType::Occupation)
}

/// Creates a Harikane et al. (2016) occupation model.
#[no_mangle]
pub extern "C" fn halox_occupation_harikane16_create(
    duty_cycle: c_double,
    m_min: c_double,
    sigma_log_m: c_double,
    m0: c_double,
    m1: c_double,
    alpha: c_double,
) -> Handle {
    let values = [duty_cycle, m_min, sigma_log_m, m0, m1, alpha];
    match OccupationParameters::from_values(OccupationKind::Harikane16, &values) {
        Ok(params) => register(params),
        Err(e) => {
            set_last_error(e.to_string());
            INVALID_HANDLE
        }
    }
}

/// Creates a Tinker et al. (2010) occupation model.
#[no_mangle]
pub extern "C" fn halox_occupation_tinker10_create(
    a_min: c_double,
    sigma_log_a: c_double,
    a_sat: c_double,
    alpha_sat: c_double,
) -> Handle {
    let values = [a_min, sigma_log_a, a_sat, alpha_sat];
    match OccupationParameters::from_values(OccupationKind::Tinker10, &values) {
        Ok(params) => register(params),
        Err(e) => {
            set_last_error(e.to_string());
            INVALID_HANDLE
        }
    }
}

/// Creates an occupation model by name from a flat parameter list.
///
/// # Safety
///
/// `name` must be a null-terminated string and `values` must point to
/// `len` doubles.
#[no_mangle]
pub unsafe extern "C" fn halox_occupation_create(
    name: *const c_char,
    values: *const c_double,
    len: c_int,
) -> Handle {
    let (Some(name), Some(values)) = (input_str(name), input_slice(values, len)) else {
        return INVALID_HANDLE;
    };
    let params = name
        .parse::<OccupationKind>()
        .and_then(|kind| OccupationParameters::from_values(kind, values));
    match params {
        Ok(params) => register(params),
        Err(e) => {
            set_last_error(e.to_string());
            INVALID_HANDLE
        }
    }
}

/// Mean number of central galaxies in a halo of mass `m`.
#[no_mangle]
pub extern "C" fn halox_occupation_mean_central(handle: Handle, m: c_double) -> c_double {
    registry::lookup::<StoredOccupation, _, _>(handle, ObjectType::Occupation, |o| o.mean_central(m))
        .unwrap_or(f64::NAN)
}

/// Mean number of satellite galaxies in a halo of mass `m`.
#[no_mangle]
pub extern "C" fn halox_occupation_mean_satellite(handle: Handle, m: c_double) -> c_double {
    registry::lookup::<StoredOccupation, _, _>(handle, ObjectType::Occupation, |o| {
        o.mean_satellite(m)
    })
    .unwrap_or(f64::NAN)
}

/// Frees an occupation model.
#[no_mangle]
pub extern "C" fn halox_occupation_free(handle: Handle) -> c_int {
    if registry::release(handle, Some(ObjectType::Occupation)) {
        crate::HALOX_OK
    } else {
        crate::HALOX_INVALID_HANDLE
    }
}

pub(crate) fn shared(handle: Handle) -> Option<StoredOccupation> {
    registry::lookup::<StoredOccupation, _, _>(handle, ObjectType::Occupation, Arc::clone)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::ffi::CString;

    pub(crate) fn create_threshold() -> Handle {
        halox_occupation_harikane16_create(0.5, 1e11, 1.0, 1e11, 1e11, 1.0)
    }

    #[test]
    fn test_harikane16_reference_values() {
        let handle = create_threshold();
        assert_ne!(handle, INVALID_HANDLE);
        assert_relative_eq!(
            halox_occupation_mean_central(handle, 1e12),
            0.9213503964748575,
            max_relative = 1e-14
        );
        assert_relative_eq!(
            halox_occupation_mean_satellite(handle, 1e12),
            8.2921535682737169,
            max_relative = 1e-14
        );
        assert_eq!(halox_occupation_free(handle), crate::HALOX_OK);
        assert!(halox_occupation_mean_central(handle, 1e12).is_nan());
    }

    #[test]
    fn test_create_by_name() {
        let name = CString::new("tinker10").unwrap();
        let values = [1e11, 0.5, 1e12, 1.0];
        let handle = unsafe { halox_occupation_create(name.as_ptr(), values.as_ptr(), 4) };
        assert_ne!(handle, INVALID_HANDLE);
        assert!(halox_occupation_mean_central(handle, 1e13) > 0.5);
        halox_occupation_free(handle);

        let handle = unsafe { halox_occupation_create(name.as_ptr(), values.as_ptr(), 3) };
        assert_eq!(handle, INVALID_HANDLE);

        let unknown = CString::new("zheng07").unwrap();
        let handle = unsafe { halox_occupation_create(unknown.as_ptr(), values.as_ptr(), 4) };
        assert_eq!(handle, INVALID_HANDLE);
    }
}
