//! # Halox FFI
//!
//! C-compatible Foreign Function Interface for the Halox halo-model library.
//!
//! Objects live in a global registry and are referred to by opaque `u64`
//! handles. A handle of 0 is never valid.
//!
//! ## Safety
//!
//! Functions taking raw pointers are `unsafe`. The caller is responsible for:
//!
//! - Passing buffers of at least the stated length
//! - Passing null-terminated strings where a `*const c_char` is expected
//! - Not using handles after they have been freed
//!
//! ## Memory Management
//!
//! Every `halox_*_create` has a matching `halox_*_free`. Arrays are always
//! written into caller-owned buffers; the library never hands out memory.
//!
//! ## Error Handling
//!
//! Scalar queries return NaN on failure, constructors return
//! `INVALID_HANDLE` and array-filling calls return a negative status code.
//! The message of the last failure on the calling thread is available from
//! `halox_last_error_message`.

#![allow(clippy::missing_safety_doc)]

use std::any::Any;
use std::ffi::CStr;
use std::fmt::Display;
use std::slice;

use libc::{c_char, c_int};

pub mod cosmology;
pub mod cross_halo_model;
mod error;
pub mod halo_model;
pub mod occupation;
pub mod registry;

use error::{error_status, set_last_error};
use halox_model::Component;
use registry::{Handle, ObjectType};

/// Result code for successful operations.
pub const HALOX_OK: c_int = 0;

/// Result code for general errors.
pub const HALOX_ERROR: c_int = -1;

/// Result code for unknown or mistyped handles.
pub const HALOX_INVALID_HANDLE: c_int = -2;

/// Result code for buffers of the wrong length.
pub const HALOX_SIZE_MISMATCH: c_int = -3;

// ============================================================================
// Buffer helpers
// ============================================================================

/// Borrows `len` doubles from `ptr`, recording an error for null or
/// negative input.
pub(crate) unsafe fn input_slice<'a>(ptr: *const f64, len: c_int) -> Option<&'a [f64]> {
    if ptr.is_null() {
        set_last_error("Null input buffer");
        return None;
    }
    match usize::try_from(len) {
        Ok(n) if n > 0 => Some(slice::from_raw_parts(ptr, n)),
        _ => {
            set_last_error(format!("Buffer length must be positive, got {len}"));
            None
        }
    }
}

/// Copies `values` into the caller buffer of length `len`.
pub(crate) unsafe fn write_output(out: *mut f64, len: c_int, values: &[f64]) -> c_int {
    if out.is_null() {
        set_last_error("Null output buffer");
        return HALOX_ERROR;
    }
    if usize::try_from(len).ok() != Some(values.len()) {
        set_last_error(format!(
            "Output buffer holds {len} values, {} required",
            values.len()
        ));
        return HALOX_SIZE_MISMATCH;
    }
    slice::from_raw_parts_mut(out, values.len()).copy_from_slice(values);
    HALOX_OK
}

/// Evaluates a fallible scalar on the object behind `handle`, NaN on
/// failure.
pub(crate) fn scalar<T, E, F>(handle: Handle, kind: ObjectType, f: F) -> f64
where
    T: Any + Send + Sync,
    E: Display,
    F: FnOnce(&T) -> Result<f64, E>,
{
    match registry::lookup::<T, _, _>(handle, kind, f) {
        Some(Ok(value)) => value,
        Some(Err(e)) => {
            set_last_error(e.to_string());
            f64::NAN
        }
        None => f64::NAN,
    }
}

/// Evaluates a fallible array on the object behind `handle` and copies it
/// into the caller buffer.
pub(crate) unsafe fn fill<T, E, F>(handle: Handle, kind: ObjectType, out: *mut f64, len: c_int, f: F) -> c_int
where
    T: Any + Send + Sync,
    E: Display,
    F: FnOnce(&T) -> Result<Vec<f64>, E>,
{
    match registry::lookup::<T, _, _>(handle, kind, f) {
        Some(Ok(values)) => write_output(out, len, &values),
        Some(Err(e)) => error_status(e),
        None => HALOX_INVALID_HANDLE,
    }
}

/// Maps a C component code to a spectrum term.
///
/// 0 total, 1 one-halo, 2 central-satellite, 3 satellite-satellite,
/// 4 two-halo, 5 large scale.
pub(crate) fn component_from_ffi(code: c_int) -> Option<Component> {
    let component = match code {
        0 => Component::Total,
        1 => Component::OneHalo,
        2 => Component::CentralSatellite,
        3 => Component::SatelliteSatellite,
        4 => Component::TwoHalo,
        5 => Component::LargeScale,
        _ => {
            set_last_error(format!("Unknown component code {code}"));
            return None;
        }
    };
    Some(component)
}

/// Reads a C string argument.
pub(crate) unsafe fn input_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        set_last_error("Null string argument");
        return None;
    }
    match CStr::from_ptr(ptr).to_str() {
        Ok(s) => Some(s),
        Err(_) => {
            set_last_error("Invalid UTF-8 string");
            None
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Gets the last error message of the calling thread.
///
/// # Safety
///
/// The returned string is valid until the next failing call on this thread.
/// The caller must not free it.
#[no_mangle]
pub unsafe extern "C" fn halox_last_error_message() -> *const c_char {
    error::last_error_message()
}

/// Clears the last error message.
#[no_mangle]
pub extern "C" fn halox_clear_error() {
    error::clear_error();
}

// ============================================================================
// Version Information
// ============================================================================

/// Returns the library version string.
#[no_mangle]
pub extern "C" fn halox_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr().cast::<c_char>()
}
