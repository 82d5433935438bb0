//! Thread-local last-error slot.
//!
//! Calls that fail return a sentinel (NaN, `INVALID_HANDLE` or a negative
//! status) and leave a message here for `halox_last_error_message`.

use std::cell::RefCell;
use std::ffi::CString;
use std::fmt::Display;

use libc::{c_char, c_int};

use crate::HALOX_ERROR;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Sets the last error message.
pub fn set_last_error(msg: impl Into<String>) {
    LAST_ERROR.with(|cell| {
        *cell.borrow_mut() = CString::new(msg.into()).ok();
    });
}

/// Gets the last error message as a C string pointer.
///
/// Returns a null pointer if no error has been set.
pub fn last_error_message() -> *const c_char {
    LAST_ERROR.with(|cell| {
        cell.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |s| s.as_ptr())
    })
}

/// Clears the last error.
pub fn clear_error() {
    LAST_ERROR.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Records `err` and returns `HALOX_ERROR`.
pub fn error_status(err: impl Display) -> c_int {
    set_last_error(err.to_string());
    HALOX_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_error_set_and_get() {
        set_last_error("Invalid handle 7");

        let ptr = last_error_message();
        assert!(!ptr.is_null());

        unsafe {
            let msg = CStr::from_ptr(ptr).to_string_lossy();
            assert_eq!(msg, "Invalid handle 7");
        }
    }

    #[test]
    fn test_clear_error() {
        set_last_error("Error");
        clear_error();
        assert!(last_error_message().is_null());
    }

    #[test]
    fn test_error_status() {
        assert_eq!(error_status("size mismatch"), HALOX_ERROR);
        let msg = unsafe { CStr::from_ptr(last_error_message()) };
        assert_eq!(msg.to_string_lossy(), "size mismatch");
    }
}
