//! Thread-safe global object registry for FFI handles.
//!
//! Cosmologies, occupation models and halo models live in one global map
//! behind opaque `u64` handles. Handles start at 100 and are never reused;
//! zero is the invalid handle.
//!
//! Reads take a shared lock, so queries on different handles run
//! concurrently. Registration, release and in-place updates take the
//! exclusive lock.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use libc::c_int;
use once_cell::sync::Lazy;

use crate::error::set_last_error;

/// Handle type for FFI objects. Zero indicates invalid/null handle.
pub type Handle = u64;

/// Invalid handle constant.
pub const INVALID_HANDLE: Handle = 0;

/// Object types that can be stored in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ObjectType {
    /// Unknown or invalid handle
    Unknown = 0,
    /// Cosmology engine
    Cosmology = 1,
    /// Occupation model
    Occupation = 2,
    /// Single-population halo model
    HaloModel = 3,
    /// Two-population halo model
    CrossHaloModel = 4,
}

impl ObjectType {
    fn label(self) -> &'static str {
        match self {
            ObjectType::Unknown => "unknown",
            ObjectType::Cosmology => "cosmology",
            ObjectType::Occupation => "occupation",
            ObjectType::HaloModel => "halo model",
            ObjectType::CrossHaloModel => "cross halo model",
        }
    }
}

struct ObjectEntry {
    object_type: ObjectType,
    object: Box<dyn Any + Send + Sync>,
}

struct Registry {
    next_handle: AtomicU64,
    objects: RwLock<HashMap<Handle, ObjectEntry>>,
}

impl Registry {
    fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(100),
            objects: RwLock::new(HashMap::new()),
        }
    }

    fn register<T: Any + Send + Sync>(&self, object: T, object_type: ObjectType) -> Handle {
        let handle = self.next_handle.fetch_add(1, Ordering::SeqCst);
        let entry = ObjectEntry {
            object_type,
            object: Box::new(object),
        };
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle, entry);
        handle
    }

    fn with_object<T: Any + Send + Sync, R, F: FnOnce(&T) -> R>(
        &self,
        handle: Handle,
        f: F,
    ) -> Option<R> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        objects
            .get(&handle)
            .and_then(|entry| entry.object.downcast_ref::<T>())
            .map(f)
    }

    fn with_object_mut<T: Any + Send + Sync, R, F: FnOnce(&mut T) -> R>(
        &self,
        handle: Handle,
        f: F,
    ) -> Option<R> {
        let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        objects
            .get_mut(&handle)
            .and_then(|entry| entry.object.downcast_mut::<T>())
            .map(f)
    }

    fn get_type(&self, handle: Handle) -> ObjectType {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        objects
            .get(&handle)
            .map_or(ObjectType::Unknown, |e| e.object_type)
    }

    fn release(&self, handle: Handle, expected: Option<ObjectType>) -> bool {
        let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        match objects.get(&handle) {
            Some(entry) if expected.map_or(true, |t| t == entry.object_type) => {
                objects.remove(&handle);
                true
            }
            _ => false,
        }
    }

    fn count(&self) -> usize {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn clear(&self) {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

// ============================================================================
// Public API
// ============================================================================

/// Registers an object in the global registry and returns its handle.
pub fn register<T: Any + Send + Sync>(object: T, object_type: ObjectType) -> Handle {
    REGISTRY.register(object, object_type)
}

/// Accesses an object by handle with a callback.
///
/// Returns `None` if the handle is unknown or holds another type.
pub fn with_object<T: Any + Send + Sync, R, F: FnOnce(&T) -> R>(handle: Handle, f: F) -> Option<R> {
    REGISTRY.with_object(handle, f)
}

/// Accesses an object mutably by handle with a callback.
pub fn with_object_mut<T: Any + Send + Sync, R, F: FnOnce(&mut T) -> R>(
    handle: Handle,
    f: F,
) -> Option<R> {
    REGISTRY.with_object_mut(handle, f)
}

/// Like [`with_object`], recording an invalid-handle error on failure.
pub fn lookup<T: Any + Send + Sync, R, F: FnOnce(&T) -> R>(
    handle: Handle,
    expected: ObjectType,
    f: F,
) -> Option<R> {
    let result = REGISTRY.with_object(handle, f);
    if result.is_none() {
        set_last_error(format!("Invalid {} handle {handle}", expected.label()));
    }
    result
}

/// Gets the type of an object by handle.
pub fn get_type(handle: Handle) -> ObjectType {
    REGISTRY.get_type(handle)
}

/// Releases an object of type `expected` (any type when `None`).
///
/// Returns `true` if the object was found and released.
pub fn release(handle: Handle, expected: Option<ObjectType>) -> bool {
    REGISTRY.release(handle, expected)
}

/// Returns the number of objects in the registry.
pub fn object_count() -> usize {
    REGISTRY.count()
}

/// Clears all objects from the registry, invalidating every handle.
pub fn clear_all() {
    REGISTRY.clear();
}

// ============================================================================
// FFI Functions
// ============================================================================

/// Gets the type of an object by handle.
///
/// Returns the object type as an integer, 0 for invalid handles.
#[no_mangle]
pub extern "C" fn halox_object_type(handle: Handle) -> c_int {
    get_type(handle) as c_int
}

/// Releases any object by handle.
///
/// Returns `HALOX_OK`, or `HALOX_INVALID_HANDLE` if the handle was unknown.
#[no_mangle]
pub extern "C" fn halox_release(handle: Handle) -> c_int {
    if release(handle, None) {
        crate::HALOX_OK
    } else {
        crate::HALOX_INVALID_HANDLE
    }
}

/// Returns the number of live objects.
#[no_mangle]
pub extern "C" fn halox_object_count() -> c_int {
    c_int::try_from(object_count()).unwrap_or(c_int::MAX)
}

/// Releases every object.
#[no_mangle]
pub extern "C" fn halox_clear_all() {
    clear_all();
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        value: i32,
    }

    #[test]
    fn test_register_and_get() {
        let handle = register(Probe { value: 42 }, ObjectType::Occupation);

        assert!(handle >= 100);
        assert_eq!(get_type(handle), ObjectType::Occupation);
        assert_eq!(with_object::<Probe, _, _>(handle, |o| o.value), Some(42));

        with_object_mut::<Probe, _, _>(handle, |o| o.value = 7);
        assert_eq!(with_object::<Probe, _, _>(handle, |o| o.value), Some(7));

        assert!(release(handle, Some(ObjectType::Occupation)));
    }

    #[test]
    fn test_typed_release() {
        let handle = register(Probe { value: 1 }, ObjectType::Cosmology);
        assert!(!release(handle, Some(ObjectType::HaloModel)));
        assert_eq!(get_type(handle), ObjectType::Cosmology);
        assert!(release(handle, Some(ObjectType::Cosmology)));
        assert!(!release(handle, None));
    }

    #[test]
    fn test_wrong_type_is_none() {
        let handle = register(Probe { value: 3 }, ObjectType::Cosmology);
        assert_eq!(with_object::<String, _, _>(handle, String::len), None);
        assert_eq!(lookup::<String, _, _>(handle, ObjectType::Cosmology, String::len), None);
        release(handle, None);
    }

    #[test]
    fn test_invalid_handle() {
        assert_eq!(with_object::<Probe, _, _>(INVALID_HANDLE, |o| o.value), None);
        assert!(!release(INVALID_HANDLE, None));
        assert_eq!(get_type(INVALID_HANDLE), ObjectType::Unknown);
        assert_eq!(halox_release(INVALID_HANDLE), crate::HALOX_INVALID_HANDLE);
    }
}
