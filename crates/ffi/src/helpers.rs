use crate::error::{with_last_error_mut, CulvertError, CulvertErrorCode, DefaultCulvertError};
use std::ffi::{c_char, CStr, CString};
use std::slice;

/// Set the thread-local error message and code.
/// Accepts any type implementing `CulvertError` trait.
pub(crate) fn set_last_error(error: &impl CulvertError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl CulvertError) -> CulvertErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
/// Called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = CulvertErrorCode::Ok;
    });
}

/// Record the outcome of an FFI operation and return its code.
pub(crate) fn track_result(result: Result<(), DefaultCulvertError>) -> CulvertErrorCode {
    match result {
        Ok(()) => {
            clear_last_error();
            CulvertErrorCode::Ok
        }
        Err(error) => track_error(&error),
    }
}

/// Borrow a caller-owned `f64` array.
///
/// A zero `len` yields an empty slice regardless of `ptr`.
///
/// # Safety
/// When `len > 0`, `ptr` must be null or point to `len` initialized `f64`
/// values that stay valid for the lifetime `'a`.
pub(crate) unsafe fn f64_slice<'a>(
    ptr: *const f64,
    len: usize,
    param_name: &str,
) -> Result<&'a [f64], DefaultCulvertError> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(DefaultCulvertError::null_pointer(param_name));
    }
    Ok(unsafe { slice::from_raw_parts(ptr, len) })
}

/// Borrow a caller-owned, null-terminated UTF-8 string.
///
/// # Safety
/// `ptr` must be null or point to a valid null-terminated C string that
/// stays valid for the lifetime `'a`.
pub(crate) unsafe fn utf8_str<'a>(
    ptr: *const c_char,
    param_name: &str,
) -> Result<&'a str, DefaultCulvertError> {
    if ptr.is_null() {
        return Err(DefaultCulvertError::null_pointer(param_name));
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().map_err(|e| {
        DefaultCulvertError::invalid_parameter(format!(
            "Parameter '{param_name}' is not UTF-8: {e}"
        ))
    })
}
