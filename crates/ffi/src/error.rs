use culvert_core::ValidationError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait CulvertError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> CulvertErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `CulvertError` for common FFI error scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultCulvertError {
    code: CulvertErrorCode,
    msg: String,
}

impl DefaultCulvertError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_result"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: CulvertErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for invalid parameter.
    ///
    /// # Arguments
    /// * `message` - Description of the error
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: CulvertErrorCode::InvalidParameter,
            msg: message,
        }
    }

    /// Create error for an index past the end of a table.
    ///
    /// # Arguments
    /// * `index` - The requested index
    /// * `len` - Number of entries available
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self {
            code: CulvertErrorCode::IndexOutOfRange,
            msg: format!("Index {index} out of range for table of {len} entries"),
        }
    }
}

impl From<ValidationError> for DefaultCulvertError {
    fn from(error: ValidationError) -> Self {
        Self {
            code: CulvertErrorCode::ValidationFailed,
            msg: error.to_string(),
        }
    }
}

impl CulvertError for DefaultCulvertError {
    fn code(&self) -> CulvertErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by culvert sizing functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CulvertErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Invalid parameter passed to function (bad enum value, malformed JSON, bad UTF-8).
    InvalidParameter = 2,

    /// A measurement or sizing input was missing, non-finite or not positive.
    ValidationFailed = 3,

    /// Table index past the last entry.
    IndexOutOfRange = 4,
}

impl From<DefaultCulvertError> for CulvertErrorCode {
    fn from(error: DefaultCulvertError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// The CString is stored to keep the returned pointer valid.
    static LAST_ERROR: RefCell<(Option<CString>, CulvertErrorCode)> = const { RefCell::new((None, CulvertErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, CulvertErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, CulvertErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```cpp
/// CulvertResultC result;
/// CulvertErrorCode err = culvert_calculate(&request, &result);
/// if (err != Ok) {
///     const char* error = culvert_get_last_error();
///     if (error) {
///         printf("Sizing failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn culvert_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `CulvertErrorCode::Ok` (0) if the last call on this thread succeeded.
#[no_mangle]
pub extern "C" fn culvert_get_last_error_code() -> CulvertErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
