use culvert_core::sizing::{size_by_california_table, TableSize};
use culvert_core::{Meters, ValidationError};

use crate::calculate::{horizon_from_code, shape_from_code};
use crate::error::{CulvertErrorCode, DefaultCulvertError};
use crate::helpers::{clear_last_error, track_error, track_result};

#[repr(C)]
/// One entry of a standard size ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CulvertStandardSizeC {
    /// Nominal size (diameter or span, mm).
    pub span_mm: u32,

    /// Rise (mm); equals the span for round pipe.
    pub rise_mm: u32,

    /// Full-barrel waterway area (m²).
    pub area: f64,
}

fn check_measurement(field: &'static str, value: f64) -> Result<(), DefaultCulvertError> {
    if !value.is_finite() {
        return Err(ValidationError::non_finite(field, value).into());
    }
    if value <= 0.0 {
        return Err(ValidationError::non_positive(field, value).into());
    }
    Ok(())
}

#[no_mangle]
/// Preset area multiplier for a planning horizon code, or NaN for an unknown code.
pub extern "C" fn culvert_climate_preset_factor(planning_horizon: u32) -> f64 {
    match horizon_from_code(planning_horizon) {
        Ok(horizon) => {
            clear_last_error();
            horizon.preset().factor
        }
        Err(error) => {
            track_error(&error);
            f64::NAN
        }
    }
}

#[no_mangle]
/// Number of standard sizes for a shape code, or 0 for an unknown code.
pub extern "C" fn culvert_standard_size_count(shape: u32) -> usize {
    match shape_from_code(shape) {
        Ok(shape) => {
            clear_last_error();
            shape.standard_sizes().len()
        }
        Err(error) => {
            track_error(&error);
            0
        }
    }
}

#[no_mangle]
/// Read one entry of a shape's standard size ladder (ascending).
///
/// Returns
/// - `CulvertErrorCode::Ok` (0) on success
/// - `CulvertErrorCode::NullPointer` if `out_size` is null
/// - `CulvertErrorCode::InvalidParameter` for an unknown shape code
/// - `CulvertErrorCode::IndexOutOfRange` if `index >= culvert_standard_size_count(shape)`
///
/// # Safety
///
/// `out_size` must be null or point to writable memory for a `CulvertStandardSizeC`.
pub unsafe extern "C" fn culvert_standard_size_at(
    shape: u32,
    index: usize,
    out_size: *mut CulvertStandardSizeC,
) -> CulvertErrorCode {
    if out_size.is_null() {
        return track_error(&DefaultCulvertError::null_pointer("out_size"));
    }

    track_result(shape_from_code(shape).and_then(|shape| {
        let sizes = shape.standard_sizes();
        let size = sizes
            .get(index)
            .ok_or_else(|| DefaultCulvertError::index_out_of_range(index, sizes.len()))?;
        unsafe {
            out_size.write(CulvertStandardSizeC {
                span_mm: size.span.value(),
                rise_mm: size.rise.value(),
                area: *size.area(),
            });
        }
        Ok(())
    }))
}

#[no_mangle]
/// Read the fine California Method table for an average width and depth (m).
///
/// Writes the round-pipe size in mm to `out_size_mm`, or 0 when the table
/// calls for a bridge.
///
/// Returns
/// - `CulvertErrorCode::Ok` (0) on success
/// - `CulvertErrorCode::NullPointer` if `out_size_mm` is null
/// - `CulvertErrorCode::ValidationFailed` if a measurement is not finite and positive
///
/// # Safety
///
/// `out_size_mm` must be null or point to a writable `u32`.
pub unsafe extern "C" fn culvert_california_table_lookup(
    width: f64,
    depth: f64,
    out_size_mm: *mut u32,
) -> CulvertErrorCode {
    if out_size_mm.is_null() {
        return track_error(&DefaultCulvertError::null_pointer("out_size_mm"));
    }

    let checked = check_measurement("width", width)
        .and_then(|()| check_measurement("depth", depth));

    track_result(checked.map(|()| {
        let lookup = size_by_california_table(Meters::new(width), Meters::new(depth));
        let size_mm = match lookup.size {
            TableSize::Size(mm) => mm.value(),
            TableSize::BridgeRequired => 0,
        };
        unsafe { out_size_mm.write(size_mm) };
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{culvert_get_last_error, culvert_get_last_error_code};

    #[test]
    fn test_preset_factors() {
        assert_eq!(culvert_climate_preset_factor(0), 1.10);
        assert_eq!(culvert_climate_preset_factor(1), 1.20);
        assert_eq!(culvert_climate_preset_factor(2), 1.30);
        assert_eq!(culvert_climate_preset_factor(3), 1.25);
        assert!(culvert_climate_preset_factor(4).is_nan());
    }

    #[test]
    fn test_standard_size_ladder() {
        let count = culvert_standard_size_count(0);
        assert!(count > 0);
        assert_eq!(culvert_standard_size_count(9), 0);

        let mut previous = 0.0;
        for index in 0..count {
            let mut size = CulvertStandardSizeC {
                span_mm: 0,
                rise_mm: 0,
                area: 0.0,
            };
            let code = unsafe { culvert_standard_size_at(0, index, &mut size) };
            assert_eq!(code, CulvertErrorCode::Ok);
            assert!(size.area > previous);
            previous = size.area;
        }

        let mut size = CulvertStandardSizeC {
            span_mm: 0,
            rise_mm: 0,
            area: 0.0,
        };
        let code = unsafe { culvert_standard_size_at(0, count, &mut size) };
        assert_eq!(code, CulvertErrorCode::IndexOutOfRange);
    }

    #[test]
    fn test_successful_query_clears_previous_error() {
        assert!(culvert_climate_preset_factor(99).is_nan());
        assert_eq!(culvert_get_last_error_code(), CulvertErrorCode::InvalidParameter);
        assert!(!culvert_get_last_error().is_null());

        assert_eq!(culvert_climate_preset_factor(1), 1.20);
        assert_eq!(culvert_get_last_error_code(), CulvertErrorCode::Ok);
        assert!(culvert_get_last_error().is_null());

        assert_eq!(culvert_standard_size_count(99), 0);
        assert!(!culvert_get_last_error().is_null());

        assert!(culvert_standard_size_count(1) > 0);
        assert_eq!(culvert_get_last_error_code(), CulvertErrorCode::Ok);
        assert!(culvert_get_last_error().is_null());
    }

    #[test]
    fn test_table_lookup() {
        let mut size_mm = 0;
        let code = unsafe { culvert_california_table_lookup(2.0, 0.4, &mut size_mm) };
        assert_eq!(code, CulvertErrorCode::Ok);
        assert_eq!(size_mm, 1700);

        let code = unsafe { culvert_california_table_lookup(5.5, 0.2, &mut size_mm) };
        assert_eq!(code, CulvertErrorCode::Ok);
        assert_eq!(size_mm, 0);

        let code = unsafe { culvert_california_table_lookup(f64::NAN, 0.2, &mut size_mm) };
        assert_eq!(code, CulvertErrorCode::ValidationFailed);
    }
}
