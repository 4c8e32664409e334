use culvert_core::sizing::TableSize;
use culvert_core::{
    calculate_culvert, ClimateFactorConfig, CulvertSizingResult, DebrisAssessmentInput,
    GoverningMethod, HazardClass, MitigationStrategy, PipeShape, PlanningHorizon, SizingMethod,
    SizingRequest,
};
use std::ffi::{c_char, CString};
use std::ptr;

use crate::error::{CulvertErrorCode, DefaultCulvertError};
use crate::helpers::{f64_slice, track_error, track_result, utf8_str};

/// Decode a shape code: 0 = circular, 1 = pipe-arch, 2 = box.
pub(crate) fn shape_from_code(code: u32) -> Result<PipeShape, DefaultCulvertError> {
    PipeShape::ALL
        .get(code as usize)
        .copied()
        .ok_or_else(|| DefaultCulvertError::invalid_parameter(format!("Unknown shape code {code}")))
}

/// Decode a planning horizon code in [`PlanningHorizon::ALL`] order.
pub(crate) fn horizon_from_code(code: u32) -> Result<PlanningHorizon, DefaultCulvertError> {
    PlanningHorizon::ALL.get(code as usize).copied().ok_or_else(|| {
        DefaultCulvertError::invalid_parameter(format!("Unknown planning horizon code {code}"))
    })
}

fn method_from_code(code: u32) -> Result<SizingMethod, DefaultCulvertError> {
    match code {
        0 => Ok(SizingMethod::California),
        1 => Ok(SizingMethod::Hydraulic),
        2 => Ok(SizingMethod::Comparison),
        _ => Err(DefaultCulvertError::invalid_parameter(format!(
            "Unknown sizing method code {code}"
        ))),
    }
}

fn mitigation_from_code(code: u32) -> Result<MitigationStrategy, DefaultCulvertError> {
    match code {
        0 => Ok(MitigationStrategy::Upsize),
        1 => Ok(MitigationStrategy::Cleanout),
        _ => Err(DefaultCulvertError::invalid_parameter(format!(
            "Unknown mitigation code {code}"
        ))),
    }
}

#[repr(C)]
/// Sizing inputs from C callers.
///
/// Enumerations are passed as integer codes so an out-of-range value is
/// reported as `InvalidParameter` instead of being undefined behavior.
pub struct CulvertRequestC {
    /// Top width readings (m).
    pub top_widths: *const f64,
    pub top_width_count: usize,

    /// Bottom width readings (m); read only when `use_bottom_width` is set.
    pub bottom_widths: *const f64,
    pub bottom_width_count: usize,

    /// Bankfull depth readings (m).
    pub depths: *const f64,
    pub depth_count: usize,

    pub use_bottom_width: bool,

    /// Channel slope (m/m). NaN when no slope was measured.
    pub slope: f64,

    /// Manning n of the channel (typically 0.035).
    pub stream_roughness: f64,

    /// Manning n of the barrel (typically 0.024).
    pub pipe_roughness: f64,

    /// Allowed headwater over rise (typically 1.5).
    pub max_headwater_ratio: f64,

    pub fish_passage: bool,

    /// 0 = California, 1 = hydraulic, 2 = comparison.
    pub method: u32,

    /// 0 = circular, 1 = pipe-arch, 2 = box.
    pub shape: u32,

    pub climate_enabled: bool,

    /// 0 = present-2030, 1 = 2050, 2 = 2080+ coastal, 3 = 2080+ interior.
    pub planning_horizon: u32,

    /// Site-specific climate multiplier (≥ 1.0). Zero uses the horizon preset.
    pub climate_multiplier: f64,

    pub debris_enabled: bool,
    pub debris_flow_evidence: bool,
    pub large_woody_debris: bool,
    pub unstable_banks: bool,
    pub steep_upstream_gradient: bool,
    pub recent_disturbance: bool,

    /// 0 = upsize, 1 = cleanout.
    pub mitigation: u32,
}

/// Hazard class of the debris assessment.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CulvertHazardClass {
    /// Debris assessment was not enabled.
    NotAssessed = 0,
    Low = 1,
    Moderate = 2,
    High = 3,
}

/// Method whose size was recommended.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CulvertGoverningMethod {
    California = 0,
    Hydraulic = 1,
}

#[repr(C)]
/// Flat summary of a sizing result.
/// Keep this layout stable for C/C++/C# consumers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CulvertResultC {
    /// Recommended nominal size (diameter or span, mm).
    pub final_span_mm: u32,

    /// Recommended rise (mm); equals the span for round pipe.
    pub final_rise_mm: u32,

    pub governing_method: CulvertGoverningMethod,

    /// Bankfull cross-sectional area (m²).
    pub cross_sectional_area: f64,

    /// Three times the bankfull area (m²).
    pub base_required_area: f64,

    /// Required area after climate and debris allowances (m²).
    pub final_required_area: f64,

    /// Fine California table size (mm); 0 when the table calls for a bridge.
    pub table_size_mm: u32,

    /// Whether the hydraulic check ran.
    pub hydraulic_available: bool,

    /// Design discharge (m³/s); 0 when the hydraulic check did not run.
    pub design_discharge: f64,

    /// Headwater ratio of the hydraulic size; 0 when the check did not run.
    pub headwater_ratio: f64,

    pub hydraulic_criteria_met: bool,

    pub hazard_class: CulvertHazardClass,

    /// Fish passage embedment (m); 0 when fish passage was not requested.
    pub embed_depth: f64,

    pub requires_engineering_review: bool,

    /// Number of warning messages on the full result.
    pub warning_count: usize,
}

impl From<&CulvertSizingResult> for CulvertResultC {
    fn from(result: &CulvertSizingResult) -> Self {
        let table_size_mm = match result.table_lookup.size {
            TableSize::Size(mm) => mm.value(),
            TableSize::BridgeRequired => 0,
        };
        let hazard_class = match result.debris.map(|debris| debris.hazard_class) {
            None => CulvertHazardClass::NotAssessed,
            Some(HazardClass::Low) => CulvertHazardClass::Low,
            Some(HazardClass::Moderate) => CulvertHazardClass::Moderate,
            Some(HazardClass::High) => CulvertHazardClass::High,
        };
        let hydraulic = result.hydraulic.as_ref();

        Self {
            final_span_mm: result.final_size.span.value(),
            final_rise_mm: result.final_size.rise.value(),
            governing_method: match result.governing_method {
                GoverningMethod::California => CulvertGoverningMethod::California,
                GoverningMethod::Hydraulic => CulvertGoverningMethod::Hydraulic,
            },
            cross_sectional_area: *result.geometry.cross_sectional_area,
            base_required_area: *result.california.base_area,
            final_required_area: *result.california.final_area,
            table_size_mm,
            hydraulic_available: hydraulic.is_some(),
            design_discharge: hydraulic.map_or(0.0, |check| *check.channel.design_discharge),
            headwater_ratio: hydraulic.map_or(0.0, |check| check.sizing.headwater_ratio),
            hydraulic_criteria_met: hydraulic.is_some_and(|check| check.sizing.criteria_met),
            hazard_class,
            embed_depth: result
                .fish_passage
                .as_ref()
                .map_or(0.0, |fish| *fish.embed_depth),
            requires_engineering_review: result.requires_engineering_review,
            warning_count: result.warnings.len(),
        }
    }
}

/// Build a core request from the C layout.
///
/// # Safety
/// Every non-null array pointer must reference at least its count of `f64`.
unsafe fn request_from_c(request: &CulvertRequestC) -> Result<SizingRequest, DefaultCulvertError> {
    let top_widths =
        unsafe { f64_slice(request.top_widths, request.top_width_count, "top_widths") }?;
    let depths = unsafe { f64_slice(request.depths, request.depth_count, "depths") }?;
    let bottom_widths = if request.use_bottom_width {
        unsafe {
            f64_slice(
                request.bottom_widths,
                request.bottom_width_count,
                "bottom_widths",
            )
        }?
        .to_vec()
    } else {
        Vec::new()
    };

    let climate = if request.climate_enabled {
        let horizon = horizon_from_code(request.planning_horizon)?;
        Some(if request.climate_multiplier == 0.0 {
            ClimateFactorConfig::from_preset(horizon)
        } else {
            ClimateFactorConfig::with_multiplier(horizon, request.climate_multiplier)?
        })
    } else {
        None
    };

    let debris = if request.debris_enabled {
        Some(DebrisAssessmentInput {
            debris_flow_evidence: request.debris_flow_evidence,
            large_woody_debris: request.large_woody_debris,
            unstable_banks: request.unstable_banks,
            steep_upstream_gradient: request.steep_upstream_gradient,
            recent_disturbance: request.recent_disturbance,
            mitigation: mitigation_from_code(request.mitigation)?,
        })
    } else {
        None
    };

    Ok(SizingRequest {
        top_widths: top_widths.to_vec(),
        bottom_widths,
        depths: depths.to_vec(),
        use_bottom_width: request.use_bottom_width,
        slope: (!request.slope.is_nan()).then_some(request.slope),
        stream_roughness: request.stream_roughness,
        pipe_roughness: request.pipe_roughness,
        max_headwater_ratio: request.max_headwater_ratio,
        fish_passage: request.fish_passage,
        method: method_from_code(request.method)?,
        shape: shape_from_code(request.shape)?,
        climate,
        debris,
    })
}

#[no_mangle]
/// Size a culvert and write a flat summary to `out_result`.
///
/// Returns
/// - `CulvertErrorCode::Ok` (0) on success; `out_result` is written
/// - `CulvertErrorCode::NullPointer` if `request`, `out_result` or a non-empty array is null
/// - `CulvertErrorCode::InvalidParameter` for an unknown enumeration code
/// - `CulvertErrorCode::ValidationFailed` when a measurement or required input is invalid
///
/// Call `culvert_get_last_error` for the message.
///
/// # Safety
///
/// - `request` must be null or point to a valid `CulvertRequestC`.
/// - Each array pointer in the request must be null or reference at least its count of `f64`.
/// - `out_result` must be null or point to writable memory for a `CulvertResultC`.
///
/// # Example Usage (C)
/// ```c
/// double widths[] = {2.0, 2.1, 1.9};
/// double depths[] = {0.4, 0.35, 0.45};
/// CulvertRequestC req = {0};
/// req.top_widths = widths; req.top_width_count = 3;
/// req.depths = depths; req.depth_count = 3;
/// req.slope = NAN;
/// CulvertResultC out;
/// if (culvert_calculate(&req, &out) == Ok) {
///     printf("%u mm\n", out.final_span_mm);
/// }
/// ```
pub unsafe extern "C" fn culvert_calculate(
    request: *const CulvertRequestC,
    out_result: *mut CulvertResultC,
) -> CulvertErrorCode {
    if request.is_null() {
        return track_error(&DefaultCulvertError::null_pointer("request"));
    }
    if out_result.is_null() {
        return track_error(&DefaultCulvertError::null_pointer("out_result"));
    }

    let request = unsafe { &*request };
    track_result(unsafe { request_from_c(request) }.and_then(|request| {
        let result = calculate_culvert(&request)?;
        unsafe { out_result.write(CulvertResultC::from(&result)) };
        Ok(())
    }))
}

#[no_mangle]
/// Size a culvert from a JSON request and return the full JSON result.
///
/// The request uses the same field names as the core `SizingRequest`; every
/// field except the readings is optional. On success `out_json` receives an
/// owned string that must be released with `culvert_string_free`.
///
/// Returns
/// - `CulvertErrorCode::Ok` (0) on success
/// - `CulvertErrorCode::NullPointer` if `request_json` or `out_json` is null
/// - `CulvertErrorCode::InvalidParameter` if the request is not valid UTF-8 or JSON
/// - `CulvertErrorCode::ValidationFailed` when a measurement or required input is invalid
///
/// # Safety
///
/// - `request_json` must be null or a valid null-terminated C string.
/// - `out_json` must be null or point to writable memory for a `char*`.
pub unsafe extern "C" fn culvert_calculate_json(
    request_json: *const c_char,
    out_json: *mut *mut c_char,
) -> CulvertErrorCode {
    if out_json.is_null() {
        return track_error(&DefaultCulvertError::null_pointer("out_json"));
    }
    unsafe { out_json.write(ptr::null_mut()) };

    track_result(
        unsafe { utf8_str(request_json, "request_json") }.and_then(|text| {
            let request: SizingRequest = serde_json::from_str(text).map_err(|e| {
                DefaultCulvertError::invalid_parameter(format!("Malformed request JSON: {e}"))
            })?;
            let result = calculate_culvert(&request)?;
            let json = serde_json::to_string(&result).map_err(|e| {
                DefaultCulvertError::invalid_parameter(format!("Result serialization failed: {e}"))
            })?;
            let json = CString::new(json).map_err(|e| {
                DefaultCulvertError::invalid_parameter(format!("Result contains NUL byte: {e}"))
            })?;
            unsafe { out_json.write(json.into_raw()) };
            Ok(())
        }),
    )
}

#[no_mangle]
/// Release a string returned by `culvert_calculate_json`. Null is ignored.
///
/// # Safety
///
/// `json` must be null or a pointer returned by `culvert_calculate_json` that
/// has not already been freed.
pub unsafe extern "C" fn culvert_string_free(json: *mut c_char) {
    if !json.is_null() {
        drop(unsafe { CString::from_raw(json) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{culvert_get_last_error, culvert_get_last_error_code};
    use std::ffi::CStr;

    fn request(widths: &[f64], depths: &[f64]) -> CulvertRequestC {
        CulvertRequestC {
            top_widths: widths.as_ptr(),
            top_width_count: widths.len(),
            bottom_widths: ptr::null(),
            bottom_width_count: 0,
            depths: depths.as_ptr(),
            depth_count: depths.len(),
            use_bottom_width: false,
            slope: f64::NAN,
            stream_roughness: 0.035,
            pipe_roughness: 0.024,
            max_headwater_ratio: 1.5,
            fish_passage: false,
            method: 0,
            shape: 0,
            climate_enabled: false,
            planning_horizon: 0,
            climate_multiplier: 0.0,
            debris_enabled: false,
            debris_flow_evidence: false,
            large_woody_debris: false,
            unstable_banks: false,
            steep_upstream_gradient: false,
            recent_disturbance: false,
            mitigation: 0,
        }
    }

    fn calculate(request: &CulvertRequestC) -> (CulvertErrorCode, Option<CulvertResultC>) {
        let mut out = std::mem::MaybeUninit::<CulvertResultC>::uninit();
        let code = unsafe { culvert_calculate(request, out.as_mut_ptr()) };
        let result = (code == CulvertErrorCode::Ok).then(|| unsafe { out.assume_init() });
        (code, result)
    }

    #[test]
    fn test_calculate_end_to_end() {
        let widths = [2.0, 2.1, 1.9];
        let depths = [0.4, 0.35, 0.45];
        let (code, result) = calculate(&request(&widths, &depths));
        assert_eq!(code, CulvertErrorCode::Ok);
        let result = result.unwrap();
        assert_eq!(result.final_span_mm, 1700);
        assert_eq!(result.governing_method, CulvertGoverningMethod::California);
        assert_eq!(result.hazard_class, CulvertHazardClass::NotAssessed);
        assert!(!result.hydraulic_available);
        assert!(culvert_get_last_error().is_null());
    }

    #[test]
    fn test_validation_failure_sets_last_error() {
        let widths = [2.0];
        let depths = [0.0];
        let (code, result) = calculate(&request(&widths, &depths));
        assert_eq!(code, CulvertErrorCode::ValidationFailed);
        assert!(result.is_none());
        assert_eq!(culvert_get_last_error_code(), CulvertErrorCode::ValidationFailed);
        let message = unsafe { CStr::from_ptr(culvert_get_last_error()) };
        assert!(message.to_str().unwrap().contains("depth"));
    }

    #[test]
    fn test_unknown_codes_are_rejected() {
        let widths = [2.0];
        let depths = [0.4];
        let mut bad_method = request(&widths, &depths);
        bad_method.method = 7;
        assert_eq!(calculate(&bad_method).0, CulvertErrorCode::InvalidParameter);

        let mut bad_shape = request(&widths, &depths);
        bad_shape.shape = 3;
        assert_eq!(calculate(&bad_shape).0, CulvertErrorCode::InvalidParameter);
    }

    #[test]
    fn test_null_pointers() {
        let mut out = std::mem::MaybeUninit::<CulvertResultC>::uninit();
        let code = unsafe { culvert_calculate(ptr::null(), out.as_mut_ptr()) };
        assert_eq!(code, CulvertErrorCode::NullPointer);

        let depths = [0.4];
        let mut missing_widths = request(&[], &depths);
        missing_widths.top_widths = ptr::null();
        missing_widths.top_width_count = 2;
        assert_eq!(calculate(&missing_widths).0, CulvertErrorCode::NullPointer);
    }

    #[test]
    fn test_hydraulic_without_slope_fails() {
        let widths = [2.0];
        let depths = [0.4];
        let mut hydraulic = request(&widths, &depths);
        hydraulic.method = 1;
        assert_eq!(calculate(&hydraulic).0, CulvertErrorCode::ValidationFailed);

        hydraulic.slope = 0.02;
        let (code, result) = calculate(&hydraulic);
        assert_eq!(code, CulvertErrorCode::Ok);
        let result = result.unwrap();
        assert!(result.hydraulic_available);
        assert_eq!(result.governing_method, CulvertGoverningMethod::Hydraulic);
    }

    #[test]
    fn test_adjustments_and_debris_class() {
        let widths = [2.0];
        let depths = [0.4];
        let mut adjusted = request(&widths, &depths);
        adjusted.climate_enabled = true;
        adjusted.planning_horizon = 1;
        adjusted.debris_enabled = true;
        adjusted.debris_flow_evidence = true;
        adjusted.large_woody_debris = true;
        adjusted.unstable_banks = true;
        adjusted.steep_upstream_gradient = true;

        let result = calculate(&adjusted).1.unwrap();
        assert_eq!(result.hazard_class, CulvertHazardClass::High);
        assert!(result.requires_engineering_review);
        assert!(result.final_required_area > result.base_required_area);

        adjusted.climate_multiplier = 0.5;
        assert_eq!(calculate(&adjusted).0, CulvertErrorCode::ValidationFailed);
    }

    #[test]
    fn test_json_round_trip() {
        let input = CString::new(r#"{"top_widths":[2.0],"depths":[0.4],"fish_passage":true}"#)
            .unwrap();
        let mut out: *mut c_char = ptr::null_mut();
        let code = unsafe { culvert_calculate_json(input.as_ptr(), &mut out) };
        assert_eq!(code, CulvertErrorCode::Ok);
        assert!(!out.is_null());

        let json = unsafe { CStr::from_ptr(out) }.to_str().unwrap().to_owned();
        unsafe { culvert_string_free(out) };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["final_size"]["span"], 1700);
        assert!(value["fish_passage"]["embed_depth"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_json_malformed() {
        let input = CString::new("{not json").unwrap();
        let mut out: *mut c_char = ptr::null_mut();
        let code = unsafe { culvert_calculate_json(input.as_ptr(), &mut out) };
        assert_eq!(code, CulvertErrorCode::InvalidParameter);
        assert!(out.is_null());
    }
}
