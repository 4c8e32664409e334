//! Culvert sizing calculator
//!
//! [`calculate_culvert`] is the single entry point the form layer calls. It
//! validates the request, derives the stream geometry, runs the California
//! Method (with any enabled climate and debris allowances) and the Manning
//! hydraulic check, and picks the governing size according to
//! [`SizingMethod`].
//!
//! The result is a full calculation trace: every intermediate area, flow,
//! ratio and per-stage size is kept so the report can show its working.
//!
//! # Example
//!
//! ```
//! use culvert_core::{calculate_culvert, SizingMethod, SizingRequest};
//!
//! let request = SizingRequest::new(vec![2.0, 2.1, 1.9], vec![0.4, 0.35, 0.45])
//!     .with_method(SizingMethod::California);
//! let result = calculate_culvert(&request).unwrap();
//! assert_eq!(result.final_size_mm(), 1700);
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::climate::ClimateFactorConfig;
use crate::core_types::units::Meters;
use crate::debris::{classify_debris_hazard, DebrisAssessmentInput, DebrisHazardResult};
use crate::error::{require_positive, ValidationError};
use crate::geometry::{compute_geometry, StreamGeometry};
use crate::sizing::{
    apply_adjustments, channel_flow, required_area, size_by_california_table,
    size_by_coarse_table, size_by_manning, AdjustedCaliforniaSizing, CaliforniaTableResult,
    ChannelFlow, CoarseTableResult, HydraulicSizing, DEFAULT_MAX_HEADWATER_RATIO,
    DEFAULT_PIPE_ROUGHNESS, DEFAULT_STREAM_ROUGHNESS,
};
use crate::tables::{PipeShape, StandardSize};

/// Fraction of the barrel rise buried below the streambed for fish passage
pub const FISH_PASSAGE_EMBED_FRACTION: f64 = 0.20;

/// Which method decides the recommended size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingMethod {
    /// California Method with adjustments governs; hydraulic shown if a slope was given
    #[default]
    California,
    /// Manning hydraulic check governs; requires a slope
    Hydraulic,
    /// Larger of the two governs; requires a slope
    Comparison,
}

impl SizingMethod {
    /// Whether this method cannot run without the hydraulic check
    pub fn requires_hydraulic(self) -> bool {
        matches!(self, SizingMethod::Hydraulic | SizingMethod::Comparison)
    }
}

/// Everything needed for one sizing calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingRequest {
    /// Channel top width readings (m)
    pub top_widths: Vec<f64>,
    /// Channel bottom width readings (m), used only if `use_bottom_width`
    pub bottom_widths: Vec<f64>,
    /// Bankfull depth readings (m)
    pub depths: Vec<f64>,
    /// Use measured bottom widths instead of estimating 0.7 × top width
    pub use_bottom_width: bool,
    /// Channel slope (m/m)
    pub slope: Option<f64>,
    /// Manning n of the natural channel
    pub stream_roughness: f64,
    /// Manning n of the culvert barrel
    pub pipe_roughness: f64,
    /// Allowed headwater over barrel rise
    pub max_headwater_ratio: f64,
    pub fish_passage: bool,
    pub method: SizingMethod,
    pub shape: PipeShape,
    pub climate: Option<ClimateFactorConfig>,
    pub debris: Option<DebrisAssessmentInput>,
}

impl Default for SizingRequest {
    fn default() -> Self {
        Self {
            top_widths: Vec::new(),
            bottom_widths: Vec::new(),
            depths: Vec::new(),
            use_bottom_width: false,
            slope: None,
            stream_roughness: DEFAULT_STREAM_ROUGHNESS,
            pipe_roughness: DEFAULT_PIPE_ROUGHNESS,
            max_headwater_ratio: DEFAULT_MAX_HEADWATER_RATIO,
            fish_passage: false,
            method: SizingMethod::California,
            shape: PipeShape::Circular,
            climate: None,
            debris: None,
        }
    }
}

impl SizingRequest {
    /// Request from top width and depth readings, everything else at defaults
    pub fn new(top_widths: Vec<f64>, depths: Vec<f64>) -> Self {
        Self {
            top_widths,
            depths,
            ..Self::default()
        }
    }

    /// Use measured bottom widths
    pub fn with_bottom_widths(mut self, bottom_widths: Vec<f64>) -> Self {
        self.bottom_widths = bottom_widths;
        self.use_bottom_width = true;
        self
    }

    pub fn with_slope(mut self, slope: f64) -> Self {
        self.slope = Some(slope);
        self
    }

    pub fn with_method(mut self, method: SizingMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_shape(mut self, shape: PipeShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_roughness(mut self, stream_roughness: f64, pipe_roughness: f64) -> Self {
        self.stream_roughness = stream_roughness;
        self.pipe_roughness = pipe_roughness;
        self
    }

    pub fn with_max_headwater_ratio(mut self, ratio: f64) -> Self {
        self.max_headwater_ratio = ratio;
        self
    }

    pub fn with_fish_passage(mut self, fish_passage: bool) -> Self {
        self.fish_passage = fish_passage;
        self
    }

    pub fn with_climate(mut self, climate: ClimateFactorConfig) -> Self {
        self.climate = Some(climate);
        self
    }

    pub fn with_debris(mut self, debris: DebrisAssessmentInput) -> Self {
        self.debris = Some(debris);
        self
    }

    /// Slope to run the hydraulic check with, if it will run at all.
    ///
    /// Hydraulic and comparison methods always run it; the California method
    /// runs it for display only when a usable slope was measured.
    ///
    /// # Errors
    /// Returns [`ValidationError`] when the method requires the hydraulic check
    /// and the slope is missing, non-finite or not positive.
    fn hydraulic_slope(&self) -> Result<Option<f64>, ValidationError> {
        if self.method.requires_hydraulic() {
            let slope = self.slope.ok_or_else(|| ValidationError::missing("slope"))?;
            return require_positive("slope", slope).map(Some);
        }
        Ok(self.slope.filter(|slope| slope.is_finite() && *slope > 0.0))
    }

    /// Check every non-measurement input before any calculation runs.
    ///
    /// # Errors
    /// Returns [`ValidationError`] for an invalid climate multiplier, or for a
    /// missing/invalid slope, roughness or headwater ratio when the hydraulic
    /// check will run.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(climate) = &self.climate {
            climate.validate()?;
        }
        if self.hydraulic_slope()?.is_some() {
            require_positive("stream roughness", self.stream_roughness)?;
            require_positive("pipe roughness", self.pipe_roughness)?;
            require_positive("max headwater ratio", self.max_headwater_ratio)?;
        }
        Ok(())
    }
}

/// Method whose size was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoverningMethod {
    California,
    Hydraulic,
}

/// Channel flows plus the hydraulic size search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydraulicCheck {
    pub slope: f64,
    pub channel: ChannelFlow,
    pub sizing: HydraulicSizing,
}

/// Embedment guidance when the crossing must pass fish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishPassage {
    pub embed_depth: Meters,
    pub note: String,
}

/// Complete, immutable outcome of one calculation.
///
/// The reporting layer renders this as-is; keep its shape stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulvertSizingResult {
    pub method: SizingMethod,
    pub shape: PipeShape,
    pub geometry: StreamGeometry,
    /// Fine California table reading (display and cross-check)
    pub table_lookup: CaliforniaTableResult,
    /// Coarse explanation table reading
    pub coarse_table: CoarseTableResult,
    pub climate: Option<ClimateFactorConfig>,
    pub debris: Option<DebrisHazardResult>,
    /// Area-variant California Method with adjustment stages
    pub california: AdjustedCaliforniaSizing,
    /// Absent only when the California method ran without a usable slope
    pub hydraulic: Option<HydraulicCheck>,
    pub final_size: StandardSize,
    pub governing_method: GoverningMethod,
    pub fish_passage: Option<FishPassage>,
    /// A bridge, oversize structure or professional assessment may be needed
    pub requires_engineering_review: bool,
    /// Messages that must be shown prominently alongside the recommendation
    pub warnings: Vec<String>,
}

impl CulvertSizingResult {
    /// Nominal size (diameter or span) of the recommendation
    pub fn final_size_mm(&self) -> u32 {
        self.final_size.span.value()
    }
}

fn fish_passage_for(size: &StandardSize) -> FishPassage {
    let embed_depth = size.rise.to_meters() * FISH_PASSAGE_EMBED_FRACTION;
    FishPassage {
        embed_depth,
        note: format!(
            "Embed the invert {} below the streambed ({:.0}% of the {} rise) and backfill with native streambed material",
            embed_depth,
            FISH_PASSAGE_EMBED_FRACTION * 100.0,
            size.rise
        ),
    }
}

fn hydraulic_check(
    request: &SizingRequest,
    geometry: &StreamGeometry,
    slope: f64,
) -> Result<HydraulicCheck, ValidationError> {
    let channel = channel_flow(geometry, request.stream_roughness, slope)?;
    let sizing = size_by_manning(
        channel.design_discharge,
        slope,
        request.pipe_roughness,
        request.max_headwater_ratio,
        request.shape,
    )?;
    Ok(HydraulicCheck {
        slope,
        channel,
        sizing,
    })
}

/// Run one culvert sizing calculation.
///
/// # Errors
/// Returns [`ValidationError`] when a required input is missing, non-finite or
/// not positive. Oversize crossings are not errors: they come back as a
/// flagged result with `warnings` explaining what to do.
pub fn calculate_culvert(request: &SizingRequest) -> Result<CulvertSizingResult, ValidationError> {
    request.validate()?;
    let hydraulic_slope = request.hydraulic_slope()?;

    let geometry = compute_geometry(
        &request.top_widths,
        &request.bottom_widths,
        &request.depths,
        request.use_bottom_width,
    )?;

    let mut warnings = Vec::new();

    let table_lookup =
        size_by_california_table(geometry.average_top_width, geometry.average_depth);
    if table_lookup.is_bridge_required() {
        warnings.push(table_lookup.note.clone());
    }
    let coarse_table = size_by_coarse_table(geometry.average_top_width, geometry.average_depth);

    let debris = request.debris.as_ref().map(classify_debris_hazard);
    if let Some(hazard) = &debris {
        if hazard.requires_professional_review {
            warnings.push(format!(
                "{} debris hazard ({} red flags): professional review required. {}",
                hazard.hazard_class.label(),
                hazard.red_flag_count,
                hazard.mitigation_strategy.guidance()
            ));
        }
    }

    let california = apply_adjustments(
        required_area(geometry.cross_sectional_area),
        request.shape,
        request.climate.as_ref(),
        debris.as_ref(),
    );
    if california.exceeds_ladder {
        warnings.push(format!(
            "Required area {} exceeds the largest standard {} size; consider a bridge or consult an engineer",
            california.final_area,
            request.shape.label()
        ));
    }

    let hydraulic = match hydraulic_slope {
        Some(slope) => match hydraulic_check(request, &geometry, slope) {
            Ok(check) => {
                if let Some(message) = &check.sizing.message {
                    warnings.push(message.clone());
                }
                Some(check)
            }
            // Display-only in California mode; the table and area sizing still stand
            Err(error) if !request.method.requires_hydraulic() => {
                warn!("Hydraulic check skipped: {}", error);
                warnings.push(format!("Hydraulic check skipped: {error}"));
                None
            }
            Err(error) => return Err(error),
        },
        None => {
            if request.slope.is_some() {
                warnings.push(
                    "Measured slope is not a positive number; hydraulic check skipped".to_string(),
                );
            }
            None
        }
    };

    let (final_size, governing_method) = match (request.method, &hydraulic) {
        (SizingMethod::Hydraulic, Some(check)) => (check.sizing.size, GoverningMethod::Hydraulic),
        (SizingMethod::Comparison, Some(check))
            if check.sizing.size.span > california.final_size.span =>
        {
            (check.sizing.size, GoverningMethod::Hydraulic)
        }
        _ => (california.final_size, GoverningMethod::California),
    };

    let fish_passage = request.fish_passage.then(|| fish_passage_for(&final_size));

    let requires_engineering_review = table_lookup.is_bridge_required()
        || california.exceeds_ladder
        || debris.is_some_and(|hazard| hazard.requires_professional_review)
        || hydraulic
            .as_ref()
            .is_some_and(|check| !check.sizing.criteria_met);

    for message in &warnings {
        warn!("{}", message);
    }
    info!(
        "Culvert sizing ({:?}): {} governed by {:?}",
        request.method, final_size, governing_method
    );

    Ok(CulvertSizingResult {
        method: request.method,
        shape: request.shape,
        geometry,
        table_lookup,
        coarse_table,
        climate: request.climate,
        debris,
        california,
        hydraulic,
        final_size,
        governing_method,
        fish_passage,
        requires_engineering_review,
        warnings,
    })
}

/// Size many crossings in parallel.
///
/// Results are returned in input order; each request succeeds or fails on its own.
pub fn calculate_culverts(
    requests: &[SizingRequest],
) -> Vec<Result<CulvertSizingResult, ValidationError>> {
    requests.par_iter().map(calculate_culvert).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::PlanningHorizon;
    use crate::debris::HazardClass;
    use approx::assert_relative_eq;

    fn base_request() -> SizingRequest {
        SizingRequest::new(vec![2.0], vec![0.4])
    }

    #[test]
    fn test_california_end_to_end() {
        let result = calculate_culvert(&base_request()).unwrap();
        assert_relative_eq!(*result.geometry.average_bottom_width, 1.4);
        assert_relative_eq!(*result.geometry.cross_sectional_area, 0.68, epsilon = 1e-12);
        assert_relative_eq!(*result.california.base_area, 2.04, epsilon = 1e-12);
        assert_eq!(result.final_size, StandardSize::circular(1700));
        assert_eq!(result.governing_method, GoverningMethod::California);
        assert!(result.hydraulic.is_none());
        assert!(result.warnings.is_empty());
        assert!(!result.requires_engineering_review);
    }

    #[test]
    fn test_hydraulic_requires_slope() {
        let missing = base_request().with_method(SizingMethod::Hydraulic);
        assert_eq!(
            calculate_culvert(&missing).unwrap_err(),
            ValidationError::missing("slope")
        );

        let zero = base_request()
            .with_method(SizingMethod::Hydraulic)
            .with_slope(0.0);
        assert_eq!(calculate_culvert(&zero).unwrap_err().field(), "slope");

        let comparison = base_request().with_method(SizingMethod::Comparison);
        assert!(calculate_culvert(&comparison).is_err());
    }

    #[test]
    fn test_california_skips_unusable_slope() {
        let result = calculate_culvert(&base_request().with_slope(0.0)).unwrap();
        assert!(result.hydraulic.is_none());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.final_size, StandardSize::circular(1700));
    }

    #[test]
    fn test_degenerate_flow_only_fails_hydraulic_modes() {
        for (top, depth) in [(1.0, 1e-300), (1e200, 1e200)] {
            let request = SizingRequest::new(vec![top], vec![depth]).with_slope(0.02);

            let result = calculate_culvert(&request).unwrap();
            assert!(result.hydraulic.is_none());
            assert_eq!(result.governing_method, GoverningMethod::California);
            assert_eq!(result.final_size, result.california.final_size);
            assert!(result
                .warnings
                .iter()
                .any(|warning| warning.contains("bankfull discharge")));

            for method in [SizingMethod::Hydraulic, SizingMethod::Comparison] {
                let error = calculate_culvert(&request.clone().with_method(method)).unwrap_err();
                assert_eq!(error.field(), "bankfull discharge");
            }
        }
    }

    #[test]
    fn test_averaged_readings_keep_inclusive_table_row() {
        let averaged = calculate_culvert(&SizingRequest::new(vec![1.1, 1.3], vec![0.25])).unwrap();
        let single = calculate_culvert(&SizingRequest::new(vec![1.2], vec![0.25])).unwrap();
        assert_eq!(averaged.table_lookup.width_row_mm, Some(1200));
        assert_eq!(averaged.table_lookup.size, single.table_lookup.size);
        assert_eq!(averaged.coarse_table, single.coarse_table);
    }

    #[test]
    fn test_california_shows_hydraulic_without_governing() {
        let result = calculate_culvert(&base_request().with_slope(0.02)).unwrap();
        assert!(result.hydraulic.is_some());
        assert_eq!(result.governing_method, GoverningMethod::California);
        assert_eq!(result.final_size, result.california.final_size);
    }

    #[test]
    fn test_hydraulic_method_governs() {
        let request = base_request()
            .with_method(SizingMethod::Hydraulic)
            .with_slope(0.02);
        let result = calculate_culvert(&request).unwrap();
        let check = result.hydraulic.as_ref().unwrap();
        assert_eq!(result.final_size, check.sizing.size);
        assert_eq!(result.governing_method, GoverningMethod::Hydraulic);
        assert_relative_eq!(
            *check.channel.design_discharge,
            *check.channel.bankfull_discharge * 1.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_comparison_takes_larger() {
        let request = base_request().with_slope(0.02);
        let california = calculate_culvert(&request.clone()).unwrap();
        let hydraulic =
            calculate_culvert(&request.clone().with_method(SizingMethod::Hydraulic)).unwrap();
        let comparison =
            calculate_culvert(&request.with_method(SizingMethod::Comparison)).unwrap();

        let expected = california.final_size_mm().max(hydraulic.final_size_mm());
        assert_eq!(comparison.final_size_mm(), expected);
        let expected_governing = if hydraulic.final_size_mm() > california.final_size_mm() {
            GoverningMethod::Hydraulic
        } else {
            GoverningMethod::California
        };
        assert_eq!(comparison.governing_method, expected_governing);
    }

    #[test]
    fn test_comparison_tie_goes_to_california() {
        // Small steep channel: both methods land on the smallest pipe
        let request = SizingRequest::new(vec![0.3], vec![0.05])
            .with_slope(0.2)
            .with_max_headwater_ratio(100.0)
            .with_method(SizingMethod::Comparison);
        let result = calculate_culvert(&request).unwrap();
        let hydraulic_size = result.hydraulic.as_ref().unwrap().sizing.size;
        assert_eq!(hydraulic_size, StandardSize::circular(300));
        assert_eq!(result.california.final_size, StandardSize::circular(300));
        assert_eq!(result.governing_method, GoverningMethod::California);
    }

    #[test]
    fn test_adjustments_flow_into_final_size() {
        let request = base_request()
            .with_climate(ClimateFactorConfig::from_preset(PlanningHorizon::Mid2050))
            .with_debris(DebrisAssessmentInput {
                debris_flow_evidence: true,
                large_woody_debris: true,
                ..DebrisAssessmentInput::default()
            });
        let result = calculate_culvert(&request).unwrap();
        assert_eq!(result.california.stages.len(), 2);
        assert_eq!(
            result.debris.map(|d| d.hazard_class),
            Some(HazardClass::Moderate)
        );
        // 2.04 × 1.2 × 1.15 = 2.815 m² -> 2000 mm
        assert_eq!(result.final_size, StandardSize::circular(2000));
    }

    #[test]
    fn test_high_debris_flags_review() {
        let request = base_request().with_debris(DebrisAssessmentInput {
            debris_flow_evidence: true,
            large_woody_debris: true,
            unstable_banks: true,
            steep_upstream_gradient: true,
            ..DebrisAssessmentInput::default()
        });
        let result = calculate_culvert(&request).unwrap();
        assert!(result.requires_engineering_review);
        assert!(result.warnings.iter().any(|w| w.contains("HIGH")));
    }

    #[test]
    fn test_invalid_climate_multiplier_rejected() {
        let mut request = base_request();
        request.climate = Some(ClimateFactorConfig {
            planning_horizon: PlanningHorizon::Mid2050,
            area_multiplier: 0.8,
        });
        assert_eq!(
            calculate_culvert(&request).unwrap_err().field(),
            "climate multiplier"
        );
    }

    #[test]
    fn test_fish_passage_does_not_change_size() {
        let plain = calculate_culvert(&base_request()).unwrap();
        let fish = calculate_culvert(&base_request().with_fish_passage(true)).unwrap();
        assert_eq!(plain.final_size, fish.final_size);
        let embed = fish.fish_passage.unwrap();
        assert_relative_eq!(*embed.embed_depth, 0.34, epsilon = 1e-12);
        assert!(plain.fish_passage.is_none());
    }

    #[test]
    fn test_wide_channel_is_flagged_not_failed() {
        let result = calculate_culvert(&SizingRequest::new(vec![6.0], vec![0.6])).unwrap();
        assert!(result.table_lookup.is_bridge_required());
        assert!(result.california.exceeds_ladder);
        assert!(result.requires_engineering_review);
        assert_eq!(result.final_size, StandardSize::circular(2400));
        assert!(result.warnings.len() >= 2);
    }

    #[test]
    fn test_batch_preserves_order() {
        let requests = vec![
            base_request(),
            SizingRequest::new(vec![2.0], vec![0.0]),
            SizingRequest::new(vec![1.0], vec![0.2]),
        ];
        let results = calculate_culverts(&requests);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().final_size_mm(), 1700);
        assert!(results[1].is_err());
        assert_eq!(
            results[2].as_ref().unwrap(),
            &calculate_culvert(&requests[2]).unwrap()
        );
    }
}
