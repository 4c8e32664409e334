//! Hydraulic sizing with Manning's equation
//!
//! Independent check on the California Method: estimate the bankfull
//! discharge of the natural channel, apply a safety factor, then walk the
//! standard size ladder until a barrel both carries the flow and keeps the
//! headwater within the allowed ratio.
//!
//! # Formula
//! ```text
//! Q = (1/n) × A × R^(2/3) × S^(1/2)
//! ```
//!
//! Where:
//! - **Q** = Discharge (m³/s)
//! - **n** = Manning roughness coefficient
//! - **A** = Flow area (m²)
//! - **R** = Hydraulic radius, A / wetted perimeter (m)
//! - **S** = Energy slope, taken as the channel slope (m/m)
//!
//! Headwater is approximated as
//! ```text
//! HW/D ≈ (Q / (D^2.5 × √S))^0.7
//! ```
//!
//! # References
//! - Manning, R. (1891). "On the flow of water in open channels and pipes."
//!   Transactions of the Institution of Civil Engineers of Ireland, 20, 161-207.
//! - Chow, V.T. (1959). "Open-Channel Hydraulics." McGraw-Hill.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core_types::units::{CubicMetersPerSecond, Meters, SquareMeters};
use crate::error::{require_positive, ValidationError};
use crate::geometry::StreamGeometry;
use crate::tables::{PipeShape, StandardSize};

/// Safety factor from bankfull to design discharge
pub const DESIGN_DISCHARGE_FACTOR: f64 = 1.5;

/// Manning n for a natural mountain stream with cobbles
pub const DEFAULT_STREAM_ROUGHNESS: f64 = 0.035;

/// Manning n for corrugated steel pipe
pub const DEFAULT_PIPE_ROUGHNESS: f64 = 0.024;

/// Allowed headwater depth over barrel rise
pub const DEFAULT_MAX_HEADWATER_RATIO: f64 = 1.5;

/// Manning discharge for a given section.
pub fn manning_discharge(
    roughness: f64,
    area: SquareMeters,
    hydraulic_radius: Meters,
    slope: f64,
) -> CubicMetersPerSecond {
    CubicMetersPerSecond::new(
        (1.0 / roughness) * *area * hydraulic_radius.powf(2.0 / 3.0) * slope.sqrt(),
    )
}

/// Approximate inlet headwater ratio for a barrel of diameter `diameter`.
pub fn headwater_ratio(discharge: CubicMetersPerSecond, diameter: Meters, slope: f64) -> f64 {
    (*discharge / (diameter.powf(2.5) * slope.sqrt())).powf(0.7)
}

/// Bankfull and design flows of the natural channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelFlow {
    pub wetted_perimeter: Meters,
    pub hydraulic_radius: Meters,
    pub bankfull_discharge: CubicMetersPerSecond,
    /// Bankfull discharge × [`DESIGN_DISCHARGE_FACTOR`]
    pub design_discharge: CubicMetersPerSecond,
}

/// Estimate the channel's bankfull discharge and the design discharge.
///
/// # Errors
/// Returns [`ValidationError`] if `slope` or `stream_roughness` is not a
/// finite value greater than zero, or if the channel's dimensions are so
/// extreme that the bankfull discharge is not a finite positive flow.
pub fn channel_flow(
    geometry: &StreamGeometry,
    stream_roughness: f64,
    slope: f64,
) -> Result<ChannelFlow, ValidationError> {
    let slope = require_positive("slope", slope)?;
    let stream_roughness = require_positive("stream roughness", stream_roughness)?;

    let wetted_perimeter = geometry.wetted_perimeter();
    let hydraulic_radius = geometry.hydraulic_radius();
    let bankfull_discharge = manning_discharge(
        stream_roughness,
        geometry.cross_sectional_area,
        hydraulic_radius,
        slope,
    );
    require_positive("bankfull discharge", *bankfull_discharge)?;
    let design_discharge = bankfull_discharge * DESIGN_DISCHARGE_FACTOR;

    debug!(
        "Channel flow: P={} R={} Q_bankfull={} Q_design={}",
        wetted_perimeter, hydraulic_radius, bankfull_discharge, design_discharge
    );

    Ok(ChannelFlow {
        wetted_perimeter,
        hydraulic_radius,
        bankfull_discharge,
        design_discharge,
    })
}

/// Result of the hydraulic size search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydraulicSizing {
    pub size: StandardSize,
    /// Full-barrel Manning capacity of `size`
    pub capacity: CubicMetersPerSecond,
    pub headwater_ratio: f64,
    pub design_discharge: CubicMetersPerSecond,
    /// False when no standard size met both criteria and the largest was returned
    pub criteria_met: bool,
    /// Set when `criteria_met` is false
    pub message: Option<String>,
}

/// Capacity and headwater of one candidate barrel
fn evaluate_candidate(
    size: &StandardSize,
    design_discharge: CubicMetersPerSecond,
    slope: f64,
    pipe_roughness: f64,
) -> (CubicMetersPerSecond, f64) {
    let capacity = manning_discharge(pipe_roughness, size.area(), size.hydraulic_radius(), slope);
    let ratio = headwater_ratio(design_discharge, size.equivalent_diameter(), slope);
    (capacity, ratio)
}

/// Smallest standard size that carries `design_discharge` within `max_headwater_ratio`.
///
/// If no size qualifies the largest is returned with `criteria_met == false`
/// and an explanatory message. That is a usable, clearly-flagged result, not
/// an error.
///
/// # Errors
/// Returns [`ValidationError`] if the discharge, slope, roughness or headwater
/// ratio is not a finite value greater than zero.
pub fn size_by_manning(
    design_discharge: CubicMetersPerSecond,
    slope: f64,
    pipe_roughness: f64,
    max_headwater_ratio: f64,
    shape: PipeShape,
) -> Result<HydraulicSizing, ValidationError> {
    require_positive("design discharge", *design_discharge)?;
    let slope = require_positive("slope", slope)?;
    let pipe_roughness = require_positive("pipe roughness", pipe_roughness)?;
    let max_headwater_ratio = require_positive("max headwater ratio", max_headwater_ratio)?;

    for size in shape.standard_sizes() {
        let (capacity, ratio) = evaluate_candidate(size, design_discharge, slope, pipe_roughness);
        if *capacity >= *design_discharge && ratio <= max_headwater_ratio {
            debug!(
                "Hydraulic sizing: {} carries {} (capacity {}, HW/D {:.2})",
                size, design_discharge, capacity, ratio
            );
            return Ok(HydraulicSizing {
                size: *size,
                capacity,
                headwater_ratio: ratio,
                design_discharge,
                criteria_met: true,
                message: None,
            });
        }
    }

    let largest = shape.largest_size();
    let (capacity, ratio) = evaluate_candidate(&largest, design_discharge, slope, pipe_roughness);
    let message = format!(
        "No standard {} size carries {} with HW/D ≤ {:.2}; largest size shown (capacity {}, HW/D {:.2}). Consider a bridge or consult an engineer",
        shape.label(),
        design_discharge,
        max_headwater_ratio,
        capacity,
        ratio
    );
    warn!("{}", message);

    Ok(HydraulicSizing {
        size: largest,
        capacity,
        headwater_ratio: ratio,
        design_discharge,
        criteria_met: false,
        message: Some(message),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::compute_geometry;
    use approx::assert_relative_eq;

    #[test]
    fn test_degenerate_channel_flow_is_rejected() {
        // Flow underflows to zero
        let shallow = compute_geometry(&[1.0], &[], &[1e-300], false).unwrap();
        let error = channel_flow(&shallow, 0.035, 0.02).unwrap_err();
        assert_eq!(error.field(), "bankfull discharge");

        // Area and perimeter overflow, leaving an undefined hydraulic radius
        let huge = compute_geometry(&[1e200], &[], &[1e200], false).unwrap();
        let error = channel_flow(&huge, 0.035, 0.02).unwrap_err();
        assert_eq!(error.field(), "bankfull discharge");
    }

    #[test]
    fn test_manning_discharge_textbook() {
        // Unit area, unit hydraulic radius, n = 0.025, S = 0.0004: Q = 40 × 0.02 = 0.8
        let q = manning_discharge(0.025, SquareMeters::new(1.0), Meters::new(1.0), 0.0004);
        assert_relative_eq!(*q, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_headwater_ratio_unit_case() {
        // Q = D^2.5 × √S gives a ratio of exactly one
        let slope: f64 = 0.04;
        let d = Meters::new(1.0);
        let q = CubicMetersPerSecond::new(slope.sqrt());
        assert_relative_eq!(headwater_ratio(q, d, slope), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_channel_flow_applies_safety_factor() {
        let geometry = compute_geometry(&[2.0], &[], &[0.4], false).unwrap();
        let flow = channel_flow(&geometry, 0.035, 0.02).unwrap();
        assert_relative_eq!(*flow.wetted_perimeter, 2.4, epsilon = 1e-12);
        assert_relative_eq!(
            *flow.design_discharge,
            *flow.bankfull_discharge * 1.5,
            epsilon = 1e-12
        );
        let expected = (1.0 / 0.035) * 0.68 * (0.68_f64 / 2.4).powf(2.0 / 3.0) * 0.02_f64.sqrt();
        assert_relative_eq!(*flow.bankfull_discharge, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_channel_flow_rejects_zero_slope() {
        let geometry = compute_geometry(&[2.0], &[], &[0.4], false).unwrap();
        assert_eq!(
            channel_flow(&geometry, 0.035, 0.0).unwrap_err().field(),
            "slope"
        );
    }

    #[test]
    fn test_selects_first_qualifying_size() {
        let q = CubicMetersPerSecond::new(0.3);
        let result = size_by_manning(q, 0.03, 0.024, 1.5, PipeShape::Circular).unwrap();
        assert!(result.criteria_met);
        assert!(*result.capacity >= 0.3);
        assert!(result.headwater_ratio <= 1.5);

        // The next smaller size must fail one of the criteria
        let ladder = PipeShape::Circular.standard_sizes();
        let index = ladder.iter().position(|s| *s == result.size).unwrap();
        if index > 0 {
            let (capacity, ratio) = evaluate_candidate(&ladder[index - 1], q, 0.03, 0.024);
            assert!(*capacity < 0.3 || ratio > 1.5);
        }
    }

    #[test]
    fn test_larger_flow_never_selects_smaller_pipe() {
        let size = |flow: f64| {
            size_by_manning(
                CubicMetersPerSecond::new(flow),
                0.02,
                0.024,
                1.5,
                PipeShape::Circular,
            )
            .unwrap()
        };
        let small = size(0.5);
        let large = size(2.0);
        assert!(large.size.span >= small.size.span);
    }

    #[test]
    fn test_unmet_criteria_returns_largest_with_message() {
        let result = size_by_manning(
            CubicMetersPerSecond::new(200.0),
            0.01,
            0.024,
            1.0,
            PipeShape::Circular,
        )
        .unwrap();
        assert!(!result.criteria_met);
        assert_eq!(result.size, StandardSize::circular(2400));
        assert!(result.message.unwrap().contains("consult an engineer"));
    }

    #[test]
    fn test_domain_guards() {
        let q = CubicMetersPerSecond::new(1.0);
        assert_eq!(
            size_by_manning(q, 0.0, 0.024, 1.5, PipeShape::Circular)
                .unwrap_err()
                .field(),
            "slope"
        );
        assert_eq!(
            size_by_manning(q, -0.01, 0.024, 1.5, PipeShape::Circular)
                .unwrap_err()
                .field(),
            "slope"
        );
        assert_eq!(
            size_by_manning(CubicMetersPerSecond::new(0.0), 0.02, 0.024, 1.5, PipeShape::Circular)
                .unwrap_err()
                .field(),
            "design discharge"
        );
    }

    #[test]
    fn test_box_ladder_searched_for_box_shape() {
        let result =
            size_by_manning(CubicMetersPerSecond::new(1.0), 0.02, 0.013, 1.5, PipeShape::Box)
                .unwrap();
        assert_eq!(result.size.shape, PipeShape::Box);
    }
}
