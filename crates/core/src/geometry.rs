//! Stream cross-section geometry
//!
//! Field crews record several top width, bottom width and depth readings at
//! the crossing. This module averages the usable readings and derives the
//! bankfull trapezoid the sizing methods work from.
//!
//! # Formula
//! ```text
//! A = (W_top + W_bottom) / 2 × d
//! ```
//!
//! When the bottom width was not measured it is estimated as
//! `0.7 × W_top`, the usual channel-narrowing rule of thumb.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core_types::units::{Meters, SquareMeters};
use crate::error::ValidationError;

/// Bottom width as a fraction of top width when it was not measured
pub const BOTTOM_WIDTH_RATIO: f64 = 0.7;

/// Averaged bankfull cross-section of the stream at the crossing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamGeometry {
    pub average_top_width: Meters,
    pub average_bottom_width: Meters,
    pub average_depth: Meters,
    /// Trapezoid area at bankfull
    pub cross_sectional_area: SquareMeters,
    /// True when `average_bottom_width` came from [`BOTTOM_WIDTH_RATIO`]
    pub bottom_width_estimated: bool,
}

impl StreamGeometry {
    /// Wetted perimeter of the bankfull trapezoid
    ///
    /// ```text
    /// P = W_bottom + 2 × √(d² + ((W_top − W_bottom) / 2)²)
    /// ```
    pub fn wetted_perimeter(&self) -> Meters {
        let depth = *self.average_depth;
        let side_run = (*self.average_top_width - *self.average_bottom_width) / 2.0;
        let side_length = (depth * depth + side_run * side_run).sqrt();
        self.average_bottom_width + Meters::new(2.0 * side_length)
    }

    /// Hydraulic radius of the natural channel, R ≈ A / P
    pub fn hydraulic_radius(&self) -> Meters {
        Meters::new(*self.cross_sectional_area / *self.wetted_perimeter())
    }
}

/// A reading takes part in averaging only if it is a finite number ≥ 0.
#[inline]
fn is_usable_reading(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Parse raw form entries into usable readings.
///
/// Blank, non-numeric, negative and non-finite entries are dropped rather
/// than treated as zero, so a half-filled form never drags an average down.
///
/// # Example
/// ```
/// use culvert_core::geometry::parse_readings;
///
/// let readings = parse_readings(&["2.1", " ", "abc", "1.9", "-3", "NaN"]);
/// assert_eq!(readings, vec![2.1, 1.9]);
/// ```
pub fn parse_readings<S: AsRef<str>>(raw: &[S]) -> Vec<f64> {
    raw.iter()
        .filter_map(|entry| entry.as_ref().trim().parse::<f64>().ok())
        .filter(|value| is_usable_reading(*value))
        .collect()
}

/// Mean of the usable readings, or `None` if there are none.
fn average_readings(values: &[f64]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .copied()
        .filter(|value| is_usable_reading(*value))
        .fold((0.0, 0_u32), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / f64::from(count))
    }
}

/// Average the readings and build the bankfull cross-section.
///
/// Invalid entries are silently dropped. Top width and depth are required;
/// bottom width is required only when `use_bottom_width` is set, otherwise it
/// is estimated from the top width.
///
/// # Errors
/// Returns [`ValidationError`] when a required list has no usable readings,
/// or when the average top width or depth is not greater than zero.
pub fn compute_geometry(
    top_widths: &[f64],
    bottom_widths: &[f64],
    depths: &[f64],
    use_bottom_width: bool,
) -> Result<StreamGeometry, ValidationError> {
    let top = average_readings(top_widths).ok_or_else(|| ValidationError::missing("top width"))?;
    if top <= 0.0 {
        return Err(ValidationError::non_positive("top width", top));
    }

    let depth = average_readings(depths).ok_or_else(|| ValidationError::missing("depth"))?;
    if depth <= 0.0 {
        return Err(ValidationError::non_positive("depth", depth));
    }

    let bottom = if use_bottom_width {
        average_readings(bottom_widths).ok_or_else(|| ValidationError::missing("bottom width"))?
    } else {
        BOTTOM_WIDTH_RATIO * top
    };

    let area = (top + bottom) / 2.0 * depth;

    debug!(
        "Stream geometry: top={:.3}m bottom={:.3}m{} depth={:.3}m area={:.4}m²",
        top,
        bottom,
        if use_bottom_width { "" } else { " (estimated)" },
        depth,
        area
    );

    Ok(StreamGeometry {
        average_top_width: Meters::new(top),
        average_bottom_width: Meters::new(bottom),
        average_depth: Meters::new(depth),
        cross_sectional_area: SquareMeters::new(area),
        bottom_width_estimated: !use_bottom_width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_estimated_bottom_width() {
        let geometry = compute_geometry(&[2.0], &[], &[0.4], false).unwrap();
        assert_relative_eq!(*geometry.average_bottom_width, 1.4);
        assert_relative_eq!(*geometry.cross_sectional_area, 0.68, epsilon = 1e-12);
        assert!(geometry.bottom_width_estimated);
    }

    #[test]
    fn test_measured_bottom_width() {
        let geometry = compute_geometry(&[3.0, 3.2], &[1.8, 2.2], &[0.5, 0.3], true).unwrap();
        assert_relative_eq!(*geometry.average_top_width, 3.1, epsilon = 1e-12);
        assert_relative_eq!(*geometry.average_bottom_width, 2.0, epsilon = 1e-12);
        assert_relative_eq!(*geometry.average_depth, 0.4, epsilon = 1e-12);
        assert_relative_eq!(*geometry.cross_sectional_area, 1.02, epsilon = 1e-12);
        assert!(!geometry.bottom_width_estimated);
    }

    #[test]
    fn test_invalid_readings_are_dropped_not_zeroed() {
        let geometry =
            compute_geometry(&[2.0, f64::NAN, -1.0, f64::INFINITY], &[], &[0.4, 0.4], false)
                .unwrap();
        assert_eq!(*geometry.average_top_width, 2.0);
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        let err = compute_geometry(&[2.0], &[], &[0.0, 0.0], false).unwrap_err();
        assert_eq!(err.field(), "depth");
    }

    #[test]
    fn test_empty_required_list_is_rejected() {
        let err = compute_geometry(&[f64::NAN], &[], &[0.4], false).unwrap_err();
        assert_eq!(err, ValidationError::missing("top width"));

        let err = compute_geometry(&[2.0], &[], &[0.4], true).unwrap_err();
        assert_eq!(err, ValidationError::missing("bottom width"));
    }

    #[test]
    fn test_wetted_perimeter_of_trapezoid() {
        // 2.0 m top, 1.4 m bottom, 0.4 m deep: side slopes are 0.3 run by 0.4 rise = 0.5 m
        let geometry = compute_geometry(&[2.0], &[], &[0.4], false).unwrap();
        assert_relative_eq!(*geometry.wetted_perimeter(), 2.4, epsilon = 1e-12);
        assert_relative_eq!(*geometry.hydraulic_radius(), 0.68 / 2.4, epsilon = 1e-12);
    }

    #[test]
    fn test_parse_readings() {
        assert_eq!(parse_readings(&["0", "0.35", ""]), vec![0.0, 0.35]);
        assert!(parse_readings::<&str>(&[]).is_empty());
        assert!(parse_readings(&["inf", "-0.1"]).is_empty());
    }
}
