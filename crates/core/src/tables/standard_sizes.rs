//! Standard manufactured culvert sizes
//!
//! One ladder per barrel shape, ascending. Sizing never invents a diameter:
//! every recommendation is an entry of one of these ladders.
//!
//! ## Shapes
//!
//! - Circular: span and rise are both the nominal diameter
//! - Pipe-arch: corrugated steel pipe-arch, span × rise, area approximated as an ellipse
//! - Box: precast concrete box, span × rise
//!
//! Ordering along each ladder is checked at compile time.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::core_types::units::{Meters, Millimeters, SquareMeters};

/// Culvert barrel shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipeShape {
    /// Round pipe (CSP, HDPE, concrete)
    #[default]
    Circular,
    /// Corrugated steel pipe-arch (low cover crossings)
    PipeArch,
    /// Precast concrete box
    Box,
}

impl PipeShape {
    /// All shapes, in the order offered to the user.
    pub const ALL: [PipeShape; 3] = [PipeShape::Circular, PipeShape::PipeArch, PipeShape::Box];

    /// The standard size ladder for this shape, ascending.
    pub fn standard_sizes(self) -> &'static [StandardSize] {
        match self {
            PipeShape::Circular => &CIRCULAR_SIZES,
            PipeShape::PipeArch => &PIPE_ARCH_SIZES,
            PipeShape::Box => &BOX_SIZES,
        }
    }

    /// Largest size on this shape's ladder.
    pub fn largest_size(self) -> StandardSize {
        let sizes = self.standard_sizes();
        sizes[sizes.len() - 1]
    }

    /// Display name
    pub fn label(self) -> &'static str {
        match self {
            PipeShape::Circular => "circular",
            PipeShape::PipeArch => "pipe-arch",
            PipeShape::Box => "box",
        }
    }
}

/// A manufactured culvert size.
///
/// For circular pipes `span == rise == diameter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StandardSize {
    pub shape: PipeShape,
    /// Nominal size; the diameter of a round pipe, the width of an arch or box
    pub span: Millimeters,
    pub rise: Millimeters,
}

impl StandardSize {
    /// Round pipe of the given nominal diameter
    pub const fn circular(diameter_mm: u32) -> Self {
        Self {
            shape: PipeShape::Circular,
            span: Millimeters::new(diameter_mm),
            rise: Millimeters::new(diameter_mm),
        }
    }

    /// Pipe-arch of the given span and rise
    pub const fn pipe_arch(span_mm: u32, rise_mm: u32) -> Self {
        Self {
            shape: PipeShape::PipeArch,
            span: Millimeters::new(span_mm),
            rise: Millimeters::new(rise_mm),
        }
    }

    /// Box of the given span and rise
    pub const fn box_section(span_mm: u32, rise_mm: u32) -> Self {
        Self {
            shape: PipeShape::Box,
            span: Millimeters::new(span_mm),
            rise: Millimeters::new(rise_mm),
        }
    }

    /// Full-barrel waterway area
    ///
    /// - Circular: π·D²/4
    /// - Pipe-arch: π/4 · span · rise (ellipse approximation)
    /// - Box: span · rise
    pub fn area(&self) -> SquareMeters {
        let span = *self.span.to_meters();
        let rise = *self.rise.to_meters();
        match self.shape {
            PipeShape::Circular => SquareMeters::new(PI * span * span / 4.0),
            PipeShape::PipeArch => SquareMeters::new(PI / 4.0 * span * rise),
            PipeShape::Box => SquareMeters::new(span * rise),
        }
    }

    /// Wetted perimeter when flowing full
    ///
    /// Pipe-arch uses Ramanujan's ellipse perimeter approximation:
    /// ```text
    /// P ≈ π × (3(a + b) − √((3a + b)(a + 3b)))
    /// ```
    /// with semi-axes `a = span/2`, `b = rise/2`.
    pub fn wetted_perimeter(&self) -> Meters {
        let span = *self.span.to_meters();
        let rise = *self.rise.to_meters();
        match self.shape {
            PipeShape::Circular => Meters::new(PI * span),
            PipeShape::PipeArch => {
                let a = span / 2.0;
                let b = rise / 2.0;
                Meters::new(PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt()))
            }
            PipeShape::Box => Meters::new(2.0 * (span + rise)),
        }
    }

    /// Hydraulic radius when flowing full (R = A / P, exactly D/4 for round pipe)
    pub fn hydraulic_radius(&self) -> Meters {
        match self.shape {
            PipeShape::Circular => Meters::new(*self.span.to_meters() / 4.0),
            PipeShape::PipeArch | PipeShape::Box => {
                Meters::new(*self.area() / *self.wetted_perimeter())
            }
        }
    }

    /// Diameter of the round pipe with the same waterway area
    pub fn equivalent_diameter(&self) -> Meters {
        match self.shape {
            PipeShape::Circular => self.span.to_meters(),
            PipeShape::PipeArch | PipeShape::Box => Meters::new((4.0 * *self.area() / PI).sqrt()),
        }
    }
}

impl std::fmt::Display for StandardSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.shape {
            PipeShape::Circular => write!(f, "{} mm circular", *self.span),
            PipeShape::PipeArch => write!(f, "{} x {} mm pipe-arch", *self.span, *self.rise),
            PipeShape::Box => write!(f, "{} x {} mm box", *self.span, *self.rise),
        }
    }
}

/// Round pipe diameters (mm), 300 to 2400
pub const CIRCULAR_SIZES: [StandardSize; 18] = [
    StandardSize::circular(300),
    StandardSize::circular(400),
    StandardSize::circular(450),
    StandardSize::circular(500),
    StandardSize::circular(600),
    StandardSize::circular(700),
    StandardSize::circular(800),
    StandardSize::circular(900),
    StandardSize::circular(1000),
    StandardSize::circular(1200),
    StandardSize::circular(1400),
    StandardSize::circular(1500),
    StandardSize::circular(1600),
    StandardSize::circular(1700),
    StandardSize::circular(1800),
    StandardSize::circular(2000),
    StandardSize::circular(2200),
    StandardSize::circular(2400),
];

/// Corrugated steel pipe-arch span × rise (mm)
pub const PIPE_ARCH_SIZES: [StandardSize; 11] = [
    StandardSize::pipe_arch(560, 420),
    StandardSize::pipe_arch(680, 500),
    StandardSize::pipe_arch(800, 580),
    StandardSize::pipe_arch(910, 660),
    StandardSize::pipe_arch(1030, 740),
    StandardSize::pipe_arch(1150, 820),
    StandardSize::pipe_arch(1390, 970),
    StandardSize::pipe_arch(1630, 1120),
    StandardSize::pipe_arch(1880, 1260),
    StandardSize::pipe_arch(2130, 1400),
    StandardSize::pipe_arch(2410, 1560),
];

/// Precast box span × rise (mm)
pub const BOX_SIZES: [StandardSize; 9] = [
    StandardSize::box_section(600, 600),
    StandardSize::box_section(900, 600),
    StandardSize::box_section(1200, 900),
    StandardSize::box_section(1500, 900),
    StandardSize::box_section(1800, 1200),
    StandardSize::box_section(2100, 1200),
    StandardSize::box_section(2400, 1500),
    StandardSize::box_section(3000, 1800),
    StandardSize::box_section(3600, 2400),
];

/// Span strictly increasing and rise non-decreasing along the ladder,
/// which makes area strictly increasing for every shape.
const fn ladder_is_ascending(sizes: &[StandardSize]) -> bool {
    let mut i = 1;
    while i < sizes.len() {
        if sizes[i].span.value() <= sizes[i - 1].span.value()
            || sizes[i].rise.value() < sizes[i - 1].rise.value()
        {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = assert!(ladder_is_ascending(&CIRCULAR_SIZES), "circular ladder out of order");
const _: () = assert!(ladder_is_ascending(&PIPE_ARCH_SIZES), "pipe-arch ladder out of order");
const _: () = assert!(ladder_is_ascending(&BOX_SIZES), "box ladder out of order");

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circular_ladder_bounds() {
        assert_eq!(CIRCULAR_SIZES[0].span, Millimeters::new(300));
        assert_eq!(PipeShape::Circular.largest_size().span, Millimeters::new(2400));
    }

    #[test]
    fn test_areas_strictly_increase() {
        for shape in PipeShape::ALL {
            for pair in shape.standard_sizes().windows(2) {
                assert!(
                    *pair[1].area() > *pair[0].area(),
                    "{} ladder area must increase: {} then {}",
                    shape.label(),
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn test_circular_hydraulic_radius_is_quarter_diameter() {
        let pipe = StandardSize::circular(1200);
        assert_relative_eq!(*pipe.hydraulic_radius(), 0.3);
        assert_relative_eq!(
            *pipe.hydraulic_radius(),
            *pipe.area() / *pipe.wetted_perimeter(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_box_geometry() {
        let box_section = StandardSize::box_section(1200, 900);
        assert_relative_eq!(*box_section.area(), 1.08, epsilon = 1e-12);
        assert_relative_eq!(*box_section.wetted_perimeter(), 4.2, epsilon = 1e-12);
        assert_relative_eq!(*box_section.hydraulic_radius(), 1.08 / 4.2, epsilon = 1e-12);
    }

    #[test]
    fn test_pipe_arch_perimeter_between_bounds() {
        // An ellipse's perimeter lies between those of its inscribed and circumscribed circles
        let arch = StandardSize::pipe_arch(1630, 1120);
        let perimeter = *arch.wetted_perimeter();
        assert!(perimeter > PI * 1.120);
        assert!(perimeter < PI * 1.630);
    }

    #[test]
    fn test_equivalent_diameter_preserves_area() {
        let arch = StandardSize::pipe_arch(910, 660);
        let d = *arch.equivalent_diameter();
        assert_relative_eq!(PI * d * d / 4.0, *arch.area(), epsilon = 1e-12);
        assert_eq!(*StandardSize::circular(900).equivalent_diameter(), 0.9);
    }

    #[test]
    fn test_display() {
        assert_eq!(StandardSize::circular(1700).to_string(), "1700 mm circular");
        assert_eq!(StandardSize::box_section(1800, 1200).to_string(), "1800 x 1200 mm box");
    }
}
