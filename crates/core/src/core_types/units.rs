//! Semantic unit types for type-safe physical quantity handling
//!
//! Field measurements arrive in meters, manufactured pipe sizes are catalogued
//! in millimeters, and the hydraulic check works in square meters and cubic
//! meters per second. Mixing those up silently is the classic sizing bug, so
//! each quantity gets its own newtype.
//!
//! # Design Philosophy
//! - Continuous quantities use f64 (the calculation is tiny, precision is free)
//! - Catalogue sizes use u32 millimeters (manufacturers publish integers)
//! - `Deref` to the raw value for arithmetic, like the rest of the crate
//! - Total ordering via `Ord` (NaN handled as greater than all values)
//! - Serde support for serialization
//!
//! # Usage
//! ```
//! use culvert_core::core_types::units::{Meters, Millimeters};
//!
//! let diameter = Millimeters::new(1700);
//! let meters: Meters = diameter.into();
//! assert!((*meters - 1.7).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Mul};

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// LENGTH TYPES
// ============================================================================

/// Distance in meters (field measurements, channel geometry)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(f64);

impl Eq for Meters {}

impl PartialOrd for Meters {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Meters {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Meters {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Meters {
    /// Zero length
    pub const ZERO: Meters = Meters(0.0);

    /// Create a new distance in meters
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Meters(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Meters {
    fn from(v: f64) -> Self {
        Meters(v)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        mm.to_meters()
    }
}

impl Add for Meters {
    type Output = Meters;
    fn add(self, rhs: Self) -> Self::Output {
        Meters(self.0 + rhs.0)
    }
}

impl Mul<f64> for Meters {
    type Output = Meters;
    fn mul(self, rhs: f64) -> Self::Output {
        Meters(self.0 * rhs)
    }
}

impl Mul<Meters> for Meters {
    type Output = SquareMeters;
    fn mul(self, rhs: Meters) -> Self::Output {
        SquareMeters(self.0 * rhs.0)
    }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} m", self.0)
    }
}

/// Catalogue dimension in whole millimeters (nominal pipe sizes)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct Millimeters(u32);

impl Deref for Millimeters {
    type Target = u32;
    #[inline]
    fn deref(&self) -> &u32 {
        &self.0
    }
}

impl Millimeters {
    /// Create a new catalogue dimension
    #[inline]
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Millimeters(value)
    }

    /// Get the raw value
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Convert to meters
    #[inline]
    #[must_use]
    pub fn to_meters(self) -> Meters {
        Meters(f64::from(self.0) / 1000.0)
    }
}

impl From<u32> for Millimeters {
    fn from(v: u32) -> Self {
        Millimeters(v)
    }
}

impl fmt::Display for Millimeters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mm", self.0)
    }
}

// ============================================================================
// AREA AND FLOW TYPES
// ============================================================================

/// Area in square meters (channel cross-section, pipe waterway area)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SquareMeters(f64);

impl Eq for SquareMeters {}

impl PartialOrd for SquareMeters {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SquareMeters {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for SquareMeters {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl SquareMeters {
    /// Create a new area
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        SquareMeters(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for SquareMeters {
    fn from(v: f64) -> Self {
        SquareMeters(v)
    }
}

impl Mul<f64> for SquareMeters {
    type Output = SquareMeters;
    fn mul(self, rhs: f64) -> Self::Output {
        SquareMeters(self.0 * rhs)
    }
}

impl fmt::Display for SquareMeters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} m²", self.0)
    }
}

/// Volumetric flow rate in cubic meters per second
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CubicMetersPerSecond(f64);

impl Eq for CubicMetersPerSecond {}

impl PartialOrd for CubicMetersPerSecond {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CubicMetersPerSecond {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for CubicMetersPerSecond {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl CubicMetersPerSecond {
    /// Create a new flow rate
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        CubicMetersPerSecond(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for CubicMetersPerSecond {
    fn from(v: f64) -> Self {
        CubicMetersPerSecond(v)
    }
}

impl Mul<f64> for CubicMetersPerSecond {
    type Output = CubicMetersPerSecond;
    fn mul(self, rhs: f64) -> Self::Output {
        CubicMetersPerSecond(self.0 * rhs)
    }
}

impl fmt::Display for CubicMetersPerSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} m³/s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millimeters_to_meters() {
        assert_eq!(*Millimeters::new(2400).to_meters(), 2.4);
        assert_eq!(*Meters::from(Millimeters::new(50)), 0.05);
    }

    #[test]
    fn test_meters_product_is_area() {
        let area = Meters::new(2.0) * Meters::new(0.4);
        assert!((*area - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_total_ordering_puts_nan_last() {
        let mut values = [Meters::new(f64::NAN), Meters::new(1.0), Meters::new(0.5)];
        values.sort();
        assert_eq!(*values[0], 0.5);
        assert_eq!(*values[1], 1.0);
        assert!(values[2].is_nan());
    }

    #[test]
    fn test_display_units() {
        assert_eq!(Millimeters::new(900).to_string(), "900 mm");
        assert_eq!(SquareMeters::new(2.04).to_string(), "2.040 m²");
        assert_eq!(CubicMetersPerSecond::new(1.5).to_string(), "1.500 m³/s");
        assert_eq!(Meters::new(1.4).to_string(), "1.40 m");
    }
}
