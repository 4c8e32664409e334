//! California Method sizing
//!
//! Two numerically distinct routes to a size, kept apart on purpose:
//!
//! 1. **Table lookup** ([`size_by_california_table`]): read the fine table at
//!    the first width row and depth column whose thresholds are ≥ the
//!    measured values.
//! 2. **Area variant** ([`required_area`] + [`size_for_area`]): three times the
//!    bankfull cross-section, rounded *up* to the next standard size. This is
//!    the route the adjustment pipeline builds on.
//!
//! The coarse display table has its own lookup, [`size_by_coarse_table`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core_types::units::{Meters, Millimeters, SquareMeters};
use crate::tables::{
    PipeShape, StandardSize, TableCell, CALIFORNIA_TABLE, COARSE_DEPTH_BANDS_MM, COARSE_TABLE,
    COARSE_WIDTH_BANDS_MM, DEPTH_COLUMNS, DEPTH_THRESHOLDS_MM,
};

/// Multiple of the bankfull area a California Method culvert must provide
pub const CALIFORNIA_AREA_FACTOR: f64 = 3.0;

/// Slack (mm) when matching a measurement against a threshold. Averaged
/// readings carry float rounding orders of magnitude below field precision.
const THRESHOLD_TOLERANCE_MM: f64 = 1e-6;

/// Index of the first threshold (mm) that is ≥ the measurement (m).
///
/// Thresholds are inclusive bounds; the measurement is never rounded.
fn first_threshold_at_least(thresholds_mm: &[u32], measurement: Meters) -> Option<usize> {
    let measurement_mm = *measurement * 1000.0;
    thresholds_mm
        .iter()
        .position(|&threshold| f64::from(threshold) >= measurement_mm - THRESHOLD_TOLERANCE_MM)
}

/// Size read from the fine table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableSize {
    /// Nominal round-pipe diameter
    Size(Millimeters),
    /// Beyond a single culvert; a bridge or engineered structure is needed
    BridgeRequired,
}

/// Outcome of a fine-table lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaliforniaTableResult {
    pub size: TableSize,
    /// Width row used, if the width was inside the table
    pub width_row_mm: Option<u32>,
    /// Depth column used, if a row was found
    pub depth_column_mm: Option<u32>,
    /// Explanation of how the cell was chosen
    pub note: String,
}

impl CaliforniaTableResult {
    pub fn is_bridge_required(&self) -> bool {
        self.size == TableSize::BridgeRequired
    }
}

/// Look up the fine California Method table.
///
/// Expects validated (finite, positive) measurements.
///
/// - Width beyond the last row: [`TableSize::BridgeRequired`]
/// - Depth beyond the last column: the deepest column is used
/// - A bridge cell: [`TableSize::BridgeRequired`]
///
/// # Example
/// ```
/// use culvert_core::core_types::units::{Meters, Millimeters};
/// use culvert_core::sizing::california::{size_by_california_table, TableSize};
///
/// let result = size_by_california_table(Meters::new(2.0), Meters::new(0.4));
/// assert_eq!(result.size, TableSize::Size(Millimeters::new(1700)));
///
/// let wide = size_by_california_table(Meters::new(5.2), Meters::new(0.2));
/// assert_eq!(wide.size, TableSize::BridgeRequired);
/// ```
pub fn size_by_california_table(width: Meters, depth: Meters) -> CaliforniaTableResult {
    let row_thresholds: Vec<u32> = CALIFORNIA_TABLE
        .iter()
        .map(|row| row.width_threshold_mm)
        .collect();

    let Some(row_index) = first_threshold_at_least(&row_thresholds, width) else {
        debug!("California table: width {} beyond table, bridge required", width);
        return CaliforniaTableResult {
            size: TableSize::BridgeRequired,
            width_row_mm: None,
            depth_column_mm: None,
            note: format!(
                "Channel width {} exceeds the {:.1} m table limit; consider a bridge or consult an engineer",
                width,
                f64::from(row_thresholds[row_thresholds.len() - 1]) / 1000.0
            ),
        };
    };
    let row = &CALIFORNIA_TABLE[row_index];

    let (column_index, depth_clamped) = match first_threshold_at_least(&DEPTH_THRESHOLDS_MM, depth)
    {
        Some(index) => (index, false),
        None => (DEPTH_COLUMNS - 1, true),
    };
    let column_mm = DEPTH_THRESHOLDS_MM[column_index];

    let (size, note) = match row.cells[column_index] {
        TableCell::Size(mm) => {
            let mut note = format!(
                "Width row ≤ {:.1} m, depth column ≤ {:.2} m",
                f64::from(row.width_threshold_mm) / 1000.0,
                f64::from(column_mm) / 1000.0
            );
            if depth_clamped {
                note.push_str(&format!(
                    "; depth {} exceeds the table, deepest column used",
                    depth
                ));
            }
            (TableSize::Size(Millimeters::new(mm)), note)
        }
        TableCell::Bridge => (
            TableSize::BridgeRequired,
            format!(
                "Table calls for a bridge at {} wide by {} deep; consult an engineer",
                width, depth
            ),
        ),
    };

    debug!(
        "California table: width={} depth={} -> row {}mm col {}mm -> {:?}",
        width, depth, row.width_threshold_mm, column_mm, size
    );

    CaliforniaTableResult {
        size,
        width_row_mm: Some(row.width_threshold_mm),
        depth_column_mm: Some(column_mm),
        note,
    }
}

/// Outcome of a coarse-table lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoarseTableResult {
    pub size: Millimeters,
    pub width_band_mm: u32,
    pub depth_band_mm: u32,
    /// A measurement lay beyond the last band and was clamped to it
    pub beyond_table: bool,
}

/// Look up the coarse display table.
///
/// Same inclusive-threshold rule as the fine table, but measurements beyond
/// the last band clamp to it instead of calling for a bridge.
pub fn size_by_coarse_table(width: Meters, depth: Meters) -> CoarseTableResult {
    let width_index = first_threshold_at_least(&COARSE_WIDTH_BANDS_MM, width);
    let depth_index = first_threshold_at_least(&COARSE_DEPTH_BANDS_MM, depth);
    let beyond_table = width_index.is_none() || depth_index.is_none();
    let width_index = width_index.unwrap_or(COARSE_WIDTH_BANDS_MM.len() - 1);
    let depth_index = depth_index.unwrap_or(COARSE_DEPTH_BANDS_MM.len() - 1);

    CoarseTableResult {
        size: Millimeters::new(COARSE_TABLE[width_index][depth_index]),
        width_band_mm: COARSE_WIDTH_BANDS_MM[width_index],
        depth_band_mm: COARSE_DEPTH_BANDS_MM[depth_index],
        beyond_table,
    }
}

/// California Method required waterway area: three times the bankfull area.
pub fn required_area(cross_sectional_area: SquareMeters) -> SquareMeters {
    cross_sectional_area * CALIFORNIA_AREA_FACTOR
}

/// A standard size chosen to provide a required area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaSizing {
    pub size: StandardSize,
    /// The required area is larger than the biggest size on the ladder; `size`
    /// is that biggest size
    pub exceeds_ladder: bool,
}

/// Smallest standard size of `shape` whose waterway area is ≥ `area`.
///
/// Always rounds up. Past the end of the ladder the largest size is returned
/// with `exceeds_ladder` set.
pub fn size_for_area(shape: PipeShape, area: SquareMeters) -> AreaSizing {
    match shape
        .standard_sizes()
        .iter()
        .find(|size| size.area() >= area)
    {
        Some(size) => AreaSizing {
            size: *size,
            exceeds_ladder: false,
        },
        None => AreaSizing {
            size: shape.largest_size(),
            exceeds_ladder: true,
        },
    }
}
