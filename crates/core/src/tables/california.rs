//! California Method lookup tables
//!
//! Two independent tables live here and must not be mixed up:
//!
//! - [`CALIFORNIA_TABLE`]: the fine-grained field table. Rows are channel top
//!   width thresholds from 100 to 5000 mm in 100 mm steps, columns are depth
//!   thresholds from 0.05 to 0.50 m in 0.05 m steps. Each cell is a nominal
//!   round-pipe diameter or [`TableCell::Bridge`].
//! - [`COARSE_TABLE`]: the simplified explanation table shown beside the
//!   result. 0.3 m width bands (0.3 to 3.0 m) against 0.1 m depth bands
//!   (0.1 to 0.6 m), sizes 450 to 2100 mm.
//!
//! Both tables are read with "first threshold ≥ measurement", never nearest.
//!
//! Cells were derived from three times the bankfull trapezoid area (bottom
//! width 0.7 × top width) at each threshold pair, resolved upward on the
//! round-pipe ladder.

use serde::Serialize;

/// Number of depth columns in [`CALIFORNIA_TABLE`]
pub const DEPTH_COLUMNS: usize = 10;

/// Depth thresholds (mm) heading each column of [`CALIFORNIA_TABLE`]
pub const DEPTH_THRESHOLDS_MM: [u32; DEPTH_COLUMNS] = [50, 100, 150, 200, 250, 300, 350, 400, 450, 500];

/// A cell of the fine California table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TableCell {
    /// Nominal round-pipe diameter in millimeters
    Size(u32),
    /// The crossing is beyond what a single culvert should carry
    Bridge,
}

impl TableCell {
    /// Ordering key: bridges rank above every pipe size.
    const fn rank(self) -> u32 {
        match self {
            TableCell::Size(mm) => mm,
            TableCell::Bridge => u32::MAX,
        }
    }
}

/// One width row of [`CALIFORNIA_TABLE`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaliforniaTableRow {
    /// Inclusive upper bound of channel top width for this row (mm)
    pub width_threshold_mm: u32,
    /// One cell per entry of [`DEPTH_THRESHOLDS_MM`]
    pub cells: [TableCell; DEPTH_COLUMNS],
}

const fn row(width_threshold_mm: u32, cells: [TableCell; DEPTH_COLUMNS]) -> CaliforniaTableRow {
    CaliforniaTableRow {
        width_threshold_mm,
        cells,
    }
}

const fn mm(size: u32) -> TableCell {
    TableCell::Size(size)
}

const BRIDGE: TableCell = TableCell::Bridge;

/// Fine California Method table, ascending by width
#[rustfmt::skip]
pub const CALIFORNIA_TABLE: [CaliforniaTableRow; 50] = [
    row(100, [mm(300), mm(300), mm(300), mm(300), mm(300), mm(400), mm(400), mm(400), mm(400), mm(450)]),
    row(200, [mm(300), mm(300), mm(400), mm(400), mm(450), mm(450), mm(500), mm(600), mm(600), mm(600)]),
    row(300, [mm(300), mm(400), mm(400), mm(450), mm(500), mm(600), mm(600), mm(700), mm(700), mm(700)]),
    row(400, [mm(300), mm(400), mm(450), mm(600), mm(600), mm(700), mm(700), mm(800), mm(800), mm(900)]),
    row(500, [mm(300), mm(450), mm(500), mm(600), mm(700), mm(700), mm(800), mm(900), mm(900), mm(1000)]),
    row(600, [mm(400), mm(450), mm(600), mm(700), mm(700), mm(800), mm(900), mm(900), mm(1000), mm(1000)]),
    row(700, [mm(400), mm(500), mm(600), mm(700), mm(800), mm(900), mm(900), mm(1000), mm(1200), mm(1200)]),
    row(800, [mm(400), mm(600), mm(700), mm(800), mm(900), mm(900), mm(1000), mm(1200), mm(1200), mm(1200)]),
    row(900, [mm(400), mm(600), mm(700), mm(800), mm(900), mm(1000), mm(1200), mm(1200), mm(1200), mm(1400)]),
    row(1000, [mm(450), mm(600), mm(700), mm(900), mm(1000), mm(1000), mm(1200), mm(1200), mm(1400), mm(1400)]),
    row(1100, [mm(450), mm(600), mm(800), mm(900), mm(1000), mm(1200), mm(1200), mm(1200), mm(1400), mm(1400)]),
    row(1200, [mm(450), mm(700), mm(800), mm(900), mm(1000), mm(1200), mm(1200), mm(1400), mm(1400), mm(1400)]),
    row(1300, [mm(500), mm(700), mm(800), mm(1000), mm(1200), mm(1200), mm(1400), mm(1400), mm(1400), mm(1500)]),
    row(1400, [mm(500), mm(700), mm(900), mm(1000), mm(1200), mm(1200), mm(1400), mm(1400), mm(1500), mm(1600)]),
    row(1500, [mm(500), mm(700), mm(900), mm(1000), mm(1200), mm(1400), mm(1400), mm(1400), mm(1500), mm(1600)]),
    row(1600, [mm(600), mm(800), mm(900), mm(1200), mm(1200), mm(1400), mm(1400), mm(1500), mm(1600), mm(1700)]),
    row(1700, [mm(600), mm(800), mm(1000), mm(1200), mm(1200), mm(1400), mm(1400), mm(1500), mm(1600), mm(1700)]),
    row(1800, [mm(600), mm(800), mm(1000), mm(1200), mm(1400), mm(1400), mm(1500), mm(1600), mm(1700), mm(1800)]),
    row(1900, [mm(600), mm(800), mm(1000), mm(1200), mm(1400), mm(1400), mm(1500), mm(1600), mm(1700), mm(1800)]),
    row(2000, [mm(600), mm(900), mm(1000), mm(1200), mm(1400), mm(1400), mm(1600), mm(1700), mm(1800), mm(2000)]),
    row(2100, [mm(600), mm(900), mm(1200), mm(1200), mm(1400), mm(1500), mm(1600), mm(1700), mm(1800), mm(2000)]),
    row(2200, [mm(600), mm(900), mm(1200), mm(1200), mm(1400), mm(1500), mm(1600), mm(1700), mm(1800), mm(2000)]),
    row(2300, [mm(700), mm(900), mm(1200), mm(1400), mm(1400), mm(1500), mm(1700), mm(1800), mm(2000), mm(2000)]),
    row(2400, [mm(700), mm(900), mm(1200), mm(1400), mm(1400), mm(1600), mm(1700), mm(1800), mm(2000), mm(2000)]),
    row(2500, [mm(700), mm(1000), mm(1200), mm(1400), mm(1500), mm(1600), mm(1700), mm(2000), mm(2000), mm(2200)]),
    row(2600, [mm(700), mm(1000), mm(1200), mm(1400), mm(1500), mm(1600), mm(1800), mm(2000), mm(2000), mm(2200)]),
    row(2700, [mm(700), mm(1000), mm(1200), mm(1400), mm(1500), mm(1700), mm(1800), mm(2000), mm(2000), mm(2200)]),
    row(2800, [mm(700), mm(1000), mm(1200), mm(1400), mm(1600), mm(1700), mm(1800), mm(2000), mm(2200), mm(2200)]),
    row(2900, [mm(700), mm(1000), mm(1200), mm(1400), mm(1600), mm(1700), mm(2000), mm(2000), mm(2200), mm(2200)]),
    row(3000, [mm(700), mm(1000), mm(1400), mm(1400), mm(1600), mm(1800), mm(2000), mm(2000), mm(2200), mm(2400)]),
    row(3100, [mm(800), mm(1200), mm(1400), mm(1500), mm(1600), mm(1800), mm(2000), mm(2200), mm(2200), mm(2400)]),
    row(3200, [mm(800), mm(1200), mm(1400), mm(1500), mm(1700), mm(1800), mm(2000), mm(2200), mm(2200), mm(2400)]),
    row(3300, [mm(800), mm(1200), mm(1400), mm(1500), mm(1700), mm(1800), mm(2000), mm(2200), mm(2200), mm(2400)]),
    row(3400, [mm(800), mm(1200), mm(1400), mm(1500), mm(1700), mm(2000), mm(2000), mm(2200), mm(2400), mm(2400)]),
    row(3500, [mm(800), mm(1200), mm(1400), mm(1600), mm(1700), mm(2000), mm(2000), mm(2200), mm(2400), mm(2400)]),
    row(3600, [mm(800), mm(1200), mm(1400), mm(1600), mm(1800), mm(2000), mm(2200), mm(2200), mm(2400), BRIDGE]),
    row(3700, [mm(800), mm(1200), mm(1400), mm(1600), mm(1800), mm(2000), mm(2200), mm(2200), mm(2400), BRIDGE]),
    row(3800, [mm(800), mm(1200), mm(1400), mm(1600), mm(1800), mm(2000), mm(2200), mm(2400), mm(2400), BRIDGE]),
    row(3900, [mm(800), mm(1200), mm(1400), mm(1600), mm(1800), mm(2000), mm(2200), mm(2400), mm(2400), BRIDGE]),
    row(4000, [mm(900), mm(1200), mm(1400), mm(1700), mm(2000), mm(2000), mm(2200), mm(2400), BRIDGE, BRIDGE]),
    row(4100, [mm(900), mm(1200), mm(1500), mm(1700), mm(2000), mm(2000), mm(2200), mm(2400), BRIDGE, BRIDGE]),
    row(4200, [mm(900), mm(1200), mm(1500), mm(1700), mm(2000), mm(2200), mm(2200), mm(2400), BRIDGE, BRIDGE]),
    row(4300, [mm(900), mm(1200), mm(1500), mm(1700), mm(2000), mm(2200), mm(2400), mm(2400), BRIDGE, BRIDGE]),
    row(4400, [mm(900), mm(1200), mm(1500), mm(1700), mm(2000), mm(2200), mm(2400), mm(2400), BRIDGE, BRIDGE]),
    row(4500, [mm(900), mm(1400), mm(1500), mm(1800), mm(2000), mm(2200), mm(2400), BRIDGE, BRIDGE, BRIDGE]),
    row(4600, [mm(900), mm(1400), mm(1500), mm(1800), mm(2000), mm(2200), mm(2400), BRIDGE, BRIDGE, BRIDGE]),
    row(4700, [mm(900), mm(1400), mm(1600), mm(1800), mm(2000), mm(2200), mm(2400), BRIDGE, BRIDGE, BRIDGE]),
    row(4800, [mm(900), mm(1400), mm(1600), mm(1800), mm(2000), mm(2200), mm(2400), BRIDGE, BRIDGE, BRIDGE]),
    row(4900, [mm(900), mm(1400), mm(1600), mm(1800), mm(2000), mm(2200), mm(2400), BRIDGE, BRIDGE, BRIDGE]),
    row(5000, [mm(1000), mm(1400), mm(1600), mm(2000), mm(2200), mm(2400), mm(2400), BRIDGE, BRIDGE, BRIDGE]),
];

/// Width band upper bounds (mm) for [`COARSE_TABLE`]
pub const COARSE_WIDTH_BANDS_MM: [u32; 10] = [300, 600, 900, 1200, 1500, 1800, 2100, 2400, 2700, 3000];

/// Depth band upper bounds (mm) for [`COARSE_TABLE`]
pub const COARSE_DEPTH_BANDS_MM: [u32; 6] = [100, 200, 300, 400, 500, 600];

/// Coarse explanation table (mm); `COARSE_TABLE[width_band][depth_band]`
#[rustfmt::skip]
pub const COARSE_TABLE: [[u32; 6]; 10] = [
    [450,  450,  600,  750,  750,  900],
    [450,  750,  900,  900,  1050, 1200],
    [600,  900,  1050, 1200, 1350, 1350],
    [750,  900,  1200, 1350, 1500, 1650],
    [750,  1050, 1350, 1500, 1650, 1800],
    [900,  1200, 1350, 1650, 1800, 1950],
    [900,  1200, 1500, 1800, 1950, 2100],
    [900,  1350, 1650, 1800, 2100, 2100],
    [1050, 1350, 1650, 1950, 2100, 2100],
    [1050, 1500, 1800, 2100, 2100, 2100],
];

const fn strictly_ascending(values: &[u32]) -> bool {
    let mut i = 1;
    while i < values.len() {
        if values[i] <= values[i - 1] {
            return false;
        }
        i += 1;
    }
    true
}

/// Sizes never decrease with depth inside a row, nor with width down a column.
const fn fine_table_is_monotonic(rows: &[CaliforniaTableRow]) -> bool {
    let mut i = 0;
    while i < rows.len() {
        if i > 0 && rows[i].width_threshold_mm <= rows[i - 1].width_threshold_mm {
            return false;
        }
        let mut j = 0;
        while j < DEPTH_COLUMNS {
            let rank = rows[i].cells[j].rank();
            if j > 0 && rank < rows[i].cells[j - 1].rank() {
                return false;
            }
            if i > 0 && rank < rows[i - 1].cells[j].rank() {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const fn coarse_table_is_monotonic(table: &[[u32; 6]; 10]) -> bool {
    let mut i = 0;
    while i < table.len() {
        let mut j = 0;
        while j < 6 {
            if j > 0 && table[i][j] < table[i][j - 1] {
                return false;
            }
            if i > 0 && table[i][j] < table[i - 1][j] {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const _: () = assert!(strictly_ascending(&DEPTH_THRESHOLDS_MM));
const _: () = assert!(strictly_ascending(&COARSE_WIDTH_BANDS_MM));
const _: () = assert!(strictly_ascending(&COARSE_DEPTH_BANDS_MM));
const _: () = assert!(
    fine_table_is_monotonic(&CALIFORNIA_TABLE),
    "California table must be non-decreasing along width and depth"
);
const _: () = assert!(
    coarse_table_is_monotonic(&COARSE_TABLE),
    "coarse table must be non-decreasing along width and depth"
);
