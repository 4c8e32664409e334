//! Read-only reference data: the California Method tables and the standard
//! size ladders. Everything here is `const`; ordering invariants are checked
//! when the crate compiles.

pub mod california;
pub mod standard_sizes;

pub use california::{
    CaliforniaTableRow, TableCell, CALIFORNIA_TABLE, COARSE_DEPTH_BANDS_MM, COARSE_TABLE,
    COARSE_WIDTH_BANDS_MM, DEPTH_COLUMNS, DEPTH_THRESHOLDS_MM,
};
pub use standard_sizes::{PipeShape, StandardSize, BOX_SIZES, CIRCULAR_SIZES, PIPE_ARCH_SIZES};
