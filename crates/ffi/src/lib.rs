//! C ABI for the culvert sizing calculator
//!
//! Every fallible function returns a [`CulvertErrorCode`] and records a
//! message retrievable with [`culvert_get_last_error`] on the calling thread.
//! A header, `CulvertSizingFFI.h`, is generated at build time.

mod calculate;
mod error;
mod helpers;
mod tables;

pub use calculate::{
    culvert_calculate, culvert_calculate_json, culvert_string_free, CulvertGoverningMethod,
    CulvertHazardClass, CulvertRequestC, CulvertResultC,
};
pub use error::{culvert_get_last_error, culvert_get_last_error_code, CulvertErrorCode};
pub use tables::{
    culvert_california_table_lookup, culvert_climate_preset_factor, culvert_standard_size_at,
    culvert_standard_size_count, CulvertStandardSizeC,
};
