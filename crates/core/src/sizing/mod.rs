//! Culvert sizing methods
//!
//! - [`california`]: table lookup and the 3 × bankfull area variant
//! - [`adjustment`]: climate and debris allowances on the area variant
//! - [`hydraulic`]: Manning capacity and headwater check

pub mod adjustment;
pub mod california;
pub mod hydraulic;

pub use adjustment::{apply_adjustments, AdjustedCaliforniaSizing, AdjustmentKind, AdjustmentStage};
pub use california::{
    required_area, size_by_california_table, size_by_coarse_table, size_for_area, AreaSizing,
    CaliforniaTableResult, CoarseTableResult, TableSize, CALIFORNIA_AREA_FACTOR,
};
pub use hydraulic::{
    channel_flow, headwater_ratio, manning_discharge, size_by_manning, ChannelFlow,
    HydraulicSizing, DEFAULT_MAX_HEADWATER_RATIO, DEFAULT_PIPE_ROUGHNESS,
    DEFAULT_STREAM_ROUGHNESS, DESIGN_DISCHARGE_FACTOR,
};
