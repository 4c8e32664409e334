//! Culvert Sizing Core Library
//!
//! Sizes forestry road culverts from field measurements of the stream
//! channel, following the BC Ministry of Forests field procedure.
//!
//! ## Methods
//!
//! - California Method: tabulated sizes and the 3 × bankfull area rule
//! - Climate-change and debris-hazard area allowances on top of it
//! - Manning hydraulic check with a headwater-ratio limit
//!
//! [`calculate_culvert`] runs the whole procedure and returns a traceable
//! [`CulvertSizingResult`].

// Core types and utilities
pub mod core_types;
pub mod error;

// Reference data
pub mod tables;

// Field inputs and assessments
pub mod climate;
pub mod debris;
pub mod geometry;

// Sizing methods and orchestration
pub mod calculator;
pub mod sizing;

// Re-export core types
pub use core_types::{CubicMetersPerSecond, Meters, Millimeters, SquareMeters};
pub use error::ValidationError;
pub use tables::{PipeShape, StandardSize};

// Re-export assessments
pub use climate::{climate_factor_presets, ClimateFactorConfig, ClimatePreset, PlanningHorizon};
pub use debris::{
    classify_debris_hazard, DebrisAssessmentInput, DebrisHazardResult, HazardClass,
    MitigationStrategy,
};
pub use geometry::{compute_geometry, parse_readings, StreamGeometry};

// Re-export the calculator
pub use calculator::{
    calculate_culvert, calculate_culverts, CulvertSizingResult, FishPassage, GoverningMethod,
    HydraulicCheck, SizingMethod, SizingRequest,
};
