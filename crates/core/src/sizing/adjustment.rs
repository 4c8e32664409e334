//! Ordered area adjustments on the California Method
//!
//! Starting from the base required area (3 × bankfull), each enabled
//! adjustment multiplies the running area and re-derives a standard size, in
//! a fixed order:
//!
//! 1. Climate-change allowance
//! 2. Debris hazard allowance
//!
//! ```text
//! A_final = A_base × c × d
//! ```
//!
//! Every stage is recorded so the report can show how the size grew.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::climate::ClimateFactorConfig;
use crate::core_types::units::SquareMeters;
use crate::debris::DebrisHazardResult;
use crate::sizing::california::{size_for_area, AreaSizing};
use crate::tables::{PipeShape, StandardSize};

/// Which allowance produced a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    Climate,
    Debris,
}

/// One inspectable step of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentStage {
    pub kind: AdjustmentKind,
    pub multiplier: f64,
    pub area_before: SquareMeters,
    pub area_after: SquareMeters,
    /// Standard size for `area_after`, rounded up
    pub size: StandardSize,
    pub exceeds_ladder: bool,
}

/// The California Method contribution after all enabled adjustments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedCaliforniaSizing {
    /// 3 × bankfull area
    pub base_area: SquareMeters,
    /// Size for `base_area` before any adjustment
    pub base_size: StandardSize,
    /// Enabled stages, climate before debris
    pub stages: Vec<AdjustmentStage>,
    pub final_area: SquareMeters,
    pub final_size: StandardSize,
    /// The final area is beyond the largest standard size
    pub exceeds_ladder: bool,
}

/// Apply the enabled allowances to `base_area` in climate-then-debris order.
pub fn apply_adjustments(
    base_area: SquareMeters,
    shape: PipeShape,
    climate: Option<&ClimateFactorConfig>,
    debris: Option<&DebrisHazardResult>,
) -> AdjustedCaliforniaSizing {
    let base = size_for_area(shape, base_area);
    debug!(
        "California base: required area {} -> {}",
        base_area, base.size
    );

    let multipliers = [
        climate.map(|config| (AdjustmentKind::Climate, config.area_multiplier)),
        debris.map(|result| (AdjustmentKind::Debris, result.area_multiplier)),
    ];

    let mut area = base_area;
    let mut current: AreaSizing = base;
    let mut stages = Vec::with_capacity(2);

    for (kind, multiplier) in multipliers.into_iter().flatten() {
        let area_after = area * multiplier;
        current = size_for_area(shape, area_after);
        debug!(
            "{:?} adjustment x{:.2}: {} -> {} -> {}",
            kind, multiplier, area, area_after, current.size
        );
        stages.push(AdjustmentStage {
            kind,
            multiplier,
            area_before: area,
            area_after,
            size: current.size,
            exceeds_ladder: current.exceeds_ladder,
        });
        area = area_after;
    }

    AdjustedCaliforniaSizing {
        base_area,
        base_size: base.size,
        stages,
        final_area: area,
        final_size: current.size,
        exceeds_ladder: current.exceeds_ladder,
    }
}
