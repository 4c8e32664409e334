//! Debris transport hazard classification
//!
//! A field checklist of five "red flags" is counted and mapped onto a hazard
//! class. Each class carries an area multiplier for the California Method so
//! that crossings likely to catch woody debris or bedload get more waterway.
//!
//! Class boundaries and multipliers live in [`DEBRIS_HAZARD_BANDS`]; tune
//! them there, not in [`classify_debris_hazard`].

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Field checklist for debris transport hazard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct DebrisAssessmentInput {
    /// Scoured banks, levees or boulder lobes from past debris flows
    pub debris_flow_evidence: bool,
    /// Logs or jams in the channel upstream that could mobilize
    pub large_woody_debris: bool,
    /// Raveling or slumping banks feeding sediment to the channel
    pub unstable_banks: bool,
    /// Upstream channel gradient steep enough to carry debris to the crossing
    pub steep_upstream_gradient: bool,
    /// Recent harvesting, wildfire or landslides in the catchment
    pub recent_disturbance: bool,
    pub mitigation: MitigationStrategy,
}

impl DebrisAssessmentInput {
    /// Number of red flags answered "yes" (0-5)
    pub fn red_flag_count(&self) -> u8 {
        [
            self.debris_flow_evidence,
            self.large_woody_debris,
            self.unstable_banks,
            self.steep_upstream_gradient,
            self.recent_disturbance,
        ]
        .into_iter()
        .map(u8::from)
        .sum()
    }
}

/// How the crew intends to manage debris at the crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MitigationStrategy {
    /// Oversize the pipe so debris passes through
    #[default]
    Upsize,
    /// Keep the pipe size and commit to scheduled cleanout
    Cleanout,
}

impl MitigationStrategy {
    /// Display text for the report
    pub fn guidance(self) -> &'static str {
        match self {
            MitigationStrategy::Upsize => {
                "Upsize the culvert so debris passes through without blocking the inlet"
            }
            MitigationStrategy::Cleanout => {
                "Schedule inlet inspection and cleanout after every major storm"
            }
        }
    }
}

/// Hazard class from the red-flag count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HazardClass {
    Low,
    Moderate,
    High,
}

impl HazardClass {
    pub fn label(self) -> &'static str {
        match self {
            HazardClass::Low => "LOW",
            HazardClass::Moderate => "MODERATE",
            HazardClass::High => "HIGH",
        }
    }
}

/// One row of the classification table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardBand {
    /// Fewest red flags that put a site in this band
    pub min_red_flags: u8,
    pub class: HazardClass,
    pub area_multiplier: f64,
}

/// Classification table, ascending by `min_red_flags`.
///
/// 0-1 flags LOW, 2-3 MODERATE, 4-5 HIGH.
pub const DEBRIS_HAZARD_BANDS: [HazardBand; 3] = [
    HazardBand {
        min_red_flags: 0,
        class: HazardClass::Low,
        area_multiplier: 1.00,
    },
    HazardBand {
        min_red_flags: 2,
        class: HazardClass::Moderate,
        area_multiplier: 1.15,
    },
    HazardBand {
        min_red_flags: 4,
        class: HazardClass::High,
        area_multiplier: 1.30,
    },
];

/// Classification outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebrisHazardResult {
    pub hazard_class: HazardClass,
    pub red_flag_count: u8,
    pub area_multiplier: f64,
    /// Set exactly when the class is HIGH
    pub requires_professional_review: bool,
    pub mitigation_strategy: MitigationStrategy,
}

/// Classify a debris checklist.
///
/// # Example
/// ```
/// use culvert_core::debris::{classify_debris_hazard, DebrisAssessmentInput, HazardClass};
///
/// let input = DebrisAssessmentInput {
///     large_woody_debris: true,
///     unstable_banks: true,
///     ..DebrisAssessmentInput::default()
/// };
/// let result = classify_debris_hazard(&input);
/// assert_eq!(result.hazard_class, HazardClass::Moderate);
/// assert_eq!(result.area_multiplier, 1.15);
/// ```
pub fn classify_debris_hazard(input: &DebrisAssessmentInput) -> DebrisHazardResult {
    let red_flag_count = input.red_flag_count();

    let band = DEBRIS_HAZARD_BANDS
        .iter()
        .rev()
        .find(|band| red_flag_count >= band.min_red_flags)
        .unwrap_or(&DEBRIS_HAZARD_BANDS[0]);

    debug!(
        "Debris hazard: {} red flags -> {} (x{:.2})",
        red_flag_count,
        band.class.label(),
        band.area_multiplier
    );

    DebrisHazardResult {
        hazard_class: band.class,
        red_flag_count,
        area_multiplier: band.area_multiplier,
        requires_professional_review: band.class == HazardClass::High,
        mitigation_strategy: input.mitigation,
    }
}
